use serde::{Deserialize, Serialize};

/// The outcome reported in an [`AuthResponse`].
///
/// Only `"success"` is a success; the server reports failures as `"error"`,
/// and any other value is treated the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AuthStatus {
    /// The request was accepted.
    Success,
    /// The request was refused; carries the status string as sent.
    Failure(String),
}

impl AuthStatus {
    /// Returns true for [`AuthStatus::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, AuthStatus::Success)
    }
}

impl From<String> for AuthStatus {
    fn from(status: String) -> Self {
        if status == "success" {
            AuthStatus::Success
        } else {
            AuthStatus::Failure(status)
        }
    }
}

impl From<AuthStatus> for String {
    fn from(status: AuthStatus) -> Self {
        match status {
            AuthStatus::Success => "success".to_string(),
            AuthStatus::Failure(status) => status,
        }
    }
}

fn undefined_message() -> String {
    "undefined".to_string()
}

/// Body returned by the login, register, logout and health endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Whether the request was accepted.
    pub status: AuthStatus,

    /// Human-readable outcome, shown to the user verbatim.
    #[serde(default = "undefined_message")]
    pub message: String,

    /// The bearer token; present only on a successful login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// The account name; present only on a successful login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl AuthResponse {
    /// Create a successful response.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: AuthStatus::Success,
            message: message.into(),
            token: None,
            username: None,
        }
    }

    /// Create a failed response with the server's `"error"` status.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: AuthStatus::Failure("error".to_string()),
            message: message.into(),
            token: None,
            username: None,
        }
    }

    /// Attach a token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Attach a username.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}
