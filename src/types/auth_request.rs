use serde::{Deserialize, Serialize};

/// Credentials posted to `/api/login` or `/api/register`.
///
/// Built once per attempt and never persisted.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthRequest {
    /// The account name.
    pub username: String,

    /// The account password, sent as typed.
    pub password: String,
}

impl AuthRequest {
    /// Create a new `AuthRequest`.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for AuthRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_username_then_password() {
        let request = AuthRequest::new("alice", "p");
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"username":"alice","password":"p"}"#
        );
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"username": "alice", "password": "p"})
        );
    }

    #[test]
    fn debug_omits_password() {
        let request = AuthRequest::new("alice", "hunter2");
        let debug = format!("{request:?}");
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }
}
