use std::fmt;

use serde::{Deserialize, Serialize};

/// A chat line broadcast by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatInboundFrame {
    /// Who sent the message; `server` for join/leave notices.
    pub user: String,

    /// Server-side timestamp, already formatted for display.
    pub time: String,

    /// The message body.
    pub message: String,
}

impl ChatInboundFrame {
    /// Create a new `ChatInboundFrame`.
    pub fn new(
        user: impl Into<String>,
        time: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            time: time.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ChatInboundFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.user, self.time, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_transcript_line() {
        let frame: ChatInboundFrame =
            serde_json::from_str(r#"{"user":"bob","time":"10:00","message":"hi"}"#).unwrap();
        assert_eq!(frame.to_string(), "bob (10:00): hi");
    }

    #[test]
    fn field_order_does_not_matter() {
        let frame: ChatInboundFrame =
            serde_json::from_str(r#"{"message":"User bob joined the server","user":"server","time":"09:59:01"}"#)
                .unwrap();
        assert_eq!(frame, ChatInboundFrame::new("server", "09:59:01", "User bob joined the server"));
    }

    #[test]
    fn plain_text_is_rejected() {
        assert!(serde_json::from_str::<ChatInboundFrame>("Not authorized").is_err());
    }
}
