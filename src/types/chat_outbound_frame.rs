use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The `message` value that marks the authentication frame.
pub const AUTH_MARKER: &str = "auth";

/// A frame the client writes to the chat socket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatOutboundFrame {
    /// The one-time authentication frame; always first on a socket.
    Auth {
        /// The bearer token.
        token: String,
        /// Always [`AUTH_MARKER`].
        message: String,
    },

    /// A chat message.
    Message {
        /// The text as typed, possibly empty.
        message: String,
    },
}

impl ChatOutboundFrame {
    /// Create an authentication frame for `token`.
    pub fn auth(token: impl Into<String>) -> Self {
        ChatOutboundFrame::Auth {
            token: token.into(),
            message: AUTH_MARKER.to_string(),
        }
    }

    /// Create a chat message frame.
    pub fn message(message: impl Into<String>) -> Self {
        ChatOutboundFrame::Message {
            message: message.into(),
        }
    }

    /// Returns true for the authentication frame.
    pub fn is_auth(&self) -> bool {
        matches!(self, ChatOutboundFrame::Auth { .. })
    }

    /// Encode the frame as the JSON text written to the socket.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_frame_is_token_then_marker() {
        assert_eq!(
            ChatOutboundFrame::auth("T").to_json().unwrap(),
            r#"{"token":"T","message":"auth"}"#
        );
    }

    #[test]
    fn message_frame_keeps_empty_text() {
        assert_eq!(
            ChatOutboundFrame::message("").to_json().unwrap(),
            r#"{"message":""}"#
        );
    }

    #[test]
    fn decodes_both_shapes() {
        let auth: ChatOutboundFrame =
            serde_json::from_str(r#"{"token":"T","message":"auth"}"#).unwrap();
        assert!(auth.is_auth());
        let message: ChatOutboundFrame = serde_json::from_str(r#"{"message":"auth"}"#).unwrap();
        assert_eq!(message, ChatOutboundFrame::message("auth"));
    }
}
