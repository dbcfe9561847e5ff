// Public modules
pub mod auth_request;
pub mod auth_response;
pub mod chat_inbound_frame;
pub mod chat_outbound_frame;

// Re-exports
pub use auth_request::AuthRequest;
pub use auth_response::{AuthResponse, AuthStatus};
pub use chat_inbound_frame::ChatInboundFrame;
pub use chat_outbound_frame::{AUTH_MARKER, ChatOutboundFrame};
