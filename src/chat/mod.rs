//! The live chat channel.
//!
//! - `socket`: the [`Connector`] seam and its `tokio-tungstenite` implementation
//! - `controller`: [`ChatSessionController`], the per-socket state machine

mod controller;
mod socket;

pub use controller::{
    CHAT_CONTAINER, CLOSED_NOTICE, ChatSessionController, ChatState, MESSAGE_FIELD, SEND_BUTTON,
};
pub use socket::{Connector, Outbound, SocketEvents, SocketHandle, TungsteniteConnector};
