//! One chat socket's lifecycle.

use std::sync::Arc;

use crate::client_logger::ClientLogger;
use crate::dom::{Document, Line};
use crate::error::Result;
use crate::event::{EventSender, SessionId, SocketEventKind};
use crate::observability::{
    CHAT_DROPPED_FRAMES, CHAT_FRAMES_RECEIVED, CHAT_FRAMES_SENT, CHAT_SOCKETS_CLOSED,
    CHAT_SOCKETS_OPENED,
};
use crate::session::SessionContext;
use crate::token_store::TokenStore;
use crate::types::{ChatInboundFrame, ChatOutboundFrame};

use super::socket::{SocketEvents, SocketHandle};

/// Transcript container of the chat page.
pub const CHAT_CONTAINER: &str = "chat-container";
/// Send button of the chat page.
pub const SEND_BUTTON: &str = "send-button";
/// Message input of the chat page.
pub const MESSAGE_FIELD: &str = "message-field";

/// Shown when the socket goes away.
pub const CLOSED_NOTICE: &str = "Websocket closed. Please reload.";

/// Where a chat session is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    /// The socket is opening.
    Connecting,
    /// The socket is open and, when a credential existed, the auth frame is sent.
    Authenticated,
    /// The socket is gone.  Terminal.
    Closed,
}

/// Owns one chat socket: connect, authenticate, send, receive, close.
pub struct ChatSessionController {
    id: SessionId,
    state: ChatState,
    socket: SocketHandle,
    tokens: TokenStore,
    logger: Arc<dyn ClientLogger>,
    sent: usize,
    received: usize,
}

impl ChatSessionController {
    /// Open the chat socket for session `id`.  The controller starts out
    /// [`ChatState::Connecting`]; socket activity arrives on `events`.
    pub fn connect(id: SessionId, context: &SessionContext, events: EventSender) -> Result<Self> {
        let url = context.config().chat_url()?;
        let socket = context
            .connector()
            .open(&url, SocketEvents::new(id, events))?;
        CHAT_SOCKETS_OPENED.click();
        Ok(Self {
            id,
            state: ChatState::Connecting,
            socket,
            tokens: context.tokens().clone(),
            logger: context.logger().clone(),
            sent: 0,
            received: 0,
        })
    }

    /// The session id this controller answers to.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The current state.
    pub fn state(&self) -> ChatState {
        self.state
    }

    /// Frames queued on the socket so far, the auth frame included.
    pub fn sent(&self) -> usize {
        self.sent
    }

    /// Inbound frames rendered so far.
    pub fn received(&self) -> usize {
        self.received
    }

    /// Apply one socket event.
    pub fn handle(&mut self, document: &mut Document, kind: SocketEventKind) -> Result<()> {
        match kind {
            SocketEventKind::Opened => self.on_open(),
            SocketEventKind::Frame(text) => {
                self.on_frame(document, &text);
                Ok(())
            }
            SocketEventKind::Closed(reason) => {
                self.on_close(document, reason.as_deref());
                Ok(())
            }
        }
    }

    /// The handshake completed: authenticate if a credential exists, then
    /// accept traffic either way.
    pub fn on_open(&mut self) -> Result<()> {
        if self.state != ChatState::Connecting {
            return Ok(());
        }
        if let Some(credential) = self.tokens.get_token()? {
            self.send(ChatOutboundFrame::auth(credential.as_str()))?;
        }
        self.state = ChatState::Authenticated;
        Ok(())
    }

    /// Render an inbound frame as `"{user} ({time}): {message}"`.
    ///
    /// Frames that are not chat lines are dropped and logged.
    pub fn on_frame(&mut self, document: &mut Document, text: &str) {
        self.logger.log_frame_received(text);
        if self.state != ChatState::Authenticated {
            self.drop_frame(text, "socket is not open");
            return;
        }
        match serde_json::from_str::<ChatInboundFrame>(text) {
            Ok(frame) => {
                CHAT_FRAMES_RECEIVED.click();
                self.received += 1;
                document.append(CHAT_CONTAINER, Line::plain(frame.to_string()));
            }
            Err(err) => self.drop_frame(text, &err.to_string()),
        }
    }

    /// Send the message field's current value, exactly as typed.
    ///
    /// Returns false when the session is not open and nothing was sent.
    pub fn on_submit(&mut self, document: &Document) -> Result<bool> {
        if self.state != ChatState::Authenticated {
            return Ok(false);
        }
        self.send(ChatOutboundFrame::message(document.field(MESSAGE_FIELD)))?;
        Ok(true)
    }

    /// The socket went away: show the reload notice.  No reconnect.
    pub fn on_close(&mut self, document: &mut Document, reason: Option<&str>) {
        if self.state == ChatState::Closed {
            return;
        }
        self.state = ChatState::Closed;
        CHAT_SOCKETS_CLOSED.click();
        self.logger.log_socket_closed(reason);
        document.append(CHAT_CONTAINER, Line::error(CLOSED_NOTICE));
    }

    /// Close the socket because the user left the chat page.
    ///
    /// Nothing is rendered; the page it would go on is gone.
    pub fn shutdown(&mut self) {
        if self.state == ChatState::Closed {
            return;
        }
        self.state = ChatState::Closed;
        CHAT_SOCKETS_CLOSED.click();
        self.logger.log_socket_closed(Some("left the chat page"));
        self.socket.close();
    }

    fn send(&mut self, frame: ChatOutboundFrame) -> Result<()> {
        let json = frame.to_json()?;
        self.logger.log_frame_sent(&json);
        self.socket.send(json)?;
        CHAT_FRAMES_SENT.click();
        self.sent += 1;
        Ok(())
    }

    fn drop_frame(&self, text: &str, reason: &str) {
        CHAT_DROPPED_FRAMES.click();
        self.logger.log_dropped_frame(text, reason);
    }
}

impl std::fmt::Debug for ChatSessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSessionController")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("sent", &self.sent)
            .field("received", &self.received)
            .finish_non_exhaustive()
    }
}
