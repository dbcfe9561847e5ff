//! Chat socket plumbing.
//!
//! A [`Connector`] opens a socket and hands back a [`SocketHandle`] at once;
//! the handshake, inbound frames and closure are reported later as events
//! through [`SocketEvents`].  The socket task never touches client state.

use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

use crate::error::{Error, Result};
use crate::event::{Event, EventSender, SessionId, SocketEvent, SocketEventKind};

/// Something the client asks the socket task to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Write a text frame.
    Frame(String),
    /// Close the socket.
    Close,
}

/// The client's end of an open (or opening) socket.
///
/// Frames are written in the order they are queued, and frames queued before
/// the handshake completes wait for it.
#[derive(Debug, Clone)]
pub struct SocketHandle {
    outbound: mpsc::UnboundedSender<Outbound>,
}

impl SocketHandle {
    /// Create a handle and the queue its frames arrive on.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Outbound>) {
        let (outbound, rx) = mpsc::unbounded_channel();
        (Self { outbound }, rx)
    }

    /// Queue a text frame.
    pub fn send(&self, frame: String) -> Result<()> {
        self.outbound
            .send(Outbound::Frame(frame))
            .map_err(|_| Error::websocket("socket is closed"))
    }

    /// Ask the socket to close.  Closing a closed socket does nothing.
    pub fn close(&self) {
        let _ = self.outbound.send(Outbound::Close);
    }
}

/// Reports one socket's activity to the dispatch loop.
#[derive(Debug, Clone)]
pub struct SocketEvents {
    session: SessionId,
    events: EventSender,
}

impl SocketEvents {
    /// Report activity for `session` on `events`.
    pub fn new(session: SessionId, events: EventSender) -> Self {
        Self { session, events }
    }

    /// The session this socket belongs to.
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// The handshake completed.
    pub fn opened(&self) {
        self.emit(SocketEventKind::Opened);
    }

    /// A text frame arrived.
    pub fn frame(&self, text: impl Into<String>) {
        self.emit(SocketEventKind::Frame(text.into()));
    }

    /// The socket is gone.
    pub fn closed(&self, reason: Option<String>) {
        self.emit(SocketEventKind::Closed(reason));
    }

    fn emit(&self, kind: SocketEventKind) {
        // The dispatch loop going away is the only way this fails.
        let _ = self.events.send(Event::Socket(SocketEvent {
            session: self.session,
            kind,
        }));
    }
}

/// The capability to open a chat socket.
pub trait Connector: Send + Sync {
    /// Start opening a socket to `url`.
    ///
    /// Returns immediately; `events` later sees exactly one of `opened` or
    /// `closed` first, and `closed` last.
    fn open(&self, url: &Url, events: SocketEvents) -> Result<SocketHandle>;
}

/// [`Connector`] over `tokio-tungstenite`.  Each socket gets its own task.
#[derive(Debug, Default, Clone, Copy)]
pub struct TungsteniteConnector;

impl TungsteniteConnector {
    /// Create a connector.
    pub fn new() -> Self {
        Self
    }
}

impl Connector for TungsteniteConnector {
    fn open(&self, url: &Url, events: SocketEvents) -> Result<SocketHandle> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| Error::websocket(format!("no async runtime to run the socket on: {e}")))?;
        let (handle, outbound) = SocketHandle::channel();
        runtime.spawn(run_socket(url.to_string(), outbound, events));
        Ok(handle)
    }
}

async fn run_socket(
    url: String,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
    events: SocketEvents,
) {
    let stream = match connect_async(url.as_str()).await {
        Ok((stream, _)) => stream,
        Err(err) => {
            events.closed(Some(err.to_string()));
            return;
        }
    };
    events.opened();

    let (mut write, mut read) = stream.split();
    loop {
        tokio::select! {
            next = outbound.recv() => match next {
                Some(Outbound::Frame(text)) => {
                    if let Err(err) = write.send(Message::Text(text)).await {
                        events.closed(Some(err.to_string()));
                        return;
                    }
                }
                Some(Outbound::Close) | None => {
                    let _ = write.send(Message::Close(None)).await;
                    events.closed(Some("closed by client".to_string()));
                    return;
                }
            },
            inbound = read.next() => match inbound {
                Some(Ok(Message::Text(text))) => events.frame(text),
                Some(Ok(Message::Binary(bytes))) => {
                    events.frame(String::from_utf8_lossy(&bytes).into_owned());
                }
                Some(Ok(Message::Ping(data))) => {
                    let _ = write.send(Message::Pong(data)).await;
                }
                Some(Ok(Message::Close(frame))) => {
                    events.closed(frame.map(|f| f.reason.into_owned()));
                    return;
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    events.closed(Some(err.to_string()));
                    return;
                }
                None => {
                    events.closed(None);
                    return;
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event;

    #[test]
    fn handle_queues_in_order() {
        let (handle, mut rx) = SocketHandle::channel();
        handle.send("a".to_string()).unwrap();
        handle.send("b".to_string()).unwrap();
        handle.close();
        assert_eq!(rx.try_recv().unwrap(), Outbound::Frame("a".to_string()));
        assert_eq!(rx.try_recv().unwrap(), Outbound::Frame("b".to_string()));
        assert_eq!(rx.try_recv().unwrap(), Outbound::Close);
    }

    #[test]
    fn send_after_task_exit_is_an_error() {
        let (handle, rx) = SocketHandle::channel();
        drop(rx);
        assert!(matches!(
            handle.send("late".to_string()),
            Err(Error::WebSocket { .. })
        ));
        handle.close();
    }

    #[test]
    fn events_carry_the_session() {
        let (tx, mut rx) = event::channel();
        let events = SocketEvents::new(7, tx);
        events.opened();
        events.frame("{}");
        events.closed(None);
        let kinds: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|e| match e {
                Event::Socket(SocketEvent { session, kind }) => {
                    assert_eq!(session, 7);
                    kind
                }
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                SocketEventKind::Opened,
                SocketEventKind::Frame("{}".to_string()),
                SocketEventKind::Closed(None),
            ]
        );
    }

    #[tokio::test]
    async fn unreachable_server_reports_closed() {
        let (tx, mut rx) = event::channel();
        let url = Url::parse("ws://127.0.0.1:1/api/chat/ws").unwrap();
        let _handle = TungsteniteConnector::new()
            .open(&url, SocketEvents::new(1, tx))
            .unwrap();
        match rx.recv().await {
            Some(Event::Socket(SocketEvent {
                session: 1,
                kind: SocketEventKind::Closed(Some(_)),
            })) => {}
            other => panic!("expected a close, got {other:?}"),
        }
    }
}
