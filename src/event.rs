//! Events delivered to the dispatch loop.
//!
//! Every input the client reacts to (fragment changes, clicks, key presses,
//! edits to input fields and socket activity) becomes an [`Event`] on one
//! unbounded queue, so handlers run one at a time and to completion.

use tokio::sync::mpsc;

/// Identifies one chat socket.  A fresh id is handed out per `#chat` visit.
pub type SessionId = u64;

/// Sending half of the event queue.
pub type EventSender = mpsc::UnboundedSender<Event>;

/// Receiving half of the event queue.
pub type EventReceiver = mpsc::UnboundedReceiver<Event>;

/// Create a new event queue.
pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// A key released inside a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// The Enter key.
    Enter,
    /// Any other key.
    Other(char),
}

/// What caused a [`Submission`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The target element was clicked.
    Click,
    /// Enter was released inside a container bound to the target element.
    Enter,
}

/// A request to run the action attached to `target`.
///
/// Clicks and Enter presses both produce a `Submission`, and handlers never
/// look at the trigger to decide what to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Id of the element whose listener runs.
    pub target: String,
    /// How the submission was made.
    pub trigger: Trigger,
}

impl Submission {
    /// A submission made by clicking `target`.
    pub fn click(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            trigger: Trigger::Click,
        }
    }

    /// A submission made by pressing Enter on behalf of `target`.
    pub fn enter(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            trigger: Trigger::Enter,
        }
    }
}

/// What happened on a chat socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEventKind {
    /// The handshake completed.
    Opened,
    /// A text frame arrived.
    Frame(String),
    /// The socket is gone, with the peer's or the transport's reason if any.
    Closed(Option<String>),
}

/// Socket activity tagged with the session it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketEvent {
    /// The session whose socket produced this event.
    pub session: SessionId,
    /// What happened.
    pub kind: SocketEventKind,
}

/// An input to the dispatch loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The fragment changed; carries the raw fragment, with or without `#`.
    Navigate(String),
    /// An input field's value changed.
    Input {
        /// Id of the field.
        field: String,
        /// The field's new value.
        value: String,
    },
    /// An element was clicked.
    Click(String),
    /// A key was released inside a container.
    KeyUp {
        /// Id of the container that saw the key.
        container: String,
        /// The key.
        key: Key,
    },
    /// Chat socket activity.
    Socket(SocketEvent),
}

impl Event {
    /// A fragment change.
    pub fn navigate(fragment: impl Into<String>) -> Self {
        Event::Navigate(fragment.into())
    }

    /// An edit to `field`.
    pub fn input(field: impl Into<String>, value: impl Into<String>) -> Self {
        Event::Input {
            field: field.into(),
            value: value.into(),
        }
    }

    /// A click on `element`.
    pub fn click(element: impl Into<String>) -> Self {
        Event::Click(element.into())
    }

    /// Enter released inside `container`.
    pub fn enter(container: impl Into<String>) -> Self {
        Event::KeyUp {
            container: container.into(),
            key: Key::Enter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submissions_differ_only_in_trigger() {
        let click = Submission::click("send-button");
        let enter = Submission::enter("send-button");
        assert_eq!(click.target, enter.target);
        assert_eq!(click.trigger, Trigger::Click);
        assert_eq!(enter.trigger, Trigger::Enter);
    }

    #[tokio::test]
    async fn queue_preserves_order() {
        let (tx, mut rx) = channel();
        tx.send(Event::navigate("#chat")).unwrap();
        tx.send(Event::input("message-field", "hi")).unwrap();
        tx.send(Event::enter("chat-container")).unwrap();
        assert_eq!(rx.recv().await, Some(Event::Navigate("#chat".to_string())));
        assert_eq!(
            rx.recv().await,
            Some(Event::Input {
                field: "message-field".to_string(),
                value: "hi".to_string()
            })
        );
        assert_eq!(
            rx.recv().await,
            Some(Event::KeyUp {
                container: "chat-container".to_string(),
                key: Key::Enter
            })
        );
    }
}
