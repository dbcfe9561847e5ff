//! The page model handlers render into.
//!
//! A [`Document`] stands in for the browser page: named containers holding
//! lines of text, named input fields, the listener attached to each element
//! and the Enter-key bindings of each container.  Changes are journaled so a
//! [`Renderer`](crate::render::Renderer) can show them as they happen.

use std::collections::BTreeMap;

use crate::event::{Key, Submission};
use crate::router::AuthKind;

/// How a line is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    /// Ordinary text.
    #[default]
    Plain,
    /// Visually distinct error text (red where colors are available).
    Error,
}

/// One line appended to a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// The text as shown.
    pub text: String,
    /// How to show it.
    pub style: Style,
}

impl Line {
    /// A plain line.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Style::Plain,
        }
    }

    /// An error-styled line.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Style::Error,
        }
    }
}

/// The action attached to an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listener {
    /// Submit the login or register form.
    AuthForm(AuthKind),
    /// Send the chat message field over the current socket.
    ChatSend,
}

/// A change to the document, in the order it was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// The whole body was replaced.
    BodyReplaced(String),
    /// A line was appended to a container.
    Appended {
        /// Container id.
        container: String,
        /// The new line.
        line: Line,
    },
    /// The fragment was set.
    Fragment(String),
}

/// The page.
#[derive(Debug, Clone, Default)]
pub struct Document {
    body: String,
    fragment: Option<String>,
    containers: BTreeMap<String, Vec<Line>>,
    fields: BTreeMap<String, String>,
    listeners: BTreeMap<String, Listener>,
    enter_bindings: BTreeMap<String, String>,
    changes: Vec<Change>,
}

impl Document {
    /// An empty page.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current body markup.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Replace the body.
    ///
    /// Containers, fields, listeners and Enter bindings all lived in the old
    /// body, so they are dropped with it.
    pub fn replace_body(&mut self, markup: impl Into<String>) {
        let markup = markup.into();
        self.containers.clear();
        self.fields.clear();
        self.listeners.clear();
        self.enter_bindings.clear();
        self.body = markup.clone();
        self.changes.push(Change::BodyReplaced(markup));
    }

    /// The fragment last set, including its leading `#`.
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Set the fragment.
    pub fn set_fragment(&mut self, fragment: impl Into<String>) {
        let fragment = fragment.into();
        self.fragment = Some(fragment.clone());
        self.changes.push(Change::Fragment(fragment));
    }

    /// Append `line` to `container`, creating the container if needed.
    pub fn append(&mut self, container: &str, line: Line) {
        self.containers
            .entry(container.to_string())
            .or_default()
            .push(line.clone());
        self.changes.push(Change::Appended {
            container: container.to_string(),
            line,
        });
    }

    /// Lines in `container`, oldest first.
    pub fn lines(&self, container: &str) -> &[Line] {
        self.containers
            .get(container)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The text of each line in `container`.
    pub fn texts(&self, container: &str) -> Vec<&str> {
        self.lines(container)
            .iter()
            .map(|line| line.text.as_str())
            .collect()
    }

    /// Set an input field's value.
    pub fn set_field(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    /// An input field's value; a field never typed into reads as empty.
    pub fn field(&self, field: &str) -> &str {
        self.fields.get(field).map(String::as_str).unwrap_or("")
    }

    /// Attach `listener` to `element`, replacing whatever was attached.
    pub fn bind(&mut self, element: impl Into<String>, listener: Listener) {
        self.listeners.insert(element.into(), listener);
    }

    /// The listener attached to `element`.
    pub fn listener(&self, element: &str) -> Option<Listener> {
        self.listeners.get(element).copied()
    }

    /// Number of listeners attached to `element` (zero or one).
    pub fn listener_count(&self, element: &str) -> usize {
        usize::from(self.listeners.contains_key(element))
    }

    /// Make Enter inside `container` act as a click on `element`.
    pub fn bind_enter(&mut self, container: impl Into<String>, element: impl Into<String>) {
        self.enter_bindings.insert(container.into(), element.into());
    }

    /// Turn a key released in `container` into a submission, if bound.
    pub fn key_up(&self, container: &str, key: Key) -> Option<Submission> {
        if key != Key::Enter {
            return None;
        }
        self.enter_bindings
            .get(container)
            .map(|element| Submission::enter(element.clone()))
    }

    /// Take the changes made since the last call.
    pub fn take_changes(&mut self) -> Vec<Change> {
        std::mem::take(&mut self.changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_accumulates_in_order() {
        let mut document = Document::new();
        document.append("chat-container", Line::plain("one"));
        document.append("chat-container", Line::error("two"));
        assert_eq!(document.texts("chat-container"), vec!["one", "two"]);
        assert_eq!(document.lines("chat-container")[1].style, Style::Error);
        assert!(document.lines("elsewhere").is_empty());
    }

    #[test]
    fn binding_replaces_instead_of_stacking() {
        let mut document = Document::new();
        document.bind("login-button", Listener::AuthForm(AuthKind::Login));
        document.bind("login-button", Listener::AuthForm(AuthKind::Login));
        assert_eq!(document.listener_count("login-button"), 1);
        assert_eq!(document.listener_count("register-button"), 0);
    }

    #[test]
    fn enter_is_the_only_bound_key() {
        let mut document = Document::new();
        document.bind_enter("chat-container", "send-button");
        assert_eq!(
            document.key_up("chat-container", Key::Enter),
            Some(Submission::enter("send-button"))
        );
        assert_eq!(document.key_up("chat-container", Key::Other('a')), None);
        assert_eq!(document.key_up("login-container", Key::Enter), None);
    }

    #[test]
    fn replacing_body_forgets_page_state() {
        let mut document = Document::new();
        document.set_field("username", "alice");
        document.bind("login-button", Listener::AuthForm(AuthKind::Login));
        document.bind_enter("login-container", "login-button");
        document.append("login-container", Line::plain("status"));

        document.replace_body("<h1>home</h1>");
        assert_eq!(document.body(), "<h1>home</h1>");
        assert_eq!(document.field("username"), "");
        assert_eq!(document.listener("login-button"), None);
        assert_eq!(document.key_up("login-container", Key::Enter), None);
        assert!(document.lines("login-container").is_empty());
    }

    #[test]
    fn changes_are_journaled_once() {
        let mut document = Document::new();
        document.replace_body("<p>hi</p>");
        document.set_fragment("#home");
        document.append("c", Line::plain("x"));
        assert_eq!(
            document.take_changes(),
            vec![
                Change::BodyReplaced("<p>hi</p>".to_string()),
                Change::Fragment("#home".to_string()),
                Change::Appended {
                    container: "c".to_string(),
                    line: Line::plain("x")
                },
            ]
        );
        assert!(document.take_changes().is_empty());
    }
}
