//! Fragment-based page routing.
//!
//! The fragment is the whole dispatch key.  Each recognized [`Fragment`] maps
//! to exactly one [`View`], and [`Router`] runs that view's handler against
//! the [`Document`].  Anything else is ignored.

use std::fmt;

use crate::chat::{CHAT_CONTAINER, ChatSessionController, SEND_BUTTON};
use crate::dom::{Document, Listener};
use crate::error::Result;
use crate::event::{Event, EventSender, SessionId, SocketEvent, SocketEventKind, Submission};
use crate::observability::{
    CHAT_DROPPED_FRAMES, ROUTER_IGNORED, ROUTER_NAVIGATIONS, ROUTER_SUBMISSIONS,
};
use crate::session::SessionContext;
use crate::status::{RETRY_SUGGESTION, StatusReporter};
use crate::types::AuthRequest;

/// Username input on the login and register pages.
pub const USERNAME_FIELD: &str = "username";
/// Password input on the login and register pages.
pub const PASSWORD_FIELD: &str = "password";

////////////////////////////////////////////// Fragment //////////////////////////////////////////////

/// The fragments the client knows how to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fragment {
    /// The landing page, fetched from the server.
    Home,
    /// Forget the credential, then go home.
    Logout,
    /// Static feedback page.
    Feedback,
    /// The live chat.
    Chat,
    /// Account creation form.
    Register,
    /// Login form.
    Login,
}

impl Fragment {
    /// Every fragment, in menu order.
    pub const ALL: [Fragment; 6] = [
        Fragment::Home,
        Fragment::Logout,
        Fragment::Feedback,
        Fragment::Chat,
        Fragment::Register,
        Fragment::Login,
    ];

    /// Parse a fragment with or without its leading `#`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        match raw.strip_prefix('#').unwrap_or(raw) {
            "home" => Some(Fragment::Home),
            "logout" => Some(Fragment::Logout),
            "feedback" => Some(Fragment::Feedback),
            "chat" => Some(Fragment::Chat),
            "register" => Some(Fragment::Register),
            "login" => Some(Fragment::Login),
            _ => None,
        }
    }

    /// The fragment without `#`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Fragment::Home => "home",
            Fragment::Logout => "logout",
            Fragment::Feedback => "feedback",
            Fragment::Chat => "chat",
            Fragment::Register => "register",
            Fragment::Login => "login",
        }
    }

    /// The handler this fragment dispatches to.
    pub fn view(&self) -> View {
        match self {
            Fragment::Home => View::LoadPage,
            Fragment::Logout => View::Logout,
            Fragment::Feedback => View::Static,
            Fragment::Chat => View::Chat,
            Fragment::Register => View::AuthForm(AuthKind::Register),
            Fragment::Login => View::AuthForm(AuthKind::Login),
        }
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

/////////////////////////////////////////////// AuthKind //////////////////////////////////////////////

/// Which credential form a view drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthKind {
    /// Exchange credentials for a token.
    Login,
    /// Create an account.
    Register,
}

impl AuthKind {
    /// The button that submits the form.
    pub fn button(&self) -> &'static str {
        match self {
            AuthKind::Login => "login-button",
            AuthKind::Register => "register-button",
        }
    }

    /// The container holding the form and its status lines.
    pub fn container(&self) -> &'static str {
        match self {
            AuthKind::Login => "login-container",
            AuthKind::Register => "register-container",
        }
    }
}

///////////////////////////////////////////////// View ////////////////////////////////////////////////

/// A view handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Fetch the root page and swap it in.
    LoadPage,
    /// Forget the credential, then [`View::LoadPage`].
    Logout,
    /// Nothing to do; the content is already there.
    Static,
    /// Open a chat session and wire the send button.
    Chat,
    /// Wire a credential form's button.
    AuthForm(AuthKind),
}

//////////////////////////////////////////////// Router ///////////////////////////////////////////////

/// Dispatches fragments, submissions and socket activity.
///
/// At most one chat session is live; leaving `#chat` (or entering it again)
/// closes the previous socket, and events from closed sessions are ignored.
pub struct Router {
    context: SessionContext,
    events: EventSender,
    reporter: StatusReporter,
    current: Option<Fragment>,
    chat: Option<ChatSessionController>,
    next_session: SessionId,
}

impl Router {
    /// Create a router.  Chat sockets report on `events`.
    pub fn new(context: SessionContext, events: EventSender) -> Self {
        Self {
            context,
            events,
            reporter: StatusReporter,
            current: None,
            chat: None,
            next_session: 1,
        }
    }

    /// The shared session context.
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// The last fragment dispatched.
    pub fn current(&self) -> Option<Fragment> {
        self.current
    }

    /// The live chat session, if any.
    pub fn chat(&self) -> Option<&ChatSessionController> {
        self.chat.as_ref()
    }

    /// Apply one event.
    pub async fn handle(&mut self, document: &mut Document, event: Event) -> Result<()> {
        match event {
            Event::Navigate(raw) => {
                self.navigate(document, &raw).await?;
            }
            Event::Input { field, value } => document.set_field(field, value),
            Event::Click(element) => {
                self.submit(document, Submission::click(element)).await?;
            }
            Event::KeyUp { container, key } => {
                if let Some(submission) = document.key_up(&container, key) {
                    self.submit(document, submission).await?;
                }
            }
            Event::Socket(event) => self.socket_event(document, event)?,
        }
        Ok(())
    }

    /// Dispatch `raw` to its view.  Returns the view run, or `None` when the
    /// fragment is not recognized and nothing happened.
    pub async fn navigate(&mut self, document: &mut Document, raw: &str) -> Result<Option<View>> {
        let Some(fragment) = Fragment::parse(raw) else {
            ROUTER_IGNORED.click();
            self.context.logger().log_navigation(raw, false);
            return Ok(None);
        };
        ROUTER_NAVIGATIONS.click();
        self.context.logger().log_navigation(fragment.as_str(), true);

        self.leave_chat();
        self.current = Some(fragment);
        let view = fragment.view();
        match view {
            View::LoadPage => self.load_home(document).await?,
            View::Logout => self.logout(document).await?,
            View::Static => {}
            View::Chat => self.open_chat(document)?,
            View::AuthForm(kind) => self.bind_auth_form(document, kind),
        }
        Ok(Some(view))
    }

    /// Run the listener attached to the submission's target.
    ///
    /// Returns false when nothing is attached.  Clicks and Enter presses are
    /// handled identically.
    pub async fn submit(&mut self, document: &mut Document, submission: Submission) -> Result<bool> {
        let Some(listener) = document.listener(&submission.target) else {
            return Ok(false);
        };
        ROUTER_SUBMISSIONS.click();
        match listener {
            Listener::AuthForm(kind) => {
                self.submit_auth(document, kind).await?;
                Ok(true)
            }
            Listener::ChatSend => match self.chat.as_mut() {
                Some(chat) => chat.on_submit(document),
                None => Ok(false),
            },
        }
    }

    /// Route socket activity to the live session; anything else is stale.
    pub fn socket_event(&mut self, document: &mut Document, event: SocketEvent) -> Result<()> {
        match self.chat.as_mut() {
            Some(chat) if chat.id() == event.session => chat.handle(document, event.kind),
            _ => {
                if let SocketEventKind::Frame(text) = &event.kind {
                    CHAT_DROPPED_FRAMES.click();
                    self.context
                        .logger()
                        .log_dropped_frame(text, "session is no longer current");
                }
                Ok(())
            }
        }
    }

    async fn load_home(&mut self, document: &mut Document) -> Result<()> {
        let markup = self.context.client().load_page("").await?;
        document.replace_body(markup);
        document.set_fragment(Fragment::Home.to_string());
        self.current = Some(Fragment::Home);
        Ok(())
    }

    async fn logout(&mut self, document: &mut Document) -> Result<()> {
        if self.context.config().revoke_on_logout
            && self.context.tokens().get_token()?.is_some()
        {
            // The credential is forgotten locally whatever the server says.
            if let Err(err) = self.context.client().revoke().await {
                self.context.logger().log_error(&err);
            }
        }
        self.context.tokens().delete_token()?;
        self.load_home(document).await
    }

    fn open_chat(&mut self, document: &mut Document) -> Result<()> {
        let id = self.next_session;
        self.next_session += 1;
        let chat = ChatSessionController::connect(id, &self.context, self.events.clone())?;
        document.bind(SEND_BUTTON, Listener::ChatSend);
        document.bind_enter(CHAT_CONTAINER, SEND_BUTTON);
        self.chat = Some(chat);
        Ok(())
    }

    fn bind_auth_form(&mut self, document: &mut Document, kind: AuthKind) {
        document.bind(kind.button(), Listener::AuthForm(kind));
        document.bind_enter(kind.container(), kind.button());
    }

    async fn submit_auth(&mut self, document: &mut Document, kind: AuthKind) -> Result<()> {
        let request = AuthRequest::new(document.field(USERNAME_FIELD), document.field(PASSWORD_FIELD));
        let client = self.context.client();
        let result = match kind {
            AuthKind::Login => client.login(&request).await,
            AuthKind::Register => client.register(&request).await,
        };
        match result {
            Ok(response) if response.status.is_success() => {
                if kind == AuthKind::Login
                    && let Some(token) = &response.token
                {
                    self.context.tokens().set_token(token)?;
                }
                self.reporter
                    .report_default(document, kind.container(), &response.message);
            }
            Ok(response) => {
                self.reporter
                    .report(document, kind.container(), &response.message, RETRY_SUGGESTION);
            }
            Err(err) => {
                self.context.logger().log_error(&err);
                self.reporter
                    .report(document, kind.container(), &err.to_string(), RETRY_SUGGESTION);
            }
        }
        Ok(())
    }

    fn leave_chat(&mut self) {
        if let Some(mut chat) = self.chat.take() {
            chat.shutdown();
        }
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("current", &self.current)
            .field("chat", &self.chat)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_hash() {
        assert_eq!(Fragment::parse("#home"), Some(Fragment::Home));
        assert_eq!(Fragment::parse("chat"), Some(Fragment::Chat));
        assert_eq!(Fragment::parse(" #login "), Some(Fragment::Login));
        assert_eq!(Fragment::parse("#settings"), None);
        assert_eq!(Fragment::parse("#"), None);
        assert_eq!(Fragment::parse("#Home"), None);
        assert_eq!(Fragment::parse("##home"), None);
    }

    #[test]
    fn every_fragment_round_trips() {
        for fragment in Fragment::ALL {
            assert_eq!(Fragment::parse(fragment.as_str()), Some(fragment));
            assert_eq!(Fragment::parse(&fragment.to_string()), Some(fragment));
        }
    }

    #[test]
    fn each_fragment_has_its_own_view() {
        let views: Vec<View> = Fragment::ALL.iter().map(Fragment::view).collect();
        assert_eq!(
            views,
            vec![
                View::LoadPage,
                View::Logout,
                View::Static,
                View::Chat,
                View::AuthForm(AuthKind::Register),
                View::AuthForm(AuthKind::Login),
            ]
        );
    }

    #[test]
    fn auth_forms_name_their_elements() {
        assert_eq!(AuthKind::Login.button(), "login-button");
        assert_eq!(AuthKind::Login.container(), "login-container");
        assert_eq!(AuthKind::Register.button(), "register-button");
        assert_eq!(AuthKind::Register.container(), "register-container");
    }
}
