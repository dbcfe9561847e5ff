//! Line commands for the terminal front end.
//!
//! Lines starting with `/` are commands and lines starting with `#` are
//! fragment changes.  Anything else is typed into the chat message field and
//! submitted with Enter, the same way a user would in the page.

use crate::chat::{CHAT_CONTAINER, MESSAGE_FIELD};
use crate::event::Event;
use crate::router::{AuthKind, Fragment, PASSWORD_FIELD, USERNAME_FIELD};

/// A parsed line command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Change the fragment.
    Go(String),
    /// Type `value` into `field`.
    Set {
        /// Field id.
        field: String,
        /// New value.
        value: String,
    },
    /// Click an element.
    Click(String),
    /// Press Enter inside a container.
    Enter(String),
    /// Open `#login` and submit the given credentials.
    Login {
        /// Account name.
        username: String,
        /// Password.
        password: String,
    },
    /// Open `#register` and submit the given credentials.
    Register {
        /// Account name.
        username: String,
        /// Password.
        password: String,
    },
    /// Print a container's lines.
    Show(String),
    /// Ask the server whether it is up.
    Health,
    /// Show who the stored credential belongs to.
    Whoami,
    /// Show the current fragment and chat state.
    Where,
    /// Display help information.
    Help,
    /// Exit.
    Quit,
    /// Report a parsing error back to the caller.
    Invalid(String),
}

impl ReplCommand {
    /// The events this command stands for, or `None` for commands the
    /// front end answers itself.
    pub fn events(&self) -> Option<Vec<Event>> {
        match self {
            ReplCommand::Go(fragment) => Some(vec![Event::navigate(fragment.clone())]),
            ReplCommand::Set { field, value } => {
                Some(vec![Event::input(field.clone(), value.clone())])
            }
            ReplCommand::Click(element) => Some(vec![Event::click(element.clone())]),
            ReplCommand::Enter(container) => Some(vec![Event::enter(container.clone())]),
            ReplCommand::Login { username, password } => {
                Some(form_events(AuthKind::Login, username, password))
            }
            ReplCommand::Register { username, password } => {
                Some(form_events(AuthKind::Register, username, password))
            }
            ReplCommand::Show(_)
            | ReplCommand::Health
            | ReplCommand::Whoami
            | ReplCommand::Where
            | ReplCommand::Help
            | ReplCommand::Quit
            | ReplCommand::Invalid(_) => None,
        }
    }
}

fn form_events(kind: AuthKind, username: &str, password: &str) -> Vec<Event> {
    let fragment = match kind {
        AuthKind::Login => Fragment::Login,
        AuthKind::Register => Fragment::Register,
    };
    vec![
        Event::navigate(fragment.to_string()),
        Event::input(USERNAME_FIELD, username),
        Event::input(PASSWORD_FIELD, password),
        Event::click(kind.button()),
    ]
}

/// The events for typing `text` into the chat and pressing Enter.
pub fn say(text: &str) -> Vec<Event> {
    vec![
        Event::input(MESSAGE_FIELD, text),
        Event::enter(CHAT_CONTAINER),
    ]
}

/// Parses a line.
///
/// Returns `Some(ReplCommand)` for commands and fragments, or `None` if the
/// line is a chat message.
///
/// # Examples
///
/// ```
/// # use parlor::repl::{ReplCommand, parse_command};
/// assert_eq!(parse_command("/quit"), Some(ReplCommand::Quit));
/// assert_eq!(parse_command("#chat"), Some(ReplCommand::Go("#chat".to_string())));
/// assert!(parse_command("hello everyone").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ReplCommand> {
    let input = input.trim();

    if input.starts_with('#') {
        return Some(ReplCommand::Go(input.to_string()));
    }
    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "go" => match argument {
            Some(fragment) => ReplCommand::Go(fragment.to_string()),
            None => ReplCommand::Invalid("/go requires a fragment".to_string()),
        },
        "set" => match argument.and_then(|arg| arg.split_once(' ')) {
            Some((field, value)) => ReplCommand::Set {
                field: field.to_string(),
                value: value.trim_start().to_string(),
            },
            None => match argument {
                Some(field) => ReplCommand::Set {
                    field: field.to_string(),
                    value: String::new(),
                },
                None => ReplCommand::Invalid("/set requires a field name".to_string()),
            },
        },
        "click" => match argument {
            Some(element) => ReplCommand::Click(element.to_string()),
            None => ReplCommand::Invalid("/click requires an element id".to_string()),
        },
        "enter" => match argument {
            Some(container) => ReplCommand::Enter(container.to_string()),
            None => ReplCommand::Invalid("/enter requires a container id".to_string()),
        },
        "login" => match parse_credentials(argument) {
            Some((username, password)) => ReplCommand::Login { username, password },
            None => ReplCommand::Invalid("/login requires a username and a password".to_string()),
        },
        "register" => match parse_credentials(argument) {
            Some((username, password)) => ReplCommand::Register { username, password },
            None => {
                ReplCommand::Invalid("/register requires a username and a password".to_string())
            }
        },
        "show" => ReplCommand::Show(argument.unwrap_or(CHAT_CONTAINER).to_string()),
        "health" => ReplCommand::Health,
        "whoami" => ReplCommand::Whoami,
        "where" => ReplCommand::Where,
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        _ => ReplCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

fn parse_credentials(argument: Option<&str>) -> Option<(String, String)> {
    let (username, password) = argument?.split_once(' ')?;
    let password = password.trim();
    if password.is_empty() {
        return None;
    }
    Some((username.to_string(), password.to_string()))
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  #<fragment>                  Navigate (home, logout, feedback, chat, register, login)
  /go <fragment>               Same as #<fragment>
  /login <user> <password>     Open #login and submit
  /register <user> <password>  Open #register and submit
  /set <field> <value>         Type into an input field
  /click <element>             Click an element
  /enter <container>           Press Enter inside a container
  /show [container]            Print a container (default: chat-container)
  /health                      Ask the server whether it is up
  /whoami                      Show who the stored credential belongs to
  /where                       Show the current fragment
  /help                        Show this help message
  /quit                        Exit
Anything else is sent as a chat message."#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quit_commands() {
        assert_eq!(parse_command("/quit"), Some(ReplCommand::Quit));
        assert_eq!(parse_command("/exit"), Some(ReplCommand::Quit));
        assert_eq!(parse_command("/q"), Some(ReplCommand::Quit));
        assert_eq!(parse_command("  /quit  "), Some(ReplCommand::Quit));
    }

    #[test]
    fn parse_fragments() {
        assert_eq!(
            parse_command("#login"),
            Some(ReplCommand::Go("#login".to_string()))
        );
        assert_eq!(
            parse_command("/go chat"),
            Some(ReplCommand::Go("chat".to_string()))
        );
        assert_eq!(
            parse_command("/go"),
            Some(ReplCommand::Invalid("/go requires a fragment".to_string()))
        );
    }

    #[test]
    fn parse_set_keeps_spaces_in_value() {
        assert_eq!(
            parse_command("/set message-field hello   there"),
            Some(ReplCommand::Set {
                field: "message-field".to_string(),
                value: "hello   there".to_string()
            })
        );
        assert_eq!(
            parse_command("/set message-field"),
            Some(ReplCommand::Set {
                field: "message-field".to_string(),
                value: String::new()
            })
        );
    }

    #[test]
    fn parse_login() {
        assert_eq!(
            parse_command("/login alice p"),
            Some(ReplCommand::Login {
                username: "alice".to_string(),
                password: "p".to_string()
            })
        );
        assert!(matches!(
            parse_command("/login alice"),
            Some(ReplCommand::Invalid(msg)) if msg.contains("requires")
        ));
    }

    #[test]
    fn login_events_fill_and_click() {
        let events = parse_command("/login alice p").unwrap().events().unwrap();
        assert_eq!(
            events,
            vec![
                Event::navigate("#login"),
                Event::input("username", "alice"),
                Event::input("password", "p"),
                Event::click("login-button"),
            ]
        );
    }

    #[test]
    fn say_types_then_presses_enter() {
        assert_eq!(
            say("hi"),
            vec![
                Event::input("message-field", "hi"),
                Event::enter("chat-container")
            ]
        );
    }

    #[test]
    fn local_commands_have_no_events() {
        assert_eq!(parse_command("/health").unwrap().events(), None);
        assert_eq!(
            parse_command("/show").unwrap(),
            ReplCommand::Show("chat-container".to_string())
        );
        assert!(matches!(
            parse_command("/bogus"),
            Some(ReplCommand::Invalid(msg)) if msg == "Unknown command: /bogus"
        ));
    }

    #[test]
    fn non_commands() {
        assert_eq!(parse_command("Hello, everyone!"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
    }

    #[test]
    fn help_text_not_empty() {
        let help = help_text();
        assert!(help.contains("/quit"));
        assert!(help.contains("/login"));
        assert!(help.contains("#<fragment>"));
    }
}
