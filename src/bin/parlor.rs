//! Terminal client for the chat server.
//!
//! # Usage
//!
//! ```bash
//! # Talk to a local server, persisting the credential in ~/.parlor
//! parlor
//!
//! # Another server, credential kept in memory only
//! parlor --server https://chat.example.com --ephemeral
//!
//! # Start on the login page and log traffic to stderr
//! parlor --start login --verbose
//! ```
//!
//! # Commands
//!
//! - `#chat`, `#home`, ... - Navigate
//! - `/login <user> <password>` - Log in
//! - `/register <user> <password>` - Create an account
//! - anything else - Send a chat message
//! - `/help` - Show every command
//! - `/quit` - Exit

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;

use parlor::repl::{ReplCommand, help_text, parse_command, say};
use parlor::{
    ClientArgs, ClientConfig, Document, Event, PlainTextRenderer, Renderer, Router,
    SessionContext, event,
};

/// Main entry point for the parlor client.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ClientArgs::from_command_line_relaxed("parlor [OPTIONS]");
    let config = ClientConfig::try_from(args)?;
    let start = config.start;
    let mut renderer = PlainTextRenderer::with_color(config.use_color);

    let context = SessionContext::from_config(config)?;
    let (events_tx, mut events_rx) = event::channel();
    let mut router = Router::new(context, events_tx.clone());
    let mut document = Document::new();

    let mut lines = spawn_line_reader();

    println!("parlor ({})", router.context().config().server);
    println!("Type /help for commands, /quit to exit\n");
    events_tx.send(Event::navigate(start.to_string()))?;

    loop {
        tokio::select! {
            line = lines.recv() => {
                let Some(Some(line)) = line else {
                    println!("\nGoodbye!");
                    break;
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let events = match parse_command(line) {
                    None => say(line),
                    Some(command) => match command.events() {
                        Some(events) => events,
                        None => {
                            if answer(&command, &router, &document, &mut renderer).await {
                                println!("Goodbye!");
                                break;
                            }
                            continue;
                        }
                    },
                };
                for event in events {
                    events_tx.send(event)?;
                }
            }
            Some(event) = events_rx.recv() => {
                if let Err(err) = router.handle(&mut document, event).await {
                    renderer.print_error(&err.to_string());
                }
                renderer.render(&document.take_changes());
            }
        }
    }

    Ok(())
}

/// Reads lines on a dedicated thread; `None` means input ended.
fn spawn_line_reader() -> mpsc::UnboundedReceiver<Option<String>> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(err) => {
                eprintln!("Input error: {err}");
                let _ = tx.send(None);
                return;
            }
        };
        loop {
            match rl.readline("> ") {
                Ok(line) => {
                    let _ = rl.add_history_entry(line.as_str());
                    if tx.send(Some(line)).is_err() {
                        break;
                    }
                }
                // Ctrl+C at the prompt only clears the line.
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => {
                    let _ = tx.send(None);
                    break;
                }
                Err(err) => {
                    eprintln!("Input error: {err}");
                    let _ = tx.send(None);
                    break;
                }
            }
        }
    });
    rx
}

/// Handles commands that are not page events.  Returns true to quit.
async fn answer(
    command: &ReplCommand,
    router: &Router,
    document: &Document,
    renderer: &mut PlainTextRenderer,
) -> bool {
    match command {
        ReplCommand::Quit => return true,
        ReplCommand::Help => {
            for line in help_text().lines() {
                println!("    {}", line);
            }
        }
        ReplCommand::Show(container) => {
            let lines = document.lines(container);
            if lines.is_empty() {
                renderer.print_info(&format!("{container} is empty"));
            }
            for line in lines {
                renderer.print_line(container, line);
            }
        }
        ReplCommand::Health => match router.context().client().health().await {
            Ok(health) => renderer.print_info(&health.message),
            Err(err) => renderer.print_error(&err.to_string()),
        },
        ReplCommand::Whoami => match router.context().tokens().get_token() {
            Ok(Some(credential)) => match credential.username() {
                Some(name) => renderer.print_info(&format!("Logged in as {name}")),
                None => renderer.print_info("Logged in"),
            },
            Ok(None) => renderer.print_info("Not logged in"),
            Err(err) => renderer.print_error(&err.to_string()),
        },
        ReplCommand::Where => {
            let fragment = router
                .current()
                .map(|f| f.to_string())
                .unwrap_or_else(|| "(nowhere)".to_string());
            match router.chat() {
                Some(chat) => renderer.print_info(&format!(
                    "{fragment} (chat {:?}, {} sent, {} received)",
                    chat.state(),
                    chat.sent(),
                    chat.received()
                )),
                None => renderer.print_info(&fragment),
            }
        }
        ReplCommand::Invalid(message) => renderer.print_error(message),
        ReplCommand::Go(_)
        | ReplCommand::Set { .. }
        | ReplCommand::Click(_)
        | ReplCommand::Enter(_)
        | ReplCommand::Login { .. }
        | ReplCommand::Register { .. } => {}
    }
    false
}
