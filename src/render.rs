//! Output rendering for the terminal front end.
//!
//! A [`Renderer`] shows document changes as they happen.  The plain-text
//! implementation prefixes each line with its container and paints
//! error-styled lines red.

use std::io::{self, Write};

use crate::dom::{Change, Line, Style};

/// ANSI escape code for dim text (used for container labels).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for fragments).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for red text (used for error lines).
const ANSI_RED: &str = "\x1b[31m";

/// Trait for rendering document changes.
///
/// This abstraction allows for different rendering strategies:
/// - Plain text with ANSI styling
/// - Plain text without styling (for piping/redirecting)
pub trait Renderer: Send {
    /// Show a line appended to `container`.
    fn print_line(&mut self, container: &str, line: &Line);

    /// Show a freshly loaded page body.
    fn print_body(&mut self, markup: &str);

    /// Show the fragment the client is now on.
    fn print_fragment(&mut self, fragment: &str);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Show every change, in order.
    fn render(&mut self, changes: &[Change]) {
        for change in changes {
            match change {
                Change::BodyReplaced(markup) => self.print_body(markup),
                Change::Appended { container, line } => self.print_line(container, line),
                Change::Fragment(fragment) => self.print_fragment(fragment),
            }
        }
    }
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer<W: Write + Send = io::Stdout> {
    out: W,
    use_color: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer on stdout with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer on stdout with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self::with_writer(io::stdout(), use_color)
    }
}

impl<W: Write + Send> PlainTextRenderer<W> {
    /// Creates a renderer writing to `out`.
    pub fn with_writer(out: W, use_color: bool) -> Self {
        Self { out, use_color }
    }

    /// Gives back the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
        let _ = self.out.flush();
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> Renderer for PlainTextRenderer<W> {
    fn print_line(&mut self, container: &str, line: &Line) {
        let text = match (self.use_color, line.style) {
            (true, Style::Error) => format!(
                "{ANSI_DIM}[{container}]{ANSI_RESET} {ANSI_RED}{}{ANSI_RESET}",
                line.text
            ),
            (true, Style::Plain) => format!("{ANSI_DIM}[{container}]{ANSI_RESET} {}", line.text),
            (false, Style::Error) => format!("[{container}] !! {}", line.text),
            (false, Style::Plain) => format!("[{container}] {}", line.text),
        };
        self.write_line(&text);
    }

    fn print_body(&mut self, markup: &str) {
        let markup = markup.trim_end();
        if markup.is_empty() {
            return;
        }
        self.write_line(markup);
    }

    fn print_fragment(&mut self, fragment: &str) {
        if self.use_color {
            self.write_line(&format!("{ANSI_CYAN}{fragment}{ANSI_RESET}"));
        } else {
            self.write_line(fragment);
        }
    }

    fn print_error(&mut self, error: &str) {
        if self.use_color {
            self.write_line(&format!("{ANSI_RED}Error: {error}{ANSI_RESET}"));
        } else {
            self.write_line(&format!("Error: {error}"));
        }
    }

    fn print_info(&mut self, info: &str) {
        self.write_line(info);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(use_color: bool, changes: &[Change]) -> String {
        let mut renderer = PlainTextRenderer::with_writer(Vec::new(), use_color);
        renderer.render(changes);
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn renderer_default_has_color() {
        let renderer = PlainTextRenderer::new();
        assert!(renderer.use_color);
    }

    #[test]
    fn renderer_without_color() {
        let renderer = PlainTextRenderer::with_color(false);
        assert!(!renderer.use_color);
    }

    #[test]
    fn plain_output_in_order() {
        let out = rendered(
            false,
            &[
                Change::BodyReplaced("<h1>Chat</h1>\n".to_string()),
                Change::Fragment("#home".to_string()),
                Change::Appended {
                    container: "chat-container".to_string(),
                    line: Line::plain("bob (10:00): hi"),
                },
                Change::Appended {
                    container: "chat-container".to_string(),
                    line: Line::error("Websocket closed. Please reload."),
                },
            ],
        );
        assert_eq!(
            out,
            "<h1>Chat</h1>\n#home\n[chat-container] bob (10:00): hi\n[chat-container] !! Websocket closed. Please reload.\n"
        );
    }

    #[test]
    fn error_lines_are_red() {
        let out = rendered(
            true,
            &[Change::Appended {
                container: "chat-container".to_string(),
                line: Line::error("Websocket closed. Please reload."),
            }],
        );
        assert!(out.contains(&format!("{ANSI_RED}Websocket closed. Please reload.{ANSI_RESET}")));
    }
}
