//! Transient status lines.

use crate::dom::{Document, Line};

/// Suggestion appended to successful outcomes.
pub const HOME_SUGGESTION: &str = "go to the home page";

/// Suggestion appended to refused or failed attempts.
pub const RETRY_SUGGESTION: &str = "try again";

/// Appends `"{message}, {suggestion}"` lines to named containers.
///
/// Earlier lines are never cleared; status accumulates.
#[derive(Debug, Default, Clone, Copy)]
pub struct StatusReporter;

impl StatusReporter {
    /// Append `"{message}, {suggestion}"` to `container`.
    pub fn report(&self, document: &mut Document, container: &str, message: &str, suggestion: &str) {
        document.append(container, Line::plain(format!("{message}, {suggestion}")));
    }

    /// Append `message` with the default suggestion to go home.
    pub fn report_default(&self, document: &mut Document, container: &str, message: &str) {
        self.report(document, container, message, HOME_SUGGESTION);
    }
}
