//! Logging trait for client operations.
//!
//! This module provides the [`ClientLogger`] trait that captures every request,
//! response and chat frame passing through a session, along with the events
//! the client deliberately drops.

use std::io::{self, Write};

use time::OffsetDateTime;
use time::macros::format_description;

use crate::client::{Request, Response};
use crate::error::Error;

/// A trait for logging client operations.
///
/// Every method has an empty default so implementors only override what they
/// record.
///
/// # Example
///
/// ```rust,ignore
/// use parlor::{ClientLogger, Request};
///
/// struct Paths(std::sync::Mutex<Vec<String>>);
///
/// impl ClientLogger for Paths {
///     fn log_request(&self, request: &Request) {
///         self.0.lock().unwrap().push(request.path.clone());
///     }
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Called before a request is handed to the transport.
    fn log_request(&self, request: &Request) {
        _ = request;
    }

    /// Called once per completed request.
    fn log_response(&self, request: &Request, response: &Response) {
        _ = request;
        _ = response;
    }

    /// Called once per failed request.
    fn log_request_error(&self, request: &Request, error: &Error) {
        _ = request;
        _ = error;
    }

    /// Called when the router dispatches (or ignores) a fragment.
    fn log_navigation(&self, fragment: &str, handled: bool) {
        _ = fragment;
        _ = handled;
    }

    /// Called for each frame queued on a chat socket.
    fn log_frame_sent(&self, frame: &str) {
        _ = frame;
    }

    /// Called for each frame read from a chat socket.
    fn log_frame_received(&self, frame: &str) {
        _ = frame;
    }

    /// Called when an inbound frame cannot be shown and is discarded.
    fn log_dropped_frame(&self, frame: &str, reason: &str) {
        _ = frame;
        _ = reason;
    }

    /// Called when a chat socket closes.
    fn log_socket_closed(&self, reason: Option<&str>) {
        _ = reason;
    }

    /// Called for failures a handler absorbs instead of returning.
    fn log_error(&self, error: &Error) {
        _ = error;
    }
}

/// A logger that records nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl ClientLogger for NullLogger {}

/// A logger that writes one timestamped line per event to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrLogger;

impl StderrLogger {
    fn line(&self, what: &str, detail: &str) {
        let now = OffsetDateTime::now_utc()
            .format(format_description!(
                "[hour]:[minute]:[second].[subsecond digits:3]"
            ))
            .unwrap_or_else(|_| "--:--:--.---".to_string());
        let _ = writeln!(io::stderr().lock(), "[{now}] {what}: {detail}");
    }
}

impl ClientLogger for StderrLogger {
    fn log_request(&self, request: &Request) {
        self.line("request", &format!("{} {}", request.method, request.path));
    }

    fn log_response(&self, request: &Request, response: &Response) {
        self.line(
            "response",
            &format!(
                "{} {} -> {} ({} bytes)",
                request.method,
                request.path,
                response.status,
                response.body.len()
            ),
        );
    }

    fn log_request_error(&self, request: &Request, error: &Error) {
        self.line(
            "request failed",
            &format!("{} {}: {error}", request.method, request.path),
        );
    }

    fn log_navigation(&self, fragment: &str, handled: bool) {
        if handled {
            self.line("navigate", fragment);
        } else {
            self.line("navigate (ignored)", fragment);
        }
    }

    fn log_frame_sent(&self, frame: &str) {
        if frame.contains("\"token\"") {
            self.line("frame sent", "<auth>");
        } else {
            self.line("frame sent", frame);
        }
    }

    fn log_frame_received(&self, frame: &str) {
        self.line("frame received", frame);
    }

    fn log_dropped_frame(&self, frame: &str, reason: &str) {
        self.line("frame dropped", &format!("{reason}: {frame}"));
    }

    fn log_socket_closed(&self, reason: Option<&str>) {
        self.line("socket closed", reason.unwrap_or("no reason given"));
    }

    fn log_error(&self, error: &Error) {
        self.line("error", &error.to_string());
    }
}
