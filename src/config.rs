//! Configuration for the parlor client.
//!
//! [`ClientArgs`] is what the command line says; [`ClientConfig`] is the
//! resolved configuration with defaults filled in.

use std::env;
use std::time::Duration;

use arrrg_derive::CommandLine;
use url::Url;

use crate::error::{Error, Result};
use crate::router::Fragment;

/// Server used when neither `--server` nor `PARLOR_SERVER` is given.
pub const DEFAULT_SERVER: &str = "http://localhost:8080";

/// Environment variable consulted for the server when `--server` is absent.
pub const SERVER_ENV: &str = "PARLOR_SERVER";

/// Path of the chat socket relative to the server.
pub const CHAT_SOCKET_PATH: &str = "/api/chat/ws";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Command-line arguments for the parlor client.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ClientArgs {
    /// Base URL of the chat server.
    #[arrrg(optional, "Server base URL (default: $PARLOR_SERVER or http://localhost:8080)", "URL")]
    pub server: Option<String>,

    /// Where the credential is persisted.
    #[arrrg(optional, "Credential storage file (default: ~/.parlor/storage.json)", "PATH")]
    pub storage: Option<String>,

    /// Keep the credential in memory only.
    #[arrrg(flag, "Do not persist the credential")]
    pub ephemeral: bool,

    /// Request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: 30)", "SECONDS")]
    pub timeout: Option<u64>,

    /// Fragment to open at startup.
    #[arrrg(optional, "Fragment to open at startup (default: home)", "FRAGMENT")]
    pub start: Option<String>,

    /// Revoke the token server side on logout.
    #[arrrg(flag, "Call /api/logout before forgetting the credential")]
    pub revoke_on_logout: bool,

    /// Log requests and frames to stderr.
    #[arrrg(flag, "Log requests and frames to stderr")]
    pub verbose: bool,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the chat server.
    pub server: String,

    /// Credential storage file; `None` keeps the credential in memory.
    pub storage_path: Option<String>,

    /// Timeout applied to every HTTP request.
    pub timeout: Duration,

    /// Fragment opened at startup.
    pub start: Fragment,

    /// Whether logout first calls `/api/logout`.
    pub revoke_on_logout: bool,

    /// Whether requests and frames are logged to stderr.
    pub verbose: bool,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ClientConfig {
    /// Creates a new ClientConfig with default values.
    ///
    /// Defaults:
    /// - Server: http://localhost:8080
    /// - Storage: in memory
    /// - Timeout: 30 seconds
    /// - Start: home
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            storage_path: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            start: Fragment::Home,
            revoke_on_logout: false,
            verbose: false,
            use_color: true,
        }
    }

    /// Sets the server base URL.
    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = server.into();
        self
    }

    /// Persists the credential at `path`.
    pub fn with_storage_path(mut self, path: Option<String>) -> Self {
        self.storage_path = path;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the startup fragment.
    pub fn with_start(mut self, start: Fragment) -> Self {
        self.start = start;
        self
    }

    /// Sets whether logout revokes the token server side.
    pub fn with_revoke_on_logout(mut self, revoke: bool) -> Self {
        self.revoke_on_logout = revoke;
        self
    }

    /// Enables stderr logging.
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// The chat socket URL: the server URL with `http` turned into `ws`,
    /// `https` into `wss`, and the socket path.
    pub fn chat_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.server)?;
        let scheme = match url.scheme() {
            "http" | "ws" => "ws",
            "https" | "wss" => "wss",
            other => {
                return Err(Error::url(
                    format!("cannot derive a websocket URL from scheme {other}"),
                    None,
                ));
            }
        };
        url.set_scheme(scheme)
            .map_err(|_| Error::url(format!("cannot use scheme {scheme}"), None))?;
        url.set_path(CHAT_SOCKET_PATH);
        url.set_query(None);
        url.set_fragment(None);
        Ok(url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// The default credential file under the user's home directory.
pub fn default_storage_path() -> String {
    match env::var("HOME") {
        Ok(home) if !home.is_empty() => format!("{home}/.parlor/storage.json"),
        _ => ".parlor-storage.json".to_string(),
    }
}

impl TryFrom<ClientArgs> for ClientConfig {
    type Error = Error;

    fn try_from(args: ClientArgs) -> Result<Self> {
        let server = args
            .server
            .or_else(|| env::var(SERVER_ENV).ok().filter(|s| !s.is_empty()))
            .unwrap_or_else(|| DEFAULT_SERVER.to_string());
        Url::parse(&server)?;

        let start = match args.start {
            Some(start) => Fragment::parse(&start).ok_or_else(|| {
                Error::validation(format!("unknown fragment {start}"), Some("start".to_string()))
            })?,
            None => Fragment::Home,
        };

        let storage_path = if args.ephemeral {
            None
        } else {
            Some(args.storage.unwrap_or_else(default_storage_path))
        };

        Ok(ClientConfig {
            server,
            storage_path,
            timeout: Duration::from_secs(args.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            start,
            revoke_on_logout: args.revoke_on_logout,
            verbose: args.verbose,
            use_color: !args.no_color,
        })
    }
}
