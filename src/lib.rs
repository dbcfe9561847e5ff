// Public modules
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod config;
pub mod dom;
pub mod error;
pub mod event;
pub mod render;
pub mod repl;
pub mod router;
pub mod session;
pub mod status;
pub mod token_store;
pub mod types;

mod observability;

// Re-exports
pub use chat::{ChatSessionController, ChatState, Connector, SocketEvents, SocketHandle};
pub use client::{AuthenticatedClient, ReqwestTransport, Request, Response, Transport};
pub use client_logger::{ClientLogger, NullLogger, StderrLogger};
pub use config::{ClientArgs, ClientConfig};
pub use dom::{Document, Line, Listener, Style};
pub use error::{Error, Result};
pub use event::{Event, Key, SessionId, Submission, Trigger};
pub use observability::register_biometrics;
pub use render::{PlainTextRenderer, Renderer};
pub use router::{AuthKind, Fragment, Router, View};
pub use session::SessionContext;
pub use status::StatusReporter;
pub use token_store::{Credential, DurableStorage, FileStorage, MemoryStorage, TokenStore};
pub use types::*;
