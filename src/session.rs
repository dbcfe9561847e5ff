//! The state every component shares, passed explicitly.

use std::sync::Arc;

use crate::chat::{Connector, TungsteniteConnector};
use crate::client::{AuthenticatedClient, ReqwestTransport, Transport};
use crate::client_logger::{ClientLogger, NullLogger, StderrLogger};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::token_store::{DurableStorage, FileStorage, MemoryStorage, TokenStore};

/// Everything the router and the chat controller need from the outside.
///
/// Cloning is cheap and clones share the same token store, transport,
/// connector and logger.
#[derive(Clone)]
pub struct SessionContext {
    config: ClientConfig,
    tokens: TokenStore,
    client: AuthenticatedClient,
    connector: Arc<dyn Connector>,
    logger: Arc<dyn ClientLogger>,
}

impl SessionContext {
    /// Assemble a context from its parts.
    pub fn new(
        config: ClientConfig,
        storage: Arc<dyn DurableStorage>,
        transport: Arc<dyn Transport>,
        connector: Arc<dyn Connector>,
    ) -> Self {
        let tokens = TokenStore::new(storage);
        let client = AuthenticatedClient::new(transport, tokens.clone());
        Self {
            config,
            tokens,
            client,
            connector,
            logger: Arc::new(NullLogger),
        }
    }

    /// Build the real thing: file or memory storage, `reqwest` and
    /// `tokio-tungstenite`, and a stderr logger when verbose.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let storage: Arc<dyn DurableStorage> = match &config.storage_path {
            Some(path) => Arc::new(FileStorage::new(path)),
            None => Arc::new(MemoryStorage::new()),
        };
        let transport = ReqwestTransport::with_options(&config.server, Some(config.timeout))?;
        let verbose = config.verbose;
        let context = Self::new(
            config,
            storage,
            Arc::new(transport),
            Arc::new(TungsteniteConnector::new()),
        );
        if verbose {
            Ok(context.with_logger(Arc::new(StderrLogger)))
        } else {
            Ok(context)
        }
    }

    /// Attach a logger to the context and its request client.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.client = self.client.with_logger(logger.clone());
        self.logger = logger;
        self
    }

    /// The resolved configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The credential holder.
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// The authenticated request client.
    pub fn client(&self) -> &AuthenticatedClient {
        &self.client
    }

    /// The socket connector.
    pub fn connector(&self) -> &dyn Connector {
        self.connector.as_ref()
    }

    /// The logger.
    pub fn logger(&self) -> &Arc<dyn ClientLogger> {
        &self.logger
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("config", &self.config)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn client_and_context_share_tokens() {
        let context = SessionContext::from_config(ClientConfig::new()).unwrap();
        context.tokens().set_token("T").unwrap();
        assert_eq!(
            context.client().tokens().get_token().unwrap().unwrap().as_str(),
            "T"
        );
    }

    #[test]
    fn bad_server_is_rejected() {
        let config = ClientConfig::new().with_server("nope");
        assert!(SessionContext::from_config(config).is_err());
    }
}
