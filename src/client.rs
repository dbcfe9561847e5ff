use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client as ReqwestClient, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::client_logger::{ClientLogger, NullLogger};
use crate::error::{Error, Result};
use crate::observability::{
    CLIENT_AUTHORIZED_REQUESTS, CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS,
};
use crate::token_store::TokenStore;
use crate::types::{AuthRequest, AuthResponse};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Endpoint that exchanges credentials for a token.
pub const LOGIN_PATH: &str = "/api/login";
/// Endpoint that creates an account.
pub const REGISTER_PATH: &str = "/api/register";
/// Endpoint that revokes the current token server side.
pub const LOGOUT_PATH: &str = "/api/logout";
/// Endpoint that reports whether the service is up.
pub const HEALTH_PATH: &str = "/api/health";

/////////////////////////////////////////////// Request ///////////////////////////////////////////////

/// An outbound HTTP request, relative to the server's base URL.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Path (and query) resolved against the base URL.
    pub path: String,
    /// Request headers.
    pub headers: HeaderMap,
    /// Request body, if any.
    pub body: Option<Bytes>,
}

impl Request {
    /// Create a request with no headers and no body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Create a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Create a POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Add a header, replacing any header of the same name.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Encode `body` as JSON and set `Content-Type: application/json`.
    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(Bytes::from(serde_json::to_vec(body)?));
        self.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        Ok(self)
    }
}

/////////////////////////////////////////////// Response //////////////////////////////////////////////

/// A fully-read HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: Bytes,
}

impl Response {
    /// Create a response with no headers.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body as UTF-8 text.
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.body.to_vec()).map_err(|e| {
            Error::serialization(
                format!("Response body is not UTF-8: {e}"),
                Some(Box::new(e)),
            )
        })
    }

    /// The body decoded as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            Error::serialization(
                format!("Failed to parse response: {e}"),
                Some(Box::new(e)),
            )
        })
    }
}

////////////////////////////////////////////// Transport //////////////////////////////////////////////

/// The capability to deliver a [`Request`] and read back its [`Response`].
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Send `request`.  A non-2xx status is still `Ok`.
    async fn send(&self, request: Request) -> Result<Response>;
}

/// [`Transport`] over `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: ReqwestClient,
    base_url: Url,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Create a transport for the server at `base_url`.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_options(base_url, None)
    }

    /// Create a transport with custom settings.
    pub fn with_options(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// The server's base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a request path against the base URL.
    pub fn resolve(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: Request) -> Result<Response> {
        let url = self.resolve(&request.path)?;

        let mut builder = self
            .client
            .request(request.method, url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::timeout(
                    format!("Request timed out: {}", e),
                    Some(self.timeout.as_secs_f64()),
                )
            } else if e.is_connect() {
                Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
            } else {
                Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
            }
        })?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(|e| {
            Error::http_client(
                format!("Failed to read response: {}", e),
                Some(Box::new(e)),
            )
        })?;

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

///////////////////////////////////////// AuthenticatedClient /////////////////////////////////////////

/// Wraps a [`Transport`] so every request carries the stored credential.
///
/// With a credential present, `Authorization: Bearer {token}` is merged into
/// the request's headers; every other header is left exactly as the caller
/// set it.  Without one, the request is forwarded untouched.
///
/// ```
/// # use std::sync::Arc;
/// # use parlor::{AuthenticatedClient, Request, Response, Result, TokenStore, Transport};
/// struct Echo;
///
/// #[async_trait::async_trait]
/// impl Transport for Echo {
///     async fn send(&self, request: Request) -> Result<Response> {
///         let auth = request.headers.get("authorization").cloned();
///         Ok(Response::new(200, auth.map(|v| v.as_bytes().to_vec()).unwrap_or_default()))
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let client = AuthenticatedClient::new(Arc::new(Echo), TokenStore::in_memory());
/// client.tokens().set_token("T").unwrap();
/// let response = client.fetch(Request::get("/")).await.unwrap();
/// assert_eq!(response.text().unwrap(), "Bearer T");
/// # });
/// ```
#[derive(Clone)]
pub struct AuthenticatedClient {
    transport: Arc<dyn Transport>,
    tokens: TokenStore,
    logger: Arc<dyn ClientLogger>,
}

impl AuthenticatedClient {
    /// Create a client over `transport` reading credentials from `tokens`.
    pub fn new(transport: Arc<dyn Transport>, tokens: TokenStore) -> Self {
        Self {
            transport,
            tokens,
            logger: Arc::new(NullLogger),
        }
    }

    /// Attach a logger.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// The token store this client reads from.
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Apply the stored credential to `request`.
    pub fn authorize(&self, mut request: Request) -> Result<Request> {
        if let Some(credential) = self.tokens.get_token()? {
            let value = HeaderValue::from_str(&credential.bearer()).map_err(|_| {
                Error::validation(
                    "stored token cannot be sent as a header value",
                    Some("token".to_string()),
                )
            })?;
            request.headers.insert(header::AUTHORIZATION, value);
            CLIENT_AUTHORIZED_REQUESTS.click();
        }
        Ok(request)
    }

    /// Authorize `request` and hand it to the transport.
    ///
    /// The transport's result is returned unmodified.
    pub async fn fetch(&self, request: Request) -> Result<Response> {
        let request = self.authorize(request)?;
        CLIENT_REQUESTS.click();
        self.logger.log_request(&request);

        let start = Instant::now();
        let result = self.transport.send(request.clone()).await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());

        match &result {
            Ok(response) => self.logger.log_response(&request, response),
            Err(err) => {
                CLIENT_REQUEST_ERRORS.click();
                self.logger.log_request_error(&request, err);
            }
        }
        result
    }

    /// Fetch the markup for `page` (`""` is the root page).
    ///
    /// A non-2xx status is an [`Error::Api`] naming the status.
    pub async fn load_page(&self, page: &str) -> Result<String> {
        let response = self.fetch(Request::get(format!("/{page}"))).await?;
        if !response.is_success() {
            return Err(Error::api(
                response.status,
                format!("Response status is {}, not available", response.status),
            ));
        }
        response.text()
    }

    /// POST `body` as JSON and decode the JSON reply.
    ///
    /// The reply is decoded whatever the HTTP status, because the server
    /// reports refused credentials as a 400 with a JSON body.
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.fetch(Request::post(path).with_json(body)?).await?;
        response.json()
    }

    /// Exchange credentials for a token.
    pub async fn login(&self, credentials: &AuthRequest) -> Result<AuthResponse> {
        self.post_json(LOGIN_PATH, credentials).await
    }

    /// Create an account.
    pub async fn register(&self, credentials: &AuthRequest) -> Result<AuthResponse> {
        self.post_json(REGISTER_PATH, credentials).await
    }

    /// Revoke the current token server side.
    pub async fn revoke(&self) -> Result<AuthResponse> {
        let response = self.fetch(Request::post(LOGOUT_PATH)).await?;
        if response.status == 401 {
            return Err(Error::authentication("not logged in"));
        }
        response.json()
    }

    /// Ask the server whether it is up.
    pub async fn health(&self) -> Result<AuthResponse> {
        let response = self.fetch(Request::get(HEALTH_PATH)).await?;
        if !response.is_success() {
            return Err(Error::api(
                response.status,
                format!("Response status is {}, not available", response.status),
            ));
        }
        response.json()
    }
}

impl std::fmt::Debug for AuthenticatedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedClient")
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}
