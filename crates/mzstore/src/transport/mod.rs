//! Request execution layer.
//!
//! Flows build plain [`reqwest::Request`] values and hand them to a
//! [`Transport`], so retry/logging/mock wrappers can be swapped in without
//! touching protocol code. Implementations must NOT follow redirects: the
//! login endpoint answers with a 302 when a request lands on the wrong
//! backend pod, and the authentication flow resolves those hops itself.

mod endpoints;

pub use endpoints::Endpoints;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::redirect::Policy;
use thiserror::Error;
use tracing::debug;

/// Protocol header names (lowercase for the `http` crate).
pub(crate) const HEADER_STORE_FRONT: &str = "x-apple-store-front";
pub(crate) const HEADER_DSID: &str = "x-dsid";
pub(crate) const HEADER_TOKEN: &str = "x-token";
pub(crate) const HEADER_TIME_ZONE: &str = "x-apple-tz";

/// Content types the protocol uses.
pub(crate) const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";
pub(crate) const CONTENT_TYPE_PLIST: &str = "application/x-apple-plist";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from request execution.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("request to '{url}' failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read response body from '{url}'")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Abstract request executor.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response, TransportError>;
}

/// Default transport over a [`reqwest::Client`] with redirect-following
/// disabled. Timeouts live here; the flows impose none of their own.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, TransportError> {
        Self::builder().build()
    }

    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: None,
        }
    }
}

pub struct HttpTransportBuilder {
    timeout: Duration,
    connect_timeout: Option<Duration>,
}

impl HttpTransportBuilder {
    /// Override the whole-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<HttpTransport, TransportError> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .redirect(Policy::none());

        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }

        let client = builder.build().map_err(TransportError::Client)?;

        Ok(HttpTransport { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response, TransportError> {
        let url = request.url().to_string();
        debug!(method = %request.method(), %url, "executing request");

        self.client
            .execute(request)
            .await
            .map_err(|source| TransportError::Request { url, source })
    }
}

/// Read a response body to completion.
pub(crate) async fn read_body(response: reqwest::Response) -> Result<Vec<u8>, TransportError> {
    let url = response.url().to_string();
    let bytes = response
        .bytes()
        .await
        .map_err(|source| TransportError::Body { url, source })?;

    Ok(bytes.to_vec())
}
