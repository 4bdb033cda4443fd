//! transport::http
//!
//! reqwest-backed [`Transport`].
//!
//! The underlying `reqwest::Client` is configured with a single total
//! timeout that covers connecting, sending, and reading the body. Clones of
//! an `HttpTransport` share one connection pool.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{RawResponse, Transport, TransportError};

/// User-Agent header value for metadata requests.
pub(crate) const USER_AGENT_VALUE: &str = concat!("ecs-whoami/", env!("CARGO_PKG_VERSION"));

/// HTTP transport with a fixed total timeout.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpTransport {
    /// Build a transport whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Fails only if the HTTP client cannot be initialized (for example the
    /// TLS backend is unavailable).
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT_VALUE)
            .build()
            .map_err(TransportError::from)?;
        Ok(Self { client, timeout })
    }

    /// The configured total timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError {
            message: err.to_string(),
            timeout: err.is_timeout(),
            source: Some(Box::new(err)),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, uri: &str) -> Result<RawResponse, TransportError> {
        let response = self.client.get(uri).send().await?;
        let status = response.status().as_u16();
        // Consumes the response, so the connection goes back to the pool
        // before any decoding happens.
        let body = response.bytes().await?;
        Ok(RawResponse::new(status, body.to_vec()))
    }
}
