//! transport
//!
//! The seam between the client and the network.
//!
//! # Design
//!
//! A [`Transport`] performs exactly one GET and hands back the status code
//! and the fully read body. It does not interpret either: status policy and
//! JSON decoding belong to [`MetadataClient`](crate::MetadataClient).
//!
//! Reading the whole body before returning means the connection is released
//! on every path, including decode failures further up.
//!
//! # Modules
//!
//! - [`http`]: reqwest-backed transport used in production
//! - [`mock`]: in-memory transport for deterministic testing

pub mod http;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

pub use http::HttpTransport;
pub use mock::MockTransport;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A transport-level failure: no response was obtained.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    timeout: bool,
    #[source]
    source: Option<BoxError>,
}

impl TransportError {
    /// Create an error with only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timeout: false,
            source: None,
        }
    }

    /// Create an error that records a timeout.
    pub fn timed_out(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timeout: true,
            source: None,
        }
    }

    /// Wrap an underlying cause.
    pub fn with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            timeout: false,
            source: Some(Box::new(source)),
        }
    }

    /// Whether the request was abandoned because the timeout elapsed.
    pub fn is_timeout(&self) -> bool {
        self.timeout
    }
}

/// A response as seen by the client: status plus the complete body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body, fully consumed
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Create a response.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs a single GET against the metadata endpoint.
///
/// Implementations must be safe to share between concurrent lookups; they
/// hold no per-call state.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Fetch `uri` and return its status and body.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] only when no response was received. A
    /// 4xx/5xx response is still `Ok`.
    async fn get(&self, uri: &str) -> Result<RawResponse, TransportError>;
}
