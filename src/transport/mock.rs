//! transport::mock
//!
//! Mock transport for deterministic testing.
//!
//! # Design
//!
//! The mock answers every GET with a canned outcome and records each
//! requested URI, so tests can assert how many network calls a lookup made
//! (including zero).
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use ecs_whoami::transport::MockTransport;
//! use ecs_whoami::{ClientConfig, MetadataClient};
//!
//! # tokio_test::block_on(async {
//! let transport = MockTransport::with_json(200, r#"{"Name": "nginx-curl"}"#);
//! let client = MetadataClient::with_transport(ClientConfig::default(), Arc::new(transport.clone()));
//!
//! let meta = client.lookup_uri("http://metadata.test/v3").await.unwrap();
//! assert_eq!(meta.name, "nginx-curl");
//! assert_eq!(transport.request_count(), 1);
//! # });
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{RawResponse, Transport, TransportError};

/// Mock transport for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

#[derive(Debug)]
struct MockTransportInner {
    /// Outcome returned for every request.
    outcome: MockOutcome,
    /// URIs requested, in order.
    requests: Vec<String>,
}

/// What the mock does when asked for a URI.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Respond with the given status and body.
    Respond(RawResponse),
    /// Fail as if the connection could not be made.
    Fail(String),
    /// Fail as if the timeout elapsed.
    TimeOut,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    /// Create a mock that answers `200` with an empty JSON object.
    pub fn new() -> Self {
        Self::with_outcome(MockOutcome::Respond(RawResponse::new(200, "{}")))
    }

    /// Create a mock that answers with `status` and `body`.
    pub fn with_json(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self::with_outcome(MockOutcome::Respond(RawResponse::new(status, body)))
    }

    /// Create a mock with an explicit outcome.
    pub fn with_outcome(outcome: MockOutcome) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockTransportInner {
                outcome,
                requests: Vec::new(),
            })),
        }
    }

    /// Replace the outcome for subsequent requests.
    pub fn set_outcome(&self, outcome: MockOutcome) {
        let mut inner = self.inner.lock().unwrap();
        inner.outcome = outcome;
    }

    /// Number of GETs performed so far.
    pub fn request_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.requests.len()
    }

    /// Every requested URI, in order.
    pub fn requests(&self) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        inner.requests.clone()
    }

    /// Clear recorded requests.
    pub fn clear_requests(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.clear();
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, uri: &str) -> Result<RawResponse, TransportError> {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.push(uri.to_string());

        match &inner.outcome {
            MockOutcome::Respond(response) => Ok(response.clone()),
            MockOutcome::Fail(message) => Err(TransportError::new(message.clone())),
            MockOutcome::TimeOut => Err(TransportError::timed_out("operation timed out")),
        }
    }
}
