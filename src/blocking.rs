//! blocking
//!
//! Synchronous lookup for callers without an async runtime.
//!
//! Same contract as [`MetadataClient`](crate::MetadataClient): same error
//! order, same status policy, same decoding. Do not call this from inside
//! an async runtime; `reqwest::blocking` panics there.
//!
//! Requires the `blocking` feature.

use reqwest::blocking::Client;

use crate::client::{interpret, resolve_uri};
use crate::config::ClientConfig;
use crate::error::LookupError;
use crate::metadata::Metadata;
use crate::transport::http::USER_AGENT_VALUE;
use crate::transport::{RawResponse, TransportError};

/// Blocking client for the ECS container metadata endpoint.
#[derive(Clone)]
pub struct BlockingMetadataClient {
    config: ClientConfig,
    client: Client,
}

impl std::fmt::Debug for BlockingMetadataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingMetadataClient")
            .field("config", &self.config)
            .finish()
    }
}

impl BlockingMetadataClient {
    /// Create a client with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::ClientBuild`] if the HTTP client cannot be
    /// initialized.
    pub fn new() -> Result<Self, LookupError> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::InvalidConfig`] if `config` fails
    /// [`ClientConfig::validate`], and [`LookupError::ClientBuild`] if the
    /// HTTP client cannot be initialized.
    pub fn with_config(config: ClientConfig) -> Result<Self, LookupError> {
        config.validate().map_err(LookupError::InvalidConfig)?;
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT_VALUE)
            .build()
            .map_err(|e| LookupError::ClientBuild(TransportError::from(e)))?;
        Ok(Self { config, client })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Look up this container's metadata, blocking the current thread.
    ///
    /// # Errors
    ///
    /// As [`MetadataClient::lookup`](crate::MetadataClient::lookup).
    pub fn lookup(&self) -> Result<Metadata, LookupError> {
        let uri = resolve_uri(&self.config.env_var)?;
        self.lookup_uri(&uri)
    }

    /// Fetch and decode metadata from `uri`, bypassing the environment.
    ///
    /// # Errors
    ///
    /// As [`lookup`](Self::lookup), minus [`LookupError::ConfigMissing`].
    pub fn lookup_uri(&self, uri: &str) -> Result<Metadata, LookupError> {
        tracing::debug!(uri, "fetching task metadata (blocking)");

        let response = self.get(uri).map_err(|source| LookupError::Transport {
            uri: uri.to_string(),
            source,
        })?;

        interpret(uri, &response, self.config.status_policy)
    }

    fn get(&self, uri: &str) -> Result<RawResponse, TransportError> {
        let response = self.client.get(uri).send()?;
        let status = response.status().as_u16();
        let body = response.bytes()?;
        Ok(RawResponse::new(status, body.to_vec()))
    }
}
