//! client
//!
//! The metadata lookup: environment → GET → decode.
//!
//! # Design
//!
//! A lookup is one request and one decode, with no retries and no caching.
//! Errors are checked in order and the first one wins:
//!
//! 1. endpoint variable unset or empty → [`LookupError::ConfigMissing`],
//!    without touching the network
//! 2. no response → [`LookupError::Transport`]
//! 3. non-2xx, only under [`StatusPolicy::RequireSuccess`] →
//!    [`LookupError::Status`]
//! 4. body does not decode → [`LookupError::Decode`]
//!
//! The client owns its transport explicitly; there is no process-wide
//! instance. Cloning a client is cheap and clones share the connection pool.
//!
//! # Example
//!
//! ```no_run
//! use ecs_whoami::MetadataClient;
//!
//! # async fn run() -> Result<(), ecs_whoami::LookupError> {
//! let client = MetadataClient::new()?;
//! let meta = client.lookup().await?;
//! println!("{} in cluster {}", meta.task_arn(), meta.cluster());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crate::config::{ClientConfig, StatusPolicy};
use crate::error::LookupError;
use crate::metadata::{parse_metadata, Metadata};
use crate::transport::{HttpTransport, RawResponse, Transport};

/// Client for the ECS container metadata endpoint.
#[derive(Debug, Clone)]
pub struct MetadataClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl MetadataClient {
    /// Create a client with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::ClientBuild`] if the HTTP client cannot be
    /// initialized.
    pub fn new() -> Result<Self, LookupError> {
        Self::with_config(ClientConfig::default())
    }

    /// Create an HTTP-backed client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::InvalidConfig`] if `config` fails
    /// [`ClientConfig::validate`], and [`LookupError::ClientBuild`] if the
    /// HTTP client cannot be initialized.
    pub fn with_config(config: ClientConfig) -> Result<Self, LookupError> {
        config.validate().map_err(LookupError::InvalidConfig)?;
        let transport = HttpTransport::new(config.timeout).map_err(LookupError::ClientBuild)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client over an arbitrary transport.
    ///
    /// `config.timeout` is not applied here; the transport is expected to
    /// enforce its own bound.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Read the endpoint URI from the configured environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::ConfigMissing`] if the variable is unset, empty,
    /// or not valid Unicode.
    pub fn resolve_uri(&self) -> Result<String, LookupError> {
        resolve_uri(&self.config.env_var)
    }

    /// Resolve the endpoint through `env` instead of the process
    /// environment, then look it up.
    pub(crate) async fn lookup_from<F>(&self, env: F) -> Result<Metadata, LookupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let uri = resolve_uri_with(&self.config.env_var, env)?;
        self.lookup_uri(&uri).await
    }

    /// Look up this container's metadata.
    ///
    /// # Errors
    ///
    /// See the [module docs](self) for the order in which errors are checked.
    pub async fn lookup(&self) -> Result<Metadata, LookupError> {
        self.lookup_from(|var| std::env::var(var).ok()).await
    }

    /// Fetch and decode metadata from `uri`, bypassing the environment.
    ///
    /// # Errors
    ///
    /// As [`lookup`](Self::lookup), minus [`LookupError::ConfigMissing`].
    pub async fn lookup_uri(&self, uri: &str) -> Result<Metadata, LookupError> {
        tracing::debug!(uri, "fetching task metadata");

        let response = self
            .transport
            .get(uri)
            .await
            .map_err(|source| LookupError::Transport {
                uri: uri.to_string(),
                source,
            })?;

        interpret(uri, &response, self.config.status_policy)
    }
}

/// Look up metadata with a freshly built default client.
///
/// Convenience for one-shot callers. Code that looks up more than once
/// should keep a [`MetadataClient`] around instead.
///
/// # Errors
///
/// As [`MetadataClient::lookup`], plus [`LookupError::ClientBuild`].
pub async fn lookup() -> Result<Metadata, LookupError> {
    MetadataClient::new()?.lookup().await
}

pub(crate) fn resolve_uri(var: &str) -> Result<String, LookupError> {
    resolve_uri_with(var, |name| std::env::var(name).ok())
}

fn resolve_uri_with<F>(var: &str, env: F) -> Result<String, LookupError>
where
    F: Fn(&str) -> Option<String>,
{
    match env(var) {
        Some(uri) if !uri.is_empty() => Ok(uri),
        _ => Err(LookupError::ConfigMissing {
            var: var.to_string(),
        }),
    }
}

/// Apply the status policy to a received response and decode its body.
pub(crate) fn interpret(
    uri: &str,
    response: &RawResponse,
    policy: StatusPolicy,
) -> Result<Metadata, LookupError> {
    tracing::debug!(
        uri,
        status = response.status,
        bytes = response.body.len(),
        "received task metadata response"
    );

    if policy == StatusPolicy::RequireSuccess && !response.is_success() {
        return Err(LookupError::Status {
            uri: uri.to_string(),
            status: response.status,
        });
    }

    parse_metadata(&response.body)
}
