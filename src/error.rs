//! error
//!
//! Errors from metadata lookups.
//!
//! # Taxonomy
//!
//! - [`LookupError::ConfigMissing`]: the endpoint variable is unset or empty.
//!   Not retryable; the deployment environment has to be fixed.
//! - [`LookupError::Transport`]: the endpoint could not be reached (refused,
//!   timed out, DNS). Possibly transient, but no retry is attempted here.
//! - [`LookupError::Status`]: non-2xx response, only under
//!   [`StatusPolicy::RequireSuccess`](crate::config::StatusPolicy::RequireSuccess).
//! - [`LookupError::Decode`]: the body is not JSON, or does not fit
//!   [`Metadata`](crate::Metadata).
//! - [`LookupError::InvalidConfig`]: a client was built from a
//!   [`ClientConfig`](crate::ClientConfig) that fails validation.
//!
//! Nothing in this crate logs or swallows these; they all reach the caller.

use thiserror::Error;

use crate::config::ConfigError;
use crate::transport::TransportError;

/// Errors from [`MetadataClient::lookup`](crate::MetadataClient::lookup).
#[derive(Debug, Error)]
pub enum LookupError {
    /// The endpoint environment variable is unset or empty.
    #[error("{var} not set. Are you in an ECS environment?")]
    ConfigMissing {
        /// Name of the variable that was read
        var: String,
    },

    /// The request never produced a response.
    #[error("failed to reach metadata endpoint '{uri}': {source}")]
    Transport {
        uri: String,
        #[source]
        source: TransportError,
    },

    /// The endpoint answered with a non-success status.
    #[error("metadata endpoint '{uri}' returned HTTP {status}")]
    Status { uri: String, status: u16 },

    /// The body could not be decoded into task metadata.
    #[error("failed to decode task metadata: {0}")]
    Decode(#[source] serde_json::Error),

    /// The client configuration failed validation.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(#[source] ConfigError),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] TransportError),
}

impl LookupError {
    /// True for [`LookupError::ConfigMissing`].
    pub fn is_config_missing(&self) -> bool {
        matches!(self, LookupError::ConfigMissing { .. })
    }

    /// True for [`LookupError::Transport`].
    pub fn is_transport(&self) -> bool {
        matches!(self, LookupError::Transport { .. })
    }

    /// True for [`LookupError::Decode`].
    pub fn is_decode(&self) -> bool {
        matches!(self, LookupError::Decode(_))
    }

    /// True if the underlying transport gave up because of the timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            LookupError::Transport { source, .. } => source.is_timeout(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_missing_names_the_variable() {
        let err = LookupError::ConfigMissing {
            var: "ECS_CONTAINER_METADATA_URI".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "ECS_CONTAINER_METADATA_URI not set. Are you in an ECS environment?"
        );
        assert!(err.is_config_missing());
        assert!(!err.is_transport());
        assert!(!err.is_decode());
    }

    #[test]
    fn transport_keeps_source() {
        use std::error::Error as _;

        let err = LookupError::Transport {
            uri: "http://169.254.170.2/v3".to_string(),
            source: TransportError::timed_out("operation timed out"),
        };
        assert!(err.is_transport());
        assert!(err.is_timeout());
        assert!(err.source().is_some());
        assert!(err.to_string().contains("http://169.254.170.2/v3"));
    }

    #[test]
    fn decode_wraps_serde_error() {
        let cause = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = LookupError::Decode(cause);
        assert!(err.is_decode());
        assert!(!err.is_timeout());
        assert!(err.to_string().starts_with("failed to decode task metadata"));
    }

    #[test]
    fn invalid_config_keeps_source() {
        use std::error::Error as _;

        let err = LookupError::InvalidConfig(ConfigError::InvalidValue("bad".into()));
        assert!(err.source().is_some());
        assert_eq!(
            err.to_string(),
            "invalid client configuration: invalid config value: bad"
        );
    }

    #[test]
    fn status_display() {
        let err = LookupError::Status {
            uri: "http://localhost/meta".to_string(),
            status: 503,
        };
        assert_eq!(
            err.to_string(),
            "metadata endpoint 'http://localhost/meta' returned HTTP 503"
        );
    }
}
