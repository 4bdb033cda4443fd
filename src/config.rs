//! config
//!
//! Client configuration and loading.
//!
//! # Defaults
//!
//! | Setting | Default |
//! |---|---|
//! | `env_var` | `ECS_CONTAINER_METADATA_URI` |
//! | `timeout_ms` | `5000` (connect + read, combined) |
//! | `status_policy` | `ignore` |
//!
//! # File format
//!
//! ```toml
//! env_var = "ECS_CONTAINER_METADATA_URI"
//! timeout_ms = 2000
//! status_policy = "require-success"
//! ```
//!
//! Every key is optional; missing keys keep their defaults. Unknown keys
//! are rejected.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use ecs_whoami::config::{ClientConfig, StatusPolicy};
//!
//! let config = ClientConfig::from_toml_str("timeout_ms = 1500").unwrap();
//! assert_eq!(config.timeout, Duration::from_millis(1500));
//! assert_eq!(config.env_var, "ECS_CONTAINER_METADATA_URI");
//! assert_eq!(config.status_policy, StatusPolicy::Ignore);
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable the ECS agent sets to the v3 endpoint.
pub const DEFAULT_ENV_VAR: &str = "ECS_CONTAINER_METADATA_URI";

/// Total request timeout used unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {message}")]
    ParseError { message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// What to do with a response whose status is not 2xx.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusPolicy {
    /// Decode the body whatever the status.
    ///
    /// A 4xx/5xx with a JSON body decodes as if it succeeded; with a
    /// malformed body it surfaces as a decode error.
    #[default]
    Ignore,
    /// Fail with [`LookupError::Status`](crate::LookupError::Status) on any
    /// non-2xx response, before decoding.
    RequireSuccess,
}

/// On-disk configuration schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Name of the environment variable holding the endpoint URI
    pub env_var: Option<String>,

    /// Total request timeout in milliseconds
    pub timeout_ms: Option<u64>,

    /// Handling of non-2xx responses
    pub status_policy: Option<StatusPolicy>,
}

impl ConfigFile {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(var) = &self.env_var {
            validate_env_var(var)?;
        }
        if let Some(ms) = self.timeout_ms {
            validate_timeout(Duration::from_millis(ms))?;
        }
        Ok(())
    }
}

fn validate_env_var(var: &str) -> Result<(), ConfigError> {
    if var.trim().is_empty() {
        return Err(ConfigError::InvalidValue(
            "env_var must not be empty".to_string(),
        ));
    }
    if var.contains('=') || var.contains('\0') {
        return Err(ConfigError::InvalidValue(format!(
            "env_var '{}' is not a valid environment variable name",
            var
        )));
    }
    Ok(())
}

fn validate_timeout(timeout: Duration) -> Result<(), ConfigError> {
    if timeout.is_zero() {
        return Err(ConfigError::InvalidValue(
            "timeout must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

/// Settings for a [`MetadataClient`](crate::MetadataClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Environment variable to read the endpoint URI from
    pub env_var: String,
    /// Total timeout for one request
    pub timeout: Duration,
    /// Handling of non-2xx responses
    pub status_policy: StatusPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            env_var: DEFAULT_ENV_VAR.to_string(),
            timeout: DEFAULT_TIMEOUT,
            status_policy: StatusPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Read the endpoint URI from a different environment variable.
    pub fn with_env_var(mut self, var: impl Into<String>) -> Self {
        self.env_var = var.into();
        self
    }

    /// Use a different total timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use a different status policy.
    pub fn with_status_policy(mut self, policy: StatusPolicy) -> Self {
        self.status_policy = policy;
        self
    }

    /// Check the values, whichever way the config was built.
    ///
    /// Clients run this on construction, so a config assembled with the
    /// `with_*` setters gets the same checks as one loaded from TOML.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an empty or malformed
    /// `env_var`, or a zero `timeout`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_env_var(&self.env_var)?;
        validate_timeout(self.timeout)
    }

    /// Build a config from a parsed file, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the file fails validation.
    pub fn from_file(file: ConfigFile) -> Result<Self, ConfigError> {
        file.validate()?;

        let defaults = Self::default();
        Ok(Self {
            env_var: file.env_var.unwrap_or(defaults.env_var),
            timeout: file
                .timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.timeout),
            status_policy: file.status_policy.unwrap_or(defaults.status_policy),
        })
    }

    /// Parse a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` for malformed TOML or unknown keys,
    /// and `ConfigError::InvalidValue` for values that fail validation.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(contents).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        Self::from_file(file)
    }

    /// Load a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadError` if the file cannot be read, otherwise
    /// as [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&contents)
    }
}
