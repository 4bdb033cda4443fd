//! ecs-whoami - Task metadata lookup from inside AWS Elastic Container Service
//!
//! Reads the container metadata endpoint (v3) the ECS agent exposes through
//! `ECS_CONTAINER_METADATA_URI`, and returns it as a typed [`Metadata`]
//! record with accessors for the well-known `com.amazonaws.ecs.*` labels.
//!
//! See <https://docs.aws.amazon.com/AmazonECS/latest/developerguide/task-metadata-endpoint-v3.html>.
//!
//! # Architecture
//!
//! - [`client`] - Lookup: environment → GET → decode
//! - [`transport`] - Single-GET seam (reqwest in production, mock in tests)
//! - [`metadata`] - Record types, JSON decoding, label accessors
//! - [`config`] - Endpoint variable, timeout, status policy
//! - [`error`] - Error taxonomy
//! - `blocking` - Synchronous client (requires the `blocking` feature)
//!
//! # Example
//!
//! ```no_run
//! # async fn run() -> Result<(), ecs_whoami::LookupError> {
//! let meta = ecs_whoami::lookup().await?;
//!
//! println!("cluster:  {}", meta.cluster());
//! println!("task:     {}", meta.task_arn());
//! println!("family:   {}:{}", meta.task_definition_family(), meta.task_definition_version());
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "blocking")]
pub mod blocking;
pub mod client;
pub mod config;
pub mod error;
pub mod metadata;
pub mod transport;

pub use client::{lookup, MetadataClient};
pub use config::{ClientConfig, StatusPolicy};
pub use error::LookupError;
pub use metadata::{Limits, Metadata, Network};
