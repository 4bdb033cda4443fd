//! metadata
//!
//! The task metadata record and its label accessors.
//!
//! # Modules
//!
//! - [`schema`]: `Metadata`, `Limits`, `Network` and JSON decoding
//! - [`labels`]: well-known label keys and accessors

pub mod labels;
pub mod schema;

pub use schema::{parse_metadata, Limits, Metadata, Network};
