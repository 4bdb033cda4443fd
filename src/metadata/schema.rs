//! metadata::schema
//!
//! Container metadata as reported by the ECS task metadata endpoint (v3).
//!
//! # Decoding rules
//!
//! - Every field is optional. Missing fields and explicit `null`s decode to
//!   the zero value (empty string, empty collection, `0`, `None`).
//!   This includes `null` label values, list elements, and whole network
//!   entries.
//! - Unknown fields are ignored; the agent adds fields over time.
//! - Keys match case-sensitively, so `"name"` is an unknown field rather
//!   than `Name`. A key repeated in the same object is a decode error.
//! - Timestamps are lenient: anything that is not RFC 3339 decodes to `None`.
//! - A wrong JSON type for a known field (e.g. a string where `Limits.CPU`
//!   is expected) is a decode error.
//!
//! # Example
//!
//! ```
//! use ecs_whoami::metadata::parse_metadata;
//!
//! let json = br#"{
//!     "DockerId": "43481a6ce484",
//!     "Name": "nginx-curl",
//!     "Limits": { "CPU": 512, "Memory": 512 },
//!     "CreatedAt": "2018-02-01T20:55:10.554941919Z",
//!     "Networks": [{ "NetworkMode": "awsvpc", "IPv4Addresses": ["10.0.2.106"] }]
//! }"#;
//!
//! let meta = parse_metadata(json).unwrap();
//! assert_eq!(meta.name, "nginx-curl");
//! assert_eq!(meta.limits.cpu, 512);
//! assert_eq!(meta.networks[0].network_mode, "awsvpc");
//! assert!(meta.started_at.is_none());
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::LookupError;

/// A snapshot of one container's state at lookup time.
///
/// See <https://docs.aws.amazon.com/AmazonECS/latest/developerguide/task-metadata-endpoint-v3.html>.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// Docker container ID
    #[serde(rename = "DockerId", deserialize_with = "null_as_default")]
    pub docker_id: String,

    /// Container name from the task definition
    #[serde(rename = "Name", deserialize_with = "null_as_default")]
    pub name: String,

    /// Name Docker assigned to the container
    #[serde(rename = "DockerName", deserialize_with = "null_as_default")]
    pub docker_name: String,

    /// Image reference
    #[serde(rename = "Image", deserialize_with = "null_as_default")]
    pub image: String,

    /// Image content digest
    #[serde(rename = "ImageID", deserialize_with = "null_as_default")]
    pub image_id: String,

    /// Docker labels, including the `com.amazonaws.ecs.*` ones
    #[serde(rename = "Labels", deserialize_with = "null_values_as_default")]
    pub labels: HashMap<String, String>,

    /// Desired lifecycle status, e.g. `RUNNING`
    #[serde(rename = "DesiredStatus", deserialize_with = "null_as_default")]
    pub desired_status: String,

    /// Last known lifecycle status
    #[serde(rename = "KnownStatus", deserialize_with = "null_as_default")]
    pub known_status: String,

    /// Resource limits
    #[serde(rename = "Limits", deserialize_with = "null_as_default")]
    pub limits: Limits,

    /// When the container was created
    #[serde(
        rename = "CreatedAt",
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,

    /// When the container was started
    #[serde(
        rename = "StartedAt",
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub started_at: Option<DateTime<Utc>>,

    /// Container type, e.g. `NORMAL`
    #[serde(rename = "Type", deserialize_with = "null_as_default")]
    pub container_type: String,

    /// Network attachments, in the order reported
    #[serde(rename = "Networks", deserialize_with = "null_elements_as_default")]
    pub networks: Vec<Network>,
}

/// Container resource limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// CPU units
    #[serde(rename = "CPU", deserialize_with = "null_as_default")]
    pub cpu: i64,
    /// Memory in MiB
    #[serde(rename = "Memory", deserialize_with = "null_as_default")]
    pub memory: i64,
}

/// A network attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Network {
    /// Network mode, e.g. `awsvpc` or `bridge`
    #[serde(rename = "NetworkMode", deserialize_with = "null_as_default")]
    pub network_mode: String,
    /// IPv4 addresses, in the order reported
    #[serde(rename = "IPv4Addresses", deserialize_with = "null_elements_as_default")]
    pub ipv4_addresses: Vec<String>,
}

/// Decode a response body into [`Metadata`].
///
/// # Errors
///
/// Returns [`LookupError::Decode`] if the body is not JSON or a field has
/// the wrong type.
pub fn parse_metadata(body: &[u8]) -> Result<Metadata, LookupError> {
    serde_json::from_slice(body).map_err(LookupError::Decode)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_elements_as_default<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let raw = Option::<Vec<Option<T>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}

fn null_values_as_default<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<HashMap<String, Option<String>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v)| (k, v.unwrap_or_default()))
        .collect())
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            tracing::debug!(value = raw, error = %e, "ignoring unparsable timestamp");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    mod timestamps {
        use super::*;

        #[test]
        fn nanosecond_precision() {
            let ts = parse_timestamp("2018-02-01T20:55:10.554941919Z").unwrap();
            assert_eq!(
                ts.with_nanosecond(0).unwrap(),
                Utc.with_ymd_and_hms(2018, 2, 1, 20, 55, 10).unwrap()
            );
            assert_eq!(ts.nanosecond(), 554_941_919);
        }

        #[test]
        fn offset_normalized_to_utc() {
            let ts = parse_timestamp("2018-02-01T22:55:10+02:00").unwrap();
            assert_eq!(ts, Utc.with_ymd_and_hms(2018, 2, 1, 20, 55, 10).unwrap());
        }

        #[test]
        fn empty_and_garbage_are_none() {
            assert!(parse_timestamp("").is_none());
            assert!(parse_timestamp("yesterday").is_none());
            assert!(parse_timestamp("2018-02-01").is_none());
        }
    }

    mod decode {
        use super::*;

        #[test]
        fn empty_object_is_zero_value() {
            let meta = parse_metadata(b"{}").unwrap();
            assert_eq!(meta, Metadata::default());
        }

        #[test]
        fn nulls_are_zero_values() {
            let meta = parse_metadata(
                br#"{
                    "DockerId": null,
                    "Labels": null,
                    "Limits": null,
                    "CreatedAt": null,
                    "Networks": null
                }"#,
            )
            .unwrap();
            assert_eq!(meta, Metadata::default());
        }

        #[test]
        fn null_inside_nested_records() {
            let meta = parse_metadata(
                br#"{
                    "Limits": { "CPU": null, "Memory": 256 },
                    "Networks": [{ "NetworkMode": "bridge", "IPv4Addresses": null }]
                }"#,
            )
            .unwrap();
            assert_eq!(meta.limits, Limits { cpu: 0, memory: 256 });
            assert_eq!(meta.networks[0].network_mode, "bridge");
            assert!(meta.networks[0].ipv4_addresses.is_empty());
        }

        #[test]
        fn null_label_value_is_empty() {
            let meta =
                parse_metadata(br#"{ "Labels": { "com.amazonaws.ecs.cluster": null, "team": "infra" } }"#)
                    .unwrap();
            assert_eq!(meta.label_opt("com.amazonaws.ecs.cluster"), Some(""));
            assert_eq!(meta.label("team"), "infra");
        }

        #[test]
        fn null_address_is_empty_string() {
            let meta = parse_metadata(
                br#"{ "Networks": [{ "NetworkMode": "awsvpc", "IPv4Addresses": [null, "10.0.2.106"] }] }"#,
            )
            .unwrap();
            assert_eq!(meta.networks[0].ipv4_addresses, vec!["", "10.0.2.106"]);
        }

        #[test]
        fn null_network_is_zero_network() {
            let meta = parse_metadata(
                br#"{ "Networks": [null, { "NetworkMode": "bridge" }] }"#,
            )
            .unwrap();
            assert_eq!(meta.networks.len(), 2);
            assert_eq!(meta.networks[0], Network::default());
            assert_eq!(meta.networks[1].network_mode, "bridge");
        }

        #[test]
        fn keys_are_case_sensitive() {
            let meta = parse_metadata(br#"{ "name": "lower", "NAME": "upper" }"#).unwrap();
            assert_eq!(meta.name, "");
        }

        #[test]
        fn duplicate_key_is_decode_error() {
            let err = parse_metadata(br#"{ "Name": "a", "Name": "b" }"#).unwrap_err();
            assert!(err.is_decode());
        }

        #[test]
        fn unknown_fields_ignored() {
            let meta = parse_metadata(
                br#"{ "Name": "app", "ContainerARN": "arn:aws:ecs:x", "Ports": [] }"#,
            )
            .unwrap();
            assert_eq!(meta.name, "app");
        }

        #[test]
        fn unparsable_timestamp_is_none() {
            let meta = parse_metadata(
                br#"{ "CreatedAt": "not-a-time", "StartedAt": "2018-02-01T20:55:11Z" }"#,
            )
            .unwrap();
            assert!(meta.created_at.is_none());
            assert_eq!(
                meta.started_at,
                Some(Utc.with_ymd_and_hms(2018, 2, 1, 20, 55, 11).unwrap())
            );
        }

        #[test]
        fn type_mismatch_is_decode_error() {
            let err = parse_metadata(br#"{ "Limits": { "CPU": "lots" } }"#).unwrap_err();
            assert!(err.is_decode());

            let err = parse_metadata(br#"{ "CreatedAt": 1517518510 }"#).unwrap_err();
            assert!(err.is_decode());

            let err = parse_metadata(br#"{ "Networks": {} }"#).unwrap_err();
            assert!(err.is_decode());
        }

        #[test]
        fn not_json_is_decode_error() {
            assert!(parse_metadata(b"not json").unwrap_err().is_decode());
            assert!(parse_metadata(b"").unwrap_err().is_decode());
            assert!(parse_metadata(b"42").unwrap_err().is_decode());
        }

        #[test]
        fn networks_keep_order() {
            let meta = parse_metadata(
                br#"{ "Networks": [
                    { "NetworkMode": "awsvpc", "IPv4Addresses": ["10.0.0.2", "10.0.0.1"] },
                    { "NetworkMode": "bridge", "IPv4Addresses": ["172.17.0.2"] }
                ] }"#,
            )
            .unwrap();
            let modes: Vec<_> = meta.networks.iter().map(|n| n.network_mode.as_str()).collect();
            assert_eq!(modes, vec!["awsvpc", "bridge"]);
            assert_eq!(meta.networks[0].ipv4_addresses, vec!["10.0.0.2", "10.0.0.1"]);
        }
    }

    mod serialize {
        use super::*;

        #[test]
        fn uses_wire_names() {
            let meta = Metadata {
                docker_id: "abc".to_string(),
                container_type: "NORMAL".to_string(),
                limits: Limits { cpu: 256, memory: 512 },
                ..Default::default()
            };
            let value = serde_json::to_value(&meta).unwrap();
            assert_eq!(value["DockerId"], "abc");
            assert_eq!(value["Type"], "NORMAL");
            assert_eq!(value["Limits"]["CPU"], 256);
            assert_eq!(value["Limits"]["Memory"], 512);
            assert!(value.get("CreatedAt").is_none());
        }
    }
}
