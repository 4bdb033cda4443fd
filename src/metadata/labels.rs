//! metadata::labels
//!
//! Well-known ECS label keys and typed accessors over [`Metadata::labels`].
//!
//! # Absent vs empty
//!
//! [`Metadata::label`] and the named accessors return `""` for a missing
//! key, which makes "absent" and "present but empty" look the same. Use
//! [`Metadata::label_opt`] when the difference matters.
//!
//! The accessors do not validate values; `task_arn()` returns whatever the
//! agent put in the label, ARN-shaped or not.

use super::schema::Metadata;

/// Label holding the cluster name.
pub const CLUSTER: &str = "com.amazonaws.ecs.cluster";

/// Label holding the container name from the task definition.
pub const CONTAINER_NAME: &str = "com.amazonaws.ecs.container-name";

/// Label holding the task ARN.
pub const TASK_ARN: &str = "com.amazonaws.ecs.task-arn";

/// Label holding the task definition family.
pub const TASK_DEFINITION_FAMILY: &str = "com.amazonaws.ecs.task-definition-family";

/// Label holding the task definition revision.
pub const TASK_DEFINITION_VERSION: &str = "com.amazonaws.ecs.task-definition-version";

impl Metadata {
    /// The value of label `name`, or `""` if it is not set.
    ///
    /// # Example
    ///
    /// ```
    /// use ecs_whoami::Metadata;
    ///
    /// let mut meta = Metadata::default();
    /// meta.labels.insert("team".to_string(), "infra".to_string());
    ///
    /// assert_eq!(meta.label("team"), "infra");
    /// assert_eq!(meta.label("owner"), "");
    /// ```
    pub fn label(&self, name: &str) -> &str {
        self.label_opt(name).unwrap_or_default()
    }

    /// The value of label `name`, or `None` if the key is absent.
    ///
    /// Unlike [`label`](Self::label), an empty value comes back as `Some("")`.
    pub fn label_opt(&self, name: &str) -> Option<&str> {
        self.labels.get(name).map(String::as_str)
    }

    /// The `com.amazonaws.ecs.cluster` label, or `""`.
    pub fn cluster(&self) -> &str {
        self.label(CLUSTER)
    }

    /// The `com.amazonaws.ecs.container-name` label, or `""`.
    pub fn container_name(&self) -> &str {
        self.label(CONTAINER_NAME)
    }

    /// The `com.amazonaws.ecs.task-arn` label, or `""`.
    pub fn task_arn(&self) -> &str {
        self.label(TASK_ARN)
    }

    /// The `com.amazonaws.ecs.task-definition-family` label, or `""`.
    pub fn task_definition_family(&self) -> &str {
        self.label(TASK_DEFINITION_FAMILY)
    }

    /// The `com.amazonaws.ecs.task-definition-version` label, or `""`.
    pub fn task_definition_version(&self) -> &str {
        self.label(TASK_DEFINITION_VERSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_labels(pairs: &[(&str, &str)]) -> Metadata {
        Metadata {
            labels: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn named_accessors_read_their_keys() {
        let meta = with_labels(&[
            (CLUSTER, "default"),
            (CONTAINER_NAME, "nginx-curl"),
            (
                TASK_ARN,
                "arn:aws:ecs:us-east-2:012345678910:task/9781c248-0edd-4cdb-9a93-f63cb662a5d3",
            ),
            (TASK_DEFINITION_FAMILY, "nginx"),
            (TASK_DEFINITION_VERSION, "5"),
        ]);

        assert_eq!(meta.cluster(), "default");
        assert_eq!(meta.container_name(), "nginx-curl");
        assert_eq!(
            meta.task_arn(),
            "arn:aws:ecs:us-east-2:012345678910:task/9781c248-0edd-4cdb-9a93-f63cb662a5d3"
        );
        assert_eq!(meta.task_definition_family(), "nginx");
        assert_eq!(meta.task_definition_version(), "5");
    }

    #[test]
    fn unset_accessors_are_empty() {
        let meta = with_labels(&[(CLUSTER, "default"), (CONTAINER_NAME, "nginx-curl")]);

        assert_eq!(meta.cluster(), "default");
        assert_eq!(meta.container_name(), "nginx-curl");
        assert_eq!(meta.task_arn(), "");
        assert_eq!(meta.task_definition_family(), "");
        assert_eq!(meta.task_definition_version(), "");
    }

    #[test]
    fn no_labels_at_all() {
        let meta = Metadata::default();
        assert_eq!(meta.cluster(), "");
        assert_eq!(meta.label_opt(CLUSTER), None);
    }

    #[test]
    fn label_opt_distinguishes_empty_from_absent() {
        let meta = with_labels(&[(TASK_ARN, "")]);

        assert_eq!(meta.task_arn(), "");
        assert_eq!(meta.label_opt(TASK_ARN), Some(""));
        assert_eq!(meta.label_opt(CLUSTER), None);
    }

    #[test]
    fn arbitrary_labels() {
        let meta = with_labels(&[("com.example.team", "payments")]);
        assert_eq!(meta.label("com.example.team"), "payments");
        assert_eq!(meta.label("com.example.TEAM"), "");
    }
}
