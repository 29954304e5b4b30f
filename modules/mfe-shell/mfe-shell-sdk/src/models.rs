use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::LoadError;

/// Identity and placement of one remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct RemoteInfo {
    /// Display identifier, unique within a registry.
    pub name: String,
    /// Framework label, informational only.
    pub tech: String,
    /// Presentation region owned by the host page.
    pub container_id: String,
    /// Mount point inside the region.
    pub mount_id: String,
    /// Expected development port, used in diagnostics only.
    pub port: Option<u16>,
}

/// Point-in-time status of a remote within the current orchestration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MfeStatus {
    Loaded,
    Failed,
    Unknown,
}

impl fmt::Display for MfeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded => f.write_str("loaded"),
            Self::Failed => f.write_str("failed"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

/// Result of one settled load attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Failed(LoadError),
}

impl LoadOutcome {
    #[must_use]
    pub const fn status(&self) -> MfeStatus {
        match self {
            Self::Loaded => MfeStatus::Loaded,
            Self::Failed(_) => MfeStatus::Failed,
        }
    }

    #[must_use]
    pub const fn error(&self) -> Option<&LoadError> {
        match self {
            Self::Loaded => None,
            Self::Failed(e) => Some(e),
        }
    }
}

/// A failed remote and the error that failed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    pub remote: RemoteInfo,
    #[serde(serialize_with = "serialize_display")]
    pub error: LoadError,
}

/// Aggregate of one orchestration run, for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub loaded: usize,
    pub failed: usize,
    pub loaded_remotes: Vec<RemoteInfo>,
    pub failed_remotes: Vec<FailureRecord>,
}

impl Summary {
    #[must_use]
    pub const fn all_loaded(&self) -> bool {
        self.failed == 0
    }
}

fn serialize_display<T: fmt::Display, S: Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(name: &str) -> RemoteInfo {
        RemoteInfo {
            name: name.to_owned(),
            tech: "React".to_owned(),
            container_id: format!("{name}-container"),
            mount_id: format!("{name}-mfe"),
            port: Some(3001),
        }
    }

    #[test]
    fn failure_record_serializes_error_as_message() {
        let record = FailureRecord {
            remote: info("cart"),
            error: LoadError::MountUnavailable {
                mount_function: "mountUserMFE".to_owned(),
            },
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["remote"]["name"], "cart");
        assert_eq!(
            json["error"],
            "mount function 'mountUserMFE' not available"
        );
    }

    #[test]
    fn outcome_maps_to_status() {
        assert_eq!(LoadOutcome::Loaded.status(), MfeStatus::Loaded);
        let failed = LoadOutcome::Failed(LoadError::MountFailed {
            reason: "boom".to_owned(),
        });
        assert_eq!(failed.status(), MfeStatus::Failed);
        assert!(failed.error().is_some());
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(MfeStatus::Unknown).unwrap(),
            serde_json::json!("unknown")
        );
    }
}
