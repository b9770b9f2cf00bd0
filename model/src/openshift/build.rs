use kube::{CustomResource, ResourceExt};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};

/// A BuildConfig describes how builds of an image are produced. Each instantiation bumps
/// `status.lastVersion` and creates a `Build` named `<buildconfig>-<lastVersion>`.
#[derive(Clone, CustomResource, Debug, Default, Deserialize, PartialEq, Serialize)]
#[kube(
    group = "build.openshift.io",
    version = "v1",
    kind = "BuildConfig",
    namespaced,
    status = "BuildConfigStatus",
    schema = "disabled"
)]
pub struct BuildConfigSpec {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfigStatus {
    #[serde(default)]
    pub last_version: i64,
}

impl BuildConfig {
    /// The name of the most recent build of this build config.
    pub fn last_build_name(&self) -> String {
        let version = self
            .status
            .as_ref()
            .map(|status| status.last_version)
            .unwrap_or_default();
        format!("{}-{}", self.name_any(), version)
    }
}

#[derive(Clone, CustomResource, Debug, Default, Deserialize, PartialEq, Serialize)]
#[kube(
    group = "build.openshift.io",
    version = "v1",
    kind = "Build",
    namespaced,
    status = "BuildStatus",
    schema = "disabled"
)]
pub struct BuildSpec {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct BuildStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// The lifecycle phase of a `Build`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BuildPhase {
    New,
    Pending,
    Running,
    Complete,
    Failed,
    Error,
    Cancelled,
    Other(String),
}

impl BuildPhase {
    pub fn parse(phase: &str) -> Self {
        match phase.to_ascii_lowercase().as_str() {
            "new" => Self::New,
            "pending" => Self::Pending,
            "running" => Self::Running,
            "complete" => Self::Complete,
            "failed" => Self::Failed,
            "error" => Self::Error,
            "cancelled" => Self::Cancelled,
            _ => Self::Other(phase.to_string()),
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// `true` for the terminal phases a build can never recover from.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed | Self::Error | Self::Cancelled)
    }
}

impl Display for BuildPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "New"),
            Self::Pending => write!(f, "Pending"),
            Self::Running => write!(f, "Running"),
            Self::Complete => write!(f, "Complete"),
            Self::Failed => write!(f, "Failed"),
            Self::Error => write!(f, "Error"),
            Self::Cancelled => write!(f, "Cancelled"),
            Self::Other(phase) => write!(f, "{}", phase),
        }
    }
}

impl Build {
    pub fn phase(&self) -> Option<BuildPhase> {
        self.status
            .as_ref()?
            .phase
            .as_deref()
            .map(BuildPhase::parse)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn last_build_name_uses_last_version() {
        let build_config: BuildConfig = serde_json::from_value(json!({
            "apiVersion": "build.openshift.io/v1",
            "kind": "BuildConfig",
            "metadata": { "name": "my-integration" },
            "spec": {
                "source": { "type": "Binary" },
                "strategy": { "type": "Source" }
            },
            "status": { "lastVersion": 3 }
        }))
        .unwrap();
        assert_eq!(build_config.last_build_name(), "my-integration-3");
        assert!(build_config.spec.fields.contains_key("strategy"));
    }

    #[test]
    fn phases() {
        assert!(BuildPhase::parse("Complete").is_complete());
        assert!(BuildPhase::parse("complete").is_complete());
        assert!(BuildPhase::parse("Failed").is_failed());
        assert!(BuildPhase::parse("Cancelled").is_failed());
        assert!(!BuildPhase::parse("Running").is_failed());
        assert!(!BuildPhase::parse("Running").is_complete());
        assert_eq!(
            BuildPhase::parse("Paused"),
            BuildPhase::Other("Paused".to_string())
        );
    }

    #[test]
    fn build_without_status_has_no_phase() {
        let build: Build = serde_json::from_value(json!({
            "apiVersion": "build.openshift.io/v1",
            "kind": "Build",
            "metadata": { "name": "my-integration-1" },
            "spec": {}
        }))
        .unwrap();
        assert!(build.phase().is_none());
    }
}
