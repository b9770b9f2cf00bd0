use k8s_openapi::api::core::v1::PodTemplateSpec;
use kube::CustomResource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, CustomResource, Debug, Default, Deserialize, PartialEq, Serialize)]
#[kube(
    group = "apps.openshift.io",
    version = "v1",
    kind = "DeploymentConfig",
    namespaced,
    status = "DeploymentConfigStatus",
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentConfigSpec {
    #[serde(default)]
    pub replicas: i32,
    #[serde(default)]
    pub selector: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<PodTemplateSpec>,
    #[serde(default)]
    pub triggers: Vec<DeploymentTrigger>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct DeploymentTrigger {
    #[serde(rename = "type")]
    pub type_: String,
}

impl DeploymentTrigger {
    pub fn config_change() -> Self {
        Self {
            type_: "ConfigChange".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentConfigStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ready_replicas: Option<i32>,
}
