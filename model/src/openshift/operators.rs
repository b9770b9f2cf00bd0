use crate::constants::INSTALL_PLAN_COMPLETE;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// An OLM Subscription keeps an operator installed and updated from a catalog source.
#[derive(Clone, CustomResource, Debug, Default, Deserialize, PartialEq, Serialize)]
#[kube(
    group = "operators.coreos.com",
    version = "v1alpha1",
    kind = "Subscription",
    namespaced,
    status = "SubscriptionStatus",
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSpec {
    /// The name of the operator package.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    /// The catalog source, e.g. `redhat-operators`.
    pub source: String,
    pub source_namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_plan_approval: Option<String>,
    #[serde(rename = "startingCSV", skip_serializing_if = "Option::is_none")]
    pub starting_csv: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installplan: Option<InstallPlanReference>,
    #[serde(rename = "currentCSV", skip_serializing_if = "Option::is_none")]
    pub current_csv: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallPlanReference {
    #[serde(default)]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl Subscription {
    /// The name of the install plan OLM generated for this subscription, once there is one.
    pub fn install_plan_name(&self) -> Option<&str> {
        self.status
            .as_ref()?
            .installplan
            .as_ref()
            .map(|plan| plan.name.as_str())
            .filter(|name| !name.is_empty())
    }

    /// The cluster service version currently installed by this subscription. A subscription
    /// re-created while its CSV still exists has none.
    pub fn current_csv(&self) -> Option<&str> {
        self.status.as_ref()?.current_csv.as_deref()
    }
}

/// The set of resources OLM approved to install for a subscription.
#[derive(Clone, CustomResource, Debug, Default, Deserialize, PartialEq, Serialize)]
#[kube(
    group = "operators.coreos.com",
    version = "v1alpha1",
    kind = "InstallPlan",
    namespaced,
    status = "InstallPlanStatus",
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct InstallPlanSpec {
    #[serde(default)]
    pub cluster_service_version_names: Vec<String>,
    #[serde(default)]
    pub approval: String,
    #[serde(default)]
    pub approved: bool,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct InstallPlanStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
}

impl InstallPlan {
    pub fn phase(&self) -> Option<&str> {
        self.status.as_ref()?.phase.as_deref()
    }

    /// `true` once the plan's phase is `Complete`.
    pub fn is_complete(&self) -> bool {
        self.phase()
            .map(|phase| phase.eq_ignore_ascii_case(INSTALL_PLAN_COMPLETE))
            .unwrap_or_default()
    }
}

/// Selects the namespaces operators installed into a namespace may watch.
#[derive(Clone, CustomResource, Debug, Default, Deserialize, PartialEq, Serialize)]
#[kube(
    group = "operators.coreos.com",
    version = "v1",
    kind = "OperatorGroup",
    namespaced,
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct OperatorGroupSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_namespaces: Option<Vec<String>>,
}

#[derive(Clone, CustomResource, Debug, Default, Deserialize, PartialEq, Serialize)]
#[kube(
    group = "operators.coreos.com",
    version = "v1alpha1",
    kind = "ClusterServiceVersion",
    namespaced,
    status = "ClusterServiceVersionStatus",
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct ClusterServiceVersionSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ClusterServiceVersionStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
}
