/*!

Typed models of the OpenShift and Operator Lifecycle Manager objects that TNB reads and writes.

These are not our CRDs, so no schema is generated for them. Only the fields we use are modeled;
everything else the API server returns is ignored on deserialization.

!*/

mod apps;
mod build;
mod image;
mod operators;

pub use apps::{
    DeploymentConfig, DeploymentConfigSpec, DeploymentConfigStatus, DeploymentTrigger,
};
pub use build::{
    Build, BuildConfig, BuildConfigSpec, BuildConfigStatus, BuildPhase, BuildSpec, BuildStatus,
};
pub use image::{ImageStream, ImageStreamSpec, ImageStreamStatus, NamedTagEvents, TagReference};
pub use operators::{
    ClusterServiceVersion, ClusterServiceVersionSpec, ClusterServiceVersionStatus, InstallPlan,
    InstallPlanReference, InstallPlanSpec, InstallPlanStatus, OperatorGroup, OperatorGroupSpec,
    Subscription, SubscriptionSpec, SubscriptionStatus,
};
