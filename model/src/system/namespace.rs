use crate::constants::{APP_MANAGED_BY, MANAGER};
use k8s_openapi::api::core::v1::Namespace;
use kube::api::ObjectMeta;
use maplit::btreemap;

/// Defines a namespace created for a test run.
pub fn namespace<S>(name: S) -> Namespace
where
    S: Into<String>,
{
    Namespace {
        metadata: ObjectMeta {
            name: Some(name.into()),
            labels: Some(btreemap! {
                APP_MANAGED_BY.to_string() => MANAGER.to_string(),
            }),
            ..Default::default()
        },
        ..Default::default()
    }
}
