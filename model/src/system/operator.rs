use crate::openshift::{OperatorGroup, OperatorGroupSpec, Subscription, SubscriptionSpec};
use kube::api::ObjectMeta;

/// Defines an operator group named `name` that targets only `namespace`.
pub fn operator_group(name: &str, namespace: &str) -> OperatorGroup {
    OperatorGroup {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        spec: OperatorGroupSpec {
            target_namespaces: Some(vec![namespace.to_string()]),
        },
    }
}

/// Defines a subscription to `operator_name` from the catalog `source` found in
/// `source_namespace`.
pub fn subscription(
    subscription_name: &str,
    namespace: &str,
    operator_name: &str,
    channel: &str,
    source: &str,
    source_namespace: &str,
) -> Subscription {
    Subscription {
        metadata: ObjectMeta {
            name: Some(subscription_name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        spec: SubscriptionSpec {
            name: operator_name.to_string(),
            channel: Some(channel.to_string()),
            source: source.to_string(),
            source_namespace: source_namespace.to_string(),
            ..Default::default()
        },
        status: None,
    }
}
