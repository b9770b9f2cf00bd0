use k8s_openapi::api::core::v1::ConfigMap;
use kube::api::ObjectMeta;
use std::collections::BTreeMap;

/// Defines a config map holding `data`.
pub fn config_map<S>(name: S, namespace: &str, data: BTreeMap<String, String>) -> ConfigMap
where
    S: Into<String>,
{
    ConfigMap {
        metadata: ObjectMeta {
            name: Some(name.into()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        data: Some(data),
        ..Default::default()
    }
}

#[test]
fn config_map_carries_data() {
    let data = maplit::btreemap! { "application.properties".to_string() => "a=b".to_string() };
    let config_map = config_map("props", "tnb", data.clone());
    assert_eq!(config_map.metadata.name.as_deref(), Some("props"));
    assert_eq!(config_map.metadata.namespace.as_deref(), Some("tnb"));
    assert_eq!(config_map.data, Some(data));
}
