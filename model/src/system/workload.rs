use crate::constants::{APP_MANAGED_BY, LABEL_SERVICE, MANAGER};
use crate::openshift::{DeploymentConfig, DeploymentConfigSpec, DeploymentTrigger};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, EnvVar, PodSpec, PodTemplateSpec, Service, ServicePort, ServiceSpec,
};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::api::ObjectMeta;
use maplit::btreemap;
use std::collections::BTreeMap;

/// A single-container service deployed with a `DeploymentConfig` and exposed by a `Service` of the
/// same name. `label` is the key used to select its pods; the value is always `name`.
#[derive(Debug, Clone, Default)]
pub struct Workload {
    pub name: String,
    pub label: String,
    pub image: String,
    pub port_name: String,
    pub port: i32,
    pub env: BTreeMap<String, String>,
}

impl Workload {
    /// The label selector matching this workload's pods, e.g. `app=mongodb`.
    pub fn selector(&self) -> String {
        format!("{}={}", self.label, self.name)
    }

    fn selector_labels(&self) -> BTreeMap<String, String> {
        btreemap! { self.label.clone() => self.name.clone() }
    }

    fn object_labels(&self) -> BTreeMap<String, String> {
        btreemap! {
            self.label.clone() => self.name.clone(),
            APP_MANAGED_BY.to_string() => MANAGER.to_string(),
            LABEL_SERVICE.to_string() => self.name.clone(),
        }
    }
}

/// Defines the deployment config running one replica of `workload`, redeployed on every config
/// change.
pub fn deployment_config(workload: &Workload, namespace: &str) -> DeploymentConfig {
    let env = workload
        .env
        .iter()
        .map(|(name, value)| EnvVar {
            name: name.clone(),
            value: Some(value.clone()),
            ..Default::default()
        })
        .collect();

    DeploymentConfig {
        metadata: ObjectMeta {
            name: Some(workload.name.clone()),
            namespace: Some(namespace.to_string()),
            labels: Some(workload.object_labels()),
            ..Default::default()
        },
        spec: DeploymentConfigSpec {
            replicas: 1,
            selector: workload.selector_labels(),
            template: Some(PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(workload.selector_labels()),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![Container {
                        name: workload.name.clone(),
                        image: Some(workload.image.clone()),
                        ports: Some(vec![ContainerPort {
                            name: Some(workload.port_name.clone()),
                            container_port: workload.port,
                            protocol: Some("TCP".to_string()),
                            ..Default::default()
                        }]),
                        env: Some(env),
                        ..Default::default()
                    }],
                    ..Default::default()
                }),
            }),
            triggers: vec![DeploymentTrigger::config_change()],
        },
        status: None,
    }
}

/// Defines the service exposing `workload`'s port inside the cluster.
pub fn service(workload: &Workload, namespace: &str) -> Service {
    Service {
        metadata: ObjectMeta {
            name: Some(workload.name.clone()),
            namespace: Some(namespace.to_string()),
            labels: Some(workload.object_labels()),
            ..Default::default()
        },
        spec: Some(ServiceSpec {
            selector: Some(workload.selector_labels()),
            ports: Some(vec![ServicePort {
                name: Some(workload.name.clone()),
                port: workload.port,
                target_port: Some(IntOrString::Int(workload.port)),
                ..Default::default()
            }]),
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn workload() -> Workload {
        Workload {
            name: "mongodb".to_string(),
            label: "app".to_string(),
            image: "bitnami/mongodb:4.4".to_string(),
            port_name: "mongodb".to_string(),
            port: 27017,
            env: btreemap! { "MONGODB_USERNAME".to_string() => "user".to_string() },
        }
    }

    #[test]
    fn deployment_config_shape() {
        let dc = deployment_config(&workload(), "tnb-tests");
        assert_eq!(dc.metadata.name.as_deref(), Some("mongodb"));
        assert_eq!(dc.metadata.namespace.as_deref(), Some("tnb-tests"));
        assert_eq!(
            dc.metadata.labels.as_ref().and_then(|l| l.get("app")),
            Some(&"mongodb".to_string())
        );
        assert_eq!(dc.spec.replicas, 1);
        assert_eq!(dc.spec.selector, btreemap! { "app".to_string() => "mongodb".to_string() });
        assert_eq!(dc.spec.triggers, vec![DeploymentTrigger::config_change()]);

        let template = dc.spec.template.unwrap();
        assert_eq!(
            template.metadata.unwrap().labels,
            Some(btreemap! { "app".to_string() => "mongodb".to_string() })
        );
        let container = &template.spec.unwrap().containers[0];
        assert_eq!(container.name, "mongodb");
        assert_eq!(container.image.as_deref(), Some("bitnami/mongodb:4.4"));
        let port = &container.ports.as_ref().unwrap()[0];
        assert_eq!(port.container_port, 27017);
        assert_eq!(port.name.as_deref(), Some("mongodb"));
        assert_eq!(port.protocol.as_deref(), Some("TCP"));
        let env = container.env.as_ref().unwrap();
        assert_eq!(env[0].name, "MONGODB_USERNAME");
        assert_eq!(env[0].value.as_deref(), Some("user"));
    }

    #[test]
    fn deployment_config_serializes_trigger_type() {
        let value = serde_json::to_value(deployment_config(&workload(), "tnb-tests")).unwrap();
        assert_eq!(value["apiVersion"], "apps.openshift.io/v1");
        assert_eq!(value["kind"], "DeploymentConfig");
        assert_eq!(value["spec"]["triggers"][0]["type"], "ConfigChange");
    }

    #[test]
    fn service_shape() {
        let service = service(&workload(), "tnb-tests");
        let spec = service.spec.unwrap();
        assert_eq!(
            spec.selector,
            Some(btreemap! { "app".to_string() => "mongodb".to_string() })
        );
        let port = &spec.ports.unwrap()[0];
        assert_eq!(port.port, 27017);
        assert_eq!(port.target_port, Some(IntOrString::Int(27017)));
        assert_eq!(workload().selector(), "app=mongodb");
    }
}
