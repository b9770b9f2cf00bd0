use super::{error, OpenshiftClient, Result};
use crate::cluster::AllowNotFound;
use crate::system::{config_map, namespace};
use k8s_openapi::api::core::v1::{ConfigMap, Namespace};
use log::{debug, info};
use snafu::ResultExt;
use std::collections::BTreeMap;

impl OpenshiftClient {
    /// Creates the namespace `name` unless `name` is empty or the namespace already exists.
    pub async fn create_namespace(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            info!("Skipping namespace creation, no name given");
            return Ok(());
        }
        if self.namespace_exists(name).await? {
            info!("Skipping namespace creation, namespace '{}' already exists", name);
            return Ok(());
        }
        info!("Creating namespace '{}'", name);
        self.create_or_update(&self.api(), &namespace(name), "namespace")
            .await
    }

    /// Creates the namespace the client is configured for.
    pub async fn create_default_namespace(&self) -> Result<()> {
        self.create_namespace(self.namespace()).await
    }

    /// Deletes the namespace `name` unless `name` is empty or there is no such namespace.
    pub async fn delete_namespace(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            info!("Skipping namespace deletion, no name given");
            return Ok(());
        }
        if !self.namespace_exists(name).await? {
            info!("Skipping namespace deletion, namespace '{}' does not exist", name);
            return Ok(());
        }
        info!("Deleting namespace '{}'", name);
        self.delete(&self.api::<Namespace>(), name, "namespace")
            .await
    }

    /// Deletes the namespace the client is configured for.
    pub async fn delete_default_namespace(&self) -> Result<()> {
        self.delete_namespace(self.namespace()).await
    }

    /// Creates the config map `name` in the client's namespace, replacing the data of an existing
    /// one.
    pub async fn create_config_map<S>(&self, name: S, data: BTreeMap<String, String>) -> Result<()>
    where
        S: Into<String>,
    {
        let config_map = config_map(name, self.namespace(), data);
        debug!(
            "Creating config map '{}' in '{}'",
            config_map.metadata.name.as_deref().unwrap_or_default(),
            self.namespace()
        );
        self.create_or_update(&self.namespaced_api(), &config_map, "config map")
            .await
    }

    /// Gets the config map `name` from the client's namespace, if there is one.
    pub async fn get_config_map(&self, name: &str) -> Result<Option<ConfigMap>> {
        self.namespaced_api::<ConfigMap>()
            .get(name)
            .await
            .allow_not_found(|_| ())
            .context(error::KubeSnafu {
                action: format!("get config map '{}'", name),
            })
    }

    async fn namespace_exists(&self, name: &str) -> Result<bool> {
        Ok(self
            .api::<Namespace>()
            .get(name)
            .await
            .allow_not_found(|_| ())
            .context(error::KubeSnafu {
                action: format!("get namespace '{}'", name),
            })?
            .is_some())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cluster::mock;
    use http::Method;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn namespaces_are_cluster_scoped() {
        let created = AtomicBool::new(false);
        let (client, requests) = mock::client(move |request| {
            let namespace = json!({
                "apiVersion": "v1",
                "kind": "Namespace",
                "metadata": { "name": "camel-tests" }
            });
            match request.method {
                Method::GET if !created.load(Ordering::SeqCst) => mock::not_found(),
                Method::POST => {
                    created.store(true, Ordering::SeqCst);
                    mock::ok(namespace)
                }
                _ => mock::ok(namespace),
            }
        });
        client.create_namespace("camel-tests").await.unwrap();
        client.delete_namespace("camel-tests").await.unwrap();

        let requests = requests.lock().unwrap();
        let calls: Vec<(Method, &str)> = requests
            .iter()
            .map(|request| (request.method.clone(), request.path.as_str()))
            .collect();
        assert_eq!(
            calls,
            vec![
                (Method::GET, "/api/v1/namespaces/camel-tests"),
                (Method::GET, "/api/v1/namespaces/camel-tests"),
                (Method::POST, "/api/v1/namespaces"),
                (Method::GET, "/api/v1/namespaces/camel-tests"),
                (Method::DELETE, "/api/v1/namespaces/camel-tests"),
            ]
        );
    }

    #[tokio::test]
    async fn config_maps_live_in_the_client_namespace() {
        let (client, requests) = mock::client(|request| match request.method {
            Method::GET => mock::not_found(),
            _ => mock::ok(json!({
                "apiVersion": "v1",
                "kind": "ConfigMap",
                "metadata": { "name": "settings", "namespace": mock::NAMESPACE }
            })),
        });
        assert!(client.get_config_map("settings").await.unwrap().is_none());
        client
            .create_config_map("settings", BTreeMap::new())
            .await
            .unwrap();
        let requests = requests.lock().unwrap();
        assert!(requests
            .last()
            .unwrap()
            .is(Method::POST, &mock::collection("v1", "configmaps")));
    }
}
