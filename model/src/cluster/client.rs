use super::{error, AllowNotFound, Result};
use crate::configuration::OpenshiftConfiguration;
use crate::constants::{DEFAULT_DEPLOYMENT_LABEL, MARKETPLACE_NAMESPACE};
use k8s_openapi::NamespaceResourceScope;
use kube::api::{DeleteParams, Patch, PatchParams, PostParams, PropagationPolicy};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config, Resource as KubeResource, ResourceExt};
use log::{debug, trace};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use snafu::ResultExt;
use std::fmt::Debug;
use std::path::Path;

/// # OpenShift Client
///
/// The OpenShift client wraps a `kube::Client` together with the namespace tests run in and
/// provides the operations test suites need to provision their dependencies: namespaces, config
/// maps, operator subscriptions, image streams, binary builds, pods and port-forwards.
///
/// Every operation that observes an asynchronous state transition blocks (asynchronously) on
/// [`crate::wait`] until the transition happened, failed, or took too long.
///
/// The client is an ordinary value. Construct one per test run and hand it (or clones of it) to
/// whatever needs cluster access.
#[derive(Clone)]
pub struct OpenshiftClient {
    pub k8s_client: Client,
    namespace: String,
    deployment_label: String,
    marketplace_namespace: String,
}

impl OpenshiftClient {
    /// Retry attempts for creating or updating an object.
    const MAX_RETRIES: i32 = 3;
    /// Timeout for object creation/update retries.
    const BACKOFF_MS: u64 = 500;

    /// Create an `OpenshiftClient` from an existing `kube::Client`.
    pub fn new<S>(k8s_client: Client, namespace: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            k8s_client,
            namespace: namespace.into(),
            deployment_label: DEFAULT_DEPLOYMENT_LABEL.to_string(),
            marketplace_namespace: MARKETPLACE_NAMESPACE.to_string(),
        }
    }

    /// Create an `OpenshiftClient` from the path to a kubeconfig file. The namespace is taken from
    /// the kubeconfig's current context.
    pub async fn new_from_kubeconfig_path(kubeconfig_path: &Path) -> Result<Self> {
        Self::from_configuration(&OpenshiftConfiguration {
            kubeconfig: Some(kubeconfig_path.to_path_buf()),
            ..Default::default()
        })
        .await
    }

    /// Create an `OpenshiftClient` as described by `configuration`. In order of precedence the
    /// cluster is reached through `kubeconfig`, through `url` with a token or a username and
    /// password, or through the inferred default configuration.
    pub async fn from_configuration(configuration: &OpenshiftConfiguration) -> Result<Self> {
        let config = match (&configuration.kubeconfig, &configuration.url) {
            (Some(path), _) => {
                debug!("Creating OpenShift client from kubeconfig '{}'", path.display());
                let kubeconfig = Kubeconfig::read_from(path).context(error::ConfigReadSnafu)?;
                Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                    .await
                    .context(error::ClientCreateKubeconfigSnafu)?
            }
            (None, Some(url)) => {
                debug!("Creating OpenShift client for '{}'", url);
                let kubeconfig = url_kubeconfig(url, configuration)?;
                Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                    .await
                    .context(error::ClientCreateKubeconfigSnafu)?
            }
            (None, None) => {
                debug!("Creating OpenShift client from the default configuration");
                Config::infer().await.context(error::ConfigInferSnafu)?
            }
        };
        let namespace = configuration
            .namespace
            .clone()
            .unwrap_or_else(|| config.default_namespace.clone());
        let k8s_client = config.try_into().context(error::KubeSnafu {
            action: "create client from configuration",
        })?;
        Ok(Self {
            k8s_client,
            namespace,
            deployment_label: configuration.deployment_label.clone(),
            marketplace_namespace: configuration.marketplace_namespace.clone(),
        })
    }

    /// Use `namespace` instead of the configured namespace.
    pub fn with_namespace<S>(mut self, namespace: S) -> Self
    where
        S: Into<String>,
    {
        self.namespace = namespace.into();
        self
    }

    /// The namespace tests run in.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The label key tying deployments, services and pods together.
    pub fn deployment_label(&self) -> &str {
        &self.deployment_label
    }

    /// The namespace the operator catalog sources live in.
    pub fn marketplace_namespace(&self) -> &str {
        &self.marketplace_namespace
    }

    /// Creates `data` through `api`, or merge-patches the object if it already exists. Pass
    /// [`OpenshiftClient::namespaced_api`] for namespaced objects and [`OpenshiftClient::api`] for
    /// cluster scoped ones.
    pub async fn create_or_update<T>(&self, api: &Api<T>, data: &T, what: &str) -> Result<()>
    where
        T: KubeResource + Clone + DeserializeOwned + Serialize + Debug,
    {
        let mut error = None;

        for _ in 0..Self::MAX_RETRIES {
            match Self::create_or_update_internal(api, data, what).await {
                Ok(()) => return Ok(()),
                Err(e) => error = Some(e),
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(Self::BACKOFF_MS)).await;
        }
        match error {
            None => Ok(()),
            Some(error) => Err(error),
        }
    }

    async fn create_or_update_internal<T>(api: &Api<T>, data: &T, what: &str) -> Result<()>
    where
        T: KubeResource + Clone + DeserializeOwned + Serialize + Debug,
    {
        let name = data.name_any();
        trace!("Applying {}: {:?}", what, data);
        // Only a missing object is created, any other failure to read it is an error.
        let existing = api
            .get(&name)
            .await
            .allow_not_found(|_| ())
            .context(error::KubeSnafu {
                action: format!("get {} '{}'", what, name),
            })?;
        match existing {
            Some(_) => {
                api.patch(&name, &PatchParams::default(), &Patch::Merge(data))
                    .await
            }
            None => api.create(&PostParams::default(), data).await,
        }
        .context(error::KubeSnafu {
            action: format!("create {} '{}'", what, name),
        })?;

        Ok(())
    }

    /// Deletes the object `name` through `api`. Dependents are garbage collected in the
    /// background. Deleting an object that does not exist is not an error.
    pub async fn delete<T>(&self, api: &Api<T>, name: &str, what: &str) -> Result<()>
    where
        T: KubeResource + Clone + DeserializeOwned + Debug,
    {
        debug!("Deleting {} '{}'", what, name);
        api.delete(name, &delete_params())
            .await
            .allow_not_found(|_| ())
            .context(error::KubeSnafu {
                action: format!("delete {} '{}'", what, name),
            })?;
        Ok(())
    }

    /// Creates a non namespaced api of type `T`
    pub fn api<T>(&self) -> Api<T>
    where
        T: KubeResource,
        <T as KubeResource>::DynamicType: Default,
    {
        Api::<T>::all(self.k8s_client.clone())
    }

    /// Creates an api of type `T` in the test namespace
    pub fn namespaced_api<T>(&self) -> Api<T>
    where
        T: KubeResource<Scope = NamespaceResourceScope>,
        <T as KubeResource>::DynamicType: Default,
    {
        Api::<T>::namespaced(self.k8s_client.clone(), &self.namespace)
    }
}

/// Without a propagation policy the server may orphan the dependents of a deleted object, e.g.
/// the replication controller and pods of a deployment config.
fn delete_params() -> DeleteParams {
    DeleteParams {
        propagation_policy: Some(PropagationPolicy::Background),
        ..DeleteParams::default()
    }
}

/// Builds a single-context kubeconfig for `url` authenticating with the configured token or
/// username and password. Test clusters commonly use self-signed certificates, so TLS
/// verification is skipped.
fn url_kubeconfig(url: &str, configuration: &OpenshiftConfiguration) -> Result<Kubeconfig> {
    let user = match (&configuration.token, &configuration.username) {
        (Some(token), _) => json!({ "token": token }),
        (None, Some(username)) => json!({
            "username": username,
            "password": configuration.password.clone().unwrap_or_default(),
        }),
        (None, None) => json!({}),
    };
    let mut context = json!({ "cluster": "tnb", "user": "tnb" });
    if let Some(namespace) = &configuration.namespace {
        context["namespace"] = json!(namespace);
    }
    serde_json::from_value(json!({
        "apiVersion": "v1",
        "kind": "Config",
        "clusters": [{
            "name": "tnb",
            "cluster": { "server": url, "insecure-skip-tls-verify": true }
        }],
        "users": [{ "name": "tnb", "user": user }],
        "contexts": [{ "name": "tnb", "context": context }],
        "current-context": "tnb",
    }))
    .context(error::KubeconfigBuildSnafu { url })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cluster::mock::{self, count};
    use crate::cluster::HttpStatusCode;
    use crate::openshift::DeploymentConfig;
    use http::{Method, StatusCode};
    use k8s_openapi::api::core::v1::ConfigMap;
    use maplit::btreemap;

    fn config_map() -> ConfigMap {
        ConfigMap {
            metadata: kube::api::ObjectMeta {
                name: Some("settings".to_string()),
                namespace: Some(mock::NAMESPACE.to_string()),
                ..Default::default()
            },
            data: Some(btreemap! { "key".to_string() => "value".to_string() }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn missing_object_is_created() {
        let path = mock::path("v1", "configmaps", "settings");
        let (client, requests) = mock::client(|request| match request.method {
            Method::GET => mock::not_found(),
            _ => mock::ok(serde_json::to_value(config_map()).unwrap()),
        });
        client
            .create_or_update(&client.namespaced_api(), &config_map(), "config map")
            .await
            .unwrap();
        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].is(Method::GET, &path));
        assert!(requests[1].is(Method::POST, &mock::collection("v1", "configmaps")));
        assert_eq!(requests[1].json()["data"]["key"], "value");
    }

    #[tokio::test]
    async fn existing_object_is_patched() {
        let path = mock::path("v1", "configmaps", "settings");
        let (client, requests) =
            mock::client(|_| mock::ok(serde_json::to_value(config_map()).unwrap()));
        client
            .create_or_update(&client.namespaced_api(), &config_map(), "config map")
            .await
            .unwrap();
        assert_eq!(count(&requests, Method::GET, &path), 1);
        assert_eq!(count(&requests, Method::PATCH, &path), 1);
        assert_eq!(requests.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failing_lookup_is_not_mistaken_for_absence() {
        let path = mock::path("v1", "configmaps", "settings");
        let (client, requests) =
            mock::client(|_| mock::failure(StatusCode::FORBIDDEN, "Forbidden"));
        let err = client
            .create_or_update(&client.namespaced_api(), &config_map(), "config map")
            .await
            .unwrap_err();
        assert!(err.is_status_code(StatusCode::FORBIDDEN));
        assert_eq!(count(&requests, Method::GET, &path), 3);
        assert_eq!(requests.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn delete_collects_dependents_in_the_background() {
        let path = mock::path("apps.openshift.io/v1", "deploymentconfigs", "mongodb");
        let (client, requests) = mock::client(|_| {
            mock::ok(serde_json::json!({
                "apiVersion": "apps.openshift.io/v1",
                "kind": "DeploymentConfig",
                "metadata": { "name": "mongodb" },
                "spec": {}
            }))
        });
        client
            .delete(
                &client.namespaced_api::<DeploymentConfig>(),
                "mongodb",
                "deployment config",
            )
            .await
            .unwrap();
        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].is(Method::DELETE, &path));
        assert_eq!(requests[0].json()["propagationPolicy"], "Background");
    }

    #[tokio::test]
    async fn deleting_a_missing_object_succeeds() {
        let (client, _) = mock::client(|_| mock::not_found());
        client
            .delete(
                &client.namespaced_api::<DeploymentConfig>(),
                "mongodb",
                "deployment config",
            )
            .await
            .unwrap();
    }

    #[test]
    fn url_kubeconfig_with_token() {
        let configuration = OpenshiftConfiguration {
            url: Some("https://api.example:6443".to_string()),
            namespace: Some("tnb-tests".to_string()),
            token: Some("sha256~abc".to_string()),
            ..Default::default()
        };
        let kubeconfig = url_kubeconfig("https://api.example:6443", &configuration).unwrap();
        assert_eq!(kubeconfig.current_context.as_deref(), Some("tnb"));
        assert_eq!(kubeconfig.clusters.len(), 1);
        assert_eq!(kubeconfig.auth_infos.len(), 1);
        assert_eq!(kubeconfig.contexts.len(), 1);

        let value = serde_json::to_value(&kubeconfig).unwrap();
        assert_eq!(value["clusters"][0]["cluster"]["server"], "https://api.example:6443");
        assert_eq!(value["contexts"][0]["context"]["namespace"], "tnb-tests");
        assert_eq!(value["users"][0]["user"]["token"], "sha256~abc");
    }

    #[test]
    fn url_kubeconfig_with_credentials() {
        let configuration = OpenshiftConfiguration {
            username: Some("admin".to_string()),
            password: Some("secret".to_string()),
            ..Default::default()
        };
        let kubeconfig = url_kubeconfig("https://api.example:6443", &configuration).unwrap();
        let value = serde_json::to_value(&kubeconfig).unwrap();
        assert_eq!(value["users"][0]["user"]["username"], "admin");
        assert!(value["users"][0]["user"]["token"].is_null());
        assert!(value["contexts"][0]["context"]["namespace"].is_null());
    }
}
