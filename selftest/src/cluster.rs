use crate::test_settings::TestSettings;
use anyhow::{format_err, Context, Result};
use k8s_openapi::api::core::v1::Pod;
use kube::{
    api::ListParams,
    config::{KubeConfigOptions, Kubeconfig},
    Api, Client, Config,
};
use std::convert::TryInto;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::Duration;
use tempfile::TempDir;
use tnb_model::{OpenshiftClient, Waiter};

pub const KUBECONFIG_FILENAME: &str = "kubeconfig.yaml";

/// Represents a `kind` cluster. The `Drop` trait is implemented deleting the `kind` cluster when it
/// goes out of scope.
#[derive(Debug)]
pub struct Cluster {
    name: String,
    kubeconfig_dir: TempDir,
    settings: TestSettings,
}

impl Cluster {
    /// Creates a `Cluster` while initializing a kind cluster. If a cluster named `cluster_name`
    ///  already exists, it will be deleted.
    pub fn new(cluster_name: &str) -> Result<Cluster> {
        let cluster = Self {
            name: cluster_name.into(),
            kubeconfig_dir: TempDir::new()?,
            settings: TestSettings::from_env()?,
        };
        cluster.delete_kind_cluster()?;
        cluster.create_kind_cluster()?;
        Ok(cluster)
    }

    /// Returns the path to the kubeconfig file in the `TempDir` created for the cluster.
    pub fn kubeconfig(&self) -> PathBuf {
        self.kubeconfig_dir.path().join(KUBECONFIG_FILENAME)
    }

    /// Create the k8s client for the cluster.
    pub async fn k8s_client(&self) -> Result<Client> {
        let kubeconfig = Kubeconfig::read_from(self.kubeconfig())?;
        let config =
            Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default()).await?;
        Ok(config.try_into()?)
    }

    /// Create an `OpenshiftClient` for the cluster working in `namespace`.
    pub async fn openshift_client(&self, namespace: &str) -> Result<OpenshiftClient> {
        Ok(OpenshiftClient::new_from_kubeconfig_path(&self.kubeconfig())
            .await
            .context("Unable to create client for the kind cluster")?
            .with_namespace(namespace))
    }

    /// Waits up to `timeout` until a pod labelled `selector` in `namespace` is running.
    pub async fn wait_for_running_pod(
        &self,
        namespace: &str,
        selector: &str,
        timeout: Duration,
    ) -> Result<()> {
        let pod_api = Api::<Pod>::namespaced(self.k8s_client().await?, namespace);
        let interval = Duration::from_secs(1);
        let attempts = (timeout.as_millis() / interval.as_millis()).max(1) as u32;
        Waiter::new(format!("Waiting for a running pod labelled '{}'", selector))
            .interval(interval)
            .max_attempts(attempts)
            .until(|| is_pod_running(&pod_api, selector))
            .await?;
        Ok(())
    }

    fn create_kind_cluster(&self) -> Result<()> {
        let kubeconfig = self.kubeconfig();
        let output = Command::new(&self.settings.kind_path)
            .arg("--kubeconfig")
            .arg(kubeconfig.to_str().ok_or_else(|| {
                format_err!("non utf-8 path '{}'", kubeconfig.to_string_lossy())
            })?)
            .arg("create")
            .arg("cluster")
            .arg("--name")
            .arg(&self.name)
            .output()?;
        check_output("kind create cluster", &output)
    }

    fn delete_kind_cluster(&self) -> Result<()> {
        let output = Command::new(&self.settings.kind_path)
            .arg("delete")
            .arg("cluster")
            .arg("--name")
            .arg(&self.name)
            .output()?;
        check_output("kind delete cluster", &output)
    }
}

async fn is_pod_running(pod_api: &Api<Pod>, selector: &str) -> kube::Result<bool> {
    let pods = pod_api
        .list(&ListParams::default().labels(selector))
        .await?;
    Ok(pods
        .into_iter()
        .any(|pod| pod.status.and_then(|status| status.phase).as_deref() == Some("Running")))
}

fn check_output(what: &str, output: &Output) -> Result<()> {
    if !output.status.success() {
        return Err(format_err!(
            "'{}' failed with exit status '{}'\n\n{}\n\n{}",
            what,
            output.status.code().unwrap_or(1),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        ));
    }
    Ok(())
}

impl Drop for Cluster {
    fn drop(&mut self) {
        if self.settings.keep_cluster {
            eprintln!("keeping kind cluster '{}'", self.name);
            return;
        }
        if let Err(e) = self.delete_kind_cluster() {
            eprintln!("unable to delete kind cluster '{}': {}", self.name, e)
        }
    }
}
