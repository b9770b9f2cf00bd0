use super::{MongoDbAccount, PORT};
use crate::SystemXConfiguration;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Service;
use kube::ResourceExt;
use log::{debug, info};
use std::time::Duration;
use tnb_model::cluster::{are_exactly_n_pods_ready, PortForward};
use tnb_model::constants::UNDEPLOY_TIMEOUT_SECS;
use tnb_model::deployable::Result;
use tnb_model::openshift::DeploymentConfig;
use tnb_model::system::{deployment_config, service, Workload};
use tnb_model::{Deployable, OpenshiftClient};

/// Logged by the MongoDB image once the replica set accepts writes.
const READY_LOG_LINE: &str = "Transition to primary complete; database writes are now permitted";

/// MongoDB running in OpenShift as a `DeploymentConfig` with a `Service` in front of it.
pub struct OpenshiftMongoDb {
    client: OpenshiftClient,
    image: String,
    account: MongoDbAccount,
    port_forward: Option<PortForward>,
}

impl OpenshiftMongoDb {
    pub const NAME: &'static str = "mongodb";

    pub fn new(client: OpenshiftClient, configuration: &SystemXConfiguration) -> Self {
        Self {
            client,
            image: configuration.mongodb_image.clone(),
            account: MongoDbAccount::from(configuration),
            port_forward: None,
        }
    }

    pub fn account(&self) -> &MongoDbAccount {
        &self.account
    }

    /// The connection string used from inside the cluster.
    pub fn replica_set_url(&self) -> String {
        self.account.replica_set_url(Self::NAME, PORT)
    }

    /// The connection string used from the machine running the tests. The first call opens a
    /// port-forward to the MongoDB pod that lives until the service is undeployed.
    pub async fn local_url(&mut self) -> Result<String> {
        let local_port = match &self.port_forward {
            Some(port_forward) => port_forward.local_addr().port(),
            None => {
                debug!("Creating port-forward to {} for port {}", Self::NAME, PORT);
                let port_forward = self
                    .client
                    .port_forward(&self.workload().selector(), PORT, PORT)
                    .await?;
                let port = port_forward.local_addr().port();
                self.port_forward = Some(port_forward);
                port
            }
        };
        Ok(self.account.replica_set_url("localhost", local_port))
    }

    fn workload(&self) -> Workload {
        Workload {
            name: Self::NAME.to_string(),
            label: self.client.deployment_label().to_string(),
            image: self.image.clone(),
            port_name: Self::NAME.to_string(),
            port: i32::from(PORT),
            env: self.account.container_environment(Self::NAME),
        }
    }
}

#[async_trait]
impl Deployable for OpenshiftMongoDb {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn create(&mut self) -> Result<()> {
        info!("Deploying OpenShift MongoDB");
        let workload = self.workload();
        let namespace = self.client.namespace();
        debug!("Creating deployment config {}", Self::NAME);
        self.client
            .create_or_update(
                &self.client.namespaced_api(),
                &deployment_config(&workload, namespace),
                "deployment config",
            )
            .await?;
        debug!("Creating service {}", Self::NAME);
        self.client
            .create_or_update(
                &self.client.namespaced_api(),
                &service(&workload, namespace),
                "service",
            )
            .await?;
        Ok(())
    }

    async fn undeploy(&mut self) -> Result<()> {
        info!("Undeploying OpenShift MongoDB");
        if let Some(port_forward) = self.port_forward.take() {
            debug!("Closing port-forward");
            port_forward.close();
        }
        self.client
            .delete(&self.client.namespaced_api::<Service>(), Self::NAME, "service")
            .await?;
        self.client
            .delete(
                &self.client.namespaced_api::<DeploymentConfig>(),
                Self::NAME,
                "deployment config",
            )
            .await?;
        self.client
            .wait_for_exact_ready_pods(
                0,
                self.client.deployment_label(),
                Self::NAME,
                Duration::from_secs(UNDEPLOY_TIMEOUT_SECS),
            )
            .await?;
        Ok(())
    }

    async fn is_ready(&self) -> Result<bool> {
        let pods = self
            .client
            .labeled_pods(self.client.deployment_label(), Self::NAME)
            .await?;
        if !are_exactly_n_pods_ready(&pods, 1) {
            return Ok(false);
        }
        let log = self.client.log_of(&pods[0].name_any()).await?;
        Ok(log.contains(READY_LOG_LINE))
    }

    async fn is_deployed(&self) -> Result<bool> {
        Ok(!self
            .client
            .labeled_pods(self.client.deployment_label(), Self::NAME)
            .await?
            .is_empty())
    }
}
