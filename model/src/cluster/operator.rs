use super::{error, OpenshiftClient, Result};
use crate::cluster::AllowNotFound;
use crate::constants::{INSTALL_PLAN_ATTEMPTS, WAIT_INTERVAL_MS};
use crate::openshift::{ClusterServiceVersion, InstallPlan, OperatorGroup, Subscription};
use crate::system::{operator_group, subscription};
use crate::wait::wait_for;
use kube::api::ListParams;
use log::info;
use snafu::ResultExt;
use std::time::Duration;

impl OpenshiftClient {
    /// Subscribes the client's namespace to `operator_name` from the catalog `source`. Operators
    /// are only installed into namespaces with an operator group, so one named
    /// `subscription_name` is created first when the namespace has none.
    pub async fn create_subscription(
        &self,
        channel: &str,
        operator_name: &str,
        source: &str,
        subscription_name: &str,
    ) -> Result<()> {
        let groups = self
            .namespaced_api::<OperatorGroup>()
            .list(&ListParams::default())
            .await
            .context(error::KubeSnafu {
                action: "list operator groups",
            })?;
        if groups.items.is_empty() {
            info!(
                "Creating operator group '{}' in '{}'",
                subscription_name,
                self.namespace()
            );
            self.create_or_update(
                &self.namespaced_api(),
                &operator_group(subscription_name, self.namespace()),
                "operator group",
            )
            .await?;
        }

        info!(
            "Creating subscription '{}' to operator '{}' ({}) from '{}'",
            subscription_name, operator_name, channel, source
        );
        let subscription = subscription(
            subscription_name,
            self.namespace(),
            operator_name,
            channel,
            source,
            self.marketplace_namespace(),
        );
        self.create_or_update(&self.namespaced_api(), &subscription, "subscription")
            .await
    }

    /// Waits until the install plan of the subscription `subscription_name` is complete.
    pub async fn wait_for_completion(&self, subscription_name: &str) -> Result<()> {
        wait_for(
            || self.install_plan_complete(subscription_name),
            INSTALL_PLAN_ATTEMPTS,
            Duration::from_millis(WAIT_INTERVAL_MS),
            format!(
                "Waiting until the install plan from subscription {} is complete",
                subscription_name
            ),
        )
        .await
        .context(error::WaitSnafu)
    }

    /// Whether the subscription `subscription_name` references an install plan that is complete.
    /// A missing subscription, status or install plan means the plan is not complete yet.
    pub async fn install_plan_complete(&self, subscription_name: &str) -> Result<bool> {
        let subscription = match self.get_subscription(subscription_name).await? {
            Some(subscription) => subscription,
            None => return Ok(false),
        };
        let install_plan_name = match subscription.install_plan_name() {
            Some(name) => name.to_string(),
            None => return Ok(false),
        };
        let install_plan = self
            .namespaced_api::<InstallPlan>()
            .get(&install_plan_name)
            .await
            .allow_not_found(|_| ())
            .context(error::KubeSnafu {
                action: format!("get install plan '{}'", install_plan_name),
            })?;
        Ok(install_plan.map(|plan| plan.is_complete()).unwrap_or(false))
    }

    /// Deletes the subscription `subscription_name` together with the cluster service version it
    /// installed.
    pub async fn delete_subscription(&self, subscription_name: &str) -> Result<()> {
        let subscription = match self.get_subscription(subscription_name).await? {
            Some(subscription) => subscription,
            None => {
                info!(
                    "Skipping subscription deletion, subscription '{}' does not exist",
                    subscription_name
                );
                return Ok(());
            }
        };

        if let Some(csv) = subscription.current_csv() {
            self.delete(
                &self.namespaced_api::<ClusterServiceVersion>(),
                csv,
                "cluster service version",
            )
                .await?;
        }

        info!("Deleting subscription '{}'", subscription_name);
        self.delete(
            &self.namespaced_api::<Subscription>(),
            subscription_name,
            "subscription",
        )
            .await
    }

    async fn get_subscription(&self, subscription_name: &str) -> Result<Option<Subscription>> {
        self.namespaced_api::<Subscription>()
            .get(subscription_name)
            .await
            .allow_not_found(|_| ())
            .context(error::KubeSnafu {
                action: format!("get subscription '{}'", subscription_name),
            })
    }
}
