use super::{error, OpenshiftClient, Result};
use crate::constants::{POD_POLL_INTERVAL_MS, POD_READY_CONDITION};
use crate::wait::Waiter;
use k8s_openapi::api::core::v1::Pod;
use kube::api::{ListParams, LogParams};
use kube::ResourceExt;
use snafu::{OptionExt, ResultExt};
use std::time::Duration;

impl OpenshiftClient {
    /// Lists the pods in the client's namespace labelled `key=value`.
    pub async fn labeled_pods(&self, key: &str, value: &str) -> Result<Vec<Pod>> {
        let selector = format!("{}={}", key, value);
        Ok(self
            .namespaced_api::<Pod>()
            .list(&ListParams::default().labels(&selector))
            .await
            .context(error::KubeSnafu {
                action: format!("list pods labelled '{}'", selector),
            })?
            .items)
    }

    /// Gets the log of the first pod whose name starts with `name_prefix`.
    pub async fn pod_log(&self, name_prefix: &str) -> Result<String> {
        let pods = self
            .namespaced_api::<Pod>()
            .list(&ListParams::default())
            .await
            .context(error::KubeSnafu {
                action: "list pods",
            })?;
        let pod_name = pods
            .items
            .iter()
            .map(|pod| pod.name_any())
            .find(|name| name.starts_with(name_prefix))
            .context(error::NotFoundSnafu {
                what: format!("a pod named '{}*'", name_prefix),
            })?;
        self.log_of(&pod_name).await
    }

    /// Gets the log of the pod `pod_name`.
    pub async fn log_of(&self, pod_name: &str) -> Result<String> {
        self.namespaced_api::<Pod>()
            .logs(pod_name, &LogParams::default())
            .await
            .context(error::KubeSnafu {
                action: format!("get logs of pod '{}'", pod_name),
            })
    }

    /// Waits until exactly `n` pods labelled `key=value` are ready, giving up after `timeout`.
    pub async fn wait_for_exact_ready_pods(
        &self,
        n: usize,
        key: &str,
        value: &str,
        timeout: Duration,
    ) -> Result<()> {
        let interval = Duration::from_millis(POD_POLL_INTERVAL_MS);
        let max_attempts = (timeout.as_millis() / interval.as_millis()).max(1) as u32;
        Waiter::new(format!(
            "Waiting until exactly {} pod(s) labelled {}={} are ready",
            n, key, value
        ))
        .interval(interval)
        .max_attempts(max_attempts)
        .until(move || async move {
            let pods = self.labeled_pods(key, value).await?;
            Ok::<_, super::Error>(are_exactly_n_pods_ready(&pods, n))
        })
        .await
        .context(error::WaitSnafu)
    }
}

/// Whether the pod reports the `Ready` condition as `True`.
pub fn is_pod_ready(pod: &Pod) -> bool {
    pod.status
        .as_ref()
        .and_then(|status| status.conditions.as_ref())
        .map(|conditions| {
            conditions
                .iter()
                .any(|c| c.type_ == POD_READY_CONDITION && c.status == "True")
        })
        .unwrap_or(false)
}

/// Whether there are exactly `n` pods and all of them are ready.
pub fn are_exactly_n_pods_ready(pods: &[Pod], n: usize) -> bool {
    pods.len() == n && pods.iter().all(is_pod_ready)
}
