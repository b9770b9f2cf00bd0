use super::{error, is_pod_ready, OpenshiftClient, Result};
use k8s_openapi::api::core::v1::Pod;
use kube::api::ListParams;
use kube::{Api, ResourceExt};
use log::{debug, warn};
use snafu::{OptionExt, ResultExt};
use std::net::SocketAddr;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// A running port-forward. Connections accepted on `local_addr` are tunnelled to a pod until the
/// `PortForward` is closed or dropped.
#[derive(Debug)]
pub struct PortForward {
    local_addr: SocketAddr,
    task: JoinHandle<()>,
}

impl PortForward {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting connections.
    pub fn close(self) {
        debug!("Closing port-forward on {}", self.local_addr);
        self.task.abort();
    }
}

impl Drop for PortForward {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl OpenshiftClient {
    /// Listens on `127.0.0.1:local_port` and forwards each accepted connection to `remote_port` of
    /// a pod matching the label `selector`. A `local_port` of 0 picks a free port; see
    /// [`PortForward::local_addr`].
    pub async fn port_forward(
        &self,
        selector: &str,
        local_port: u16,
        remote_port: u16,
    ) -> Result<PortForward> {
        let listener = TcpListener::bind(("127.0.0.1", local_port))
            .await
            .context(error::IoSnafu {
                action: format!("listen on port {}", local_port),
            })?;
        let local_addr = listener.local_addr().context(error::IoSnafu {
            action: "get the local address of the port-forward",
        })?;
        debug!(
            "Forwarding {} to port {} of pods '{}'",
            local_addr, remote_port, selector
        );

        let pods = self.namespaced_api::<Pod>();
        let selector = selector.to_string();
        let task = tokio::spawn(async move {
            loop {
                let (stream, peer) = match listener.accept().await {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        warn!("Port-forward on {} stopped accepting: {}", local_addr, e);
                        return;
                    }
                };
                debug!("Accepted port-forward connection from {}", peer);
                let pods = pods.clone();
                let selector = selector.clone();
                tokio::spawn(async move {
                    if let Err(e) = forward_connection(&pods, &selector, remote_port, stream).await
                    {
                        warn!("Port-forward connection from {} failed: {}", peer, e);
                    }
                });
            }
        });

        Ok(PortForward { local_addr, task })
    }
}

async fn forward_connection(
    pods: &Api<Pod>,
    selector: &str,
    port: u16,
    mut stream: TcpStream,
) -> Result<()> {
    let pod_name = target_pod(pods, selector).await?;
    let mut forwarder = pods
        .portforward(&pod_name, &[port])
        .await
        .context(error::KubeSnafu {
            action: format!("port-forward to pod '{}'", pod_name),
        })?;
    let mut upstream = forwarder.take_stream(port).context(error::NotFoundSnafu {
        what: format!("a port-forward stream for port {} of pod '{}'", port, pod_name),
    })?;
    if let Err(e) = tokio::io::copy_bidirectional(&mut stream, &mut upstream).await {
        debug!("Port-forward to '{}' closed: {}", pod_name, e);
    }
    drop(upstream);
    let _ = stream.shutdown().await;
    if let Err(e) = forwarder.join().await {
        debug!("Port-forwarder for '{}' ended with {:?}", pod_name, e);
    }
    Ok(())
}

/// Picks a ready pod matching `selector`, or any matching pod when none is ready yet.
async fn target_pod(pods: &Api<Pod>, selector: &str) -> Result<String> {
    let list = pods
        .list(&ListParams::default().labels(selector))
        .await
        .context(error::KubeSnafu {
            action: format!("list pods labelled '{}'", selector),
        })?;
    list.items
        .iter()
        .find(|pod| is_pod_ready(pod))
        .or_else(|| list.items.first())
        .map(|pod| pod.name_any())
        .context(error::NotFoundSnafu {
            what: format!("a pod labelled '{}'", selector),
        })
}
