/*!

The `cluster` module provides the `OpenshiftClient`, the single entry point test suites use to
provision their dependencies in an OpenShift (or plain Kubernetes) cluster. The client is split
over several files by concern; each adds an `impl OpenshiftClient` block.

!*/

mod build;
mod client;
mod error;
mod http_status_code;
#[cfg(test)]
mod mock;
mod namespace;
mod operator;
mod pods;
mod port_forward;

pub use client::OpenshiftClient;
pub use error::{Error, Result};
pub use http_status_code::{AllowNotFound, HttpStatusCode, StatusCode};
pub use pods::{are_exactly_n_pods_ready, is_pod_ready};
pub use port_forward::PortForward;
