/*!

Services a test depends on are `Deployable`s: something that can be created, checked for
readiness and torn down again. The same logical service may be provided by more than one
[`Backend`], e.g. a database started locally or deployed into OpenShift. A [`Registry`] maps a
service name and a backend to the implementation providing it.

!*/

use crate::cluster;
use crate::constants::{READY_ATTEMPTS, WAIT_INTERVAL_MS};
use crate::wait::{self, BoxError, Waiter};
use async_trait::async_trait;
use log::info;
use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ResultExt, Snafu};
use std::collections::BTreeMap;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("{}", source))]
    Cluster { source: cluster::Error },

    #[snafu(display("Service '{}' did not become ready: {}", name, source))]
    Ready { name: String, source: wait::Error },

    #[snafu(display("No '{}' service is registered for the '{}' backend", service, backend))]
    Unregistered { service: String, backend: Backend },

    #[snafu(display("Service '{}' failed: {}", name, source))]
    Service { name: String, source: BoxError },
}

impl From<cluster::Error> for Error {
    fn from(source: cluster::Error) -> Self {
        Error::Cluster { source }
    }
}

/// Where a deployable service runs.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Started on the machine running the tests.
    Local,
    /// Deployed into the OpenShift cluster.
    Openshift,
    /// Provided by someone else; we only connect to it.
    External,
}

serde_plain::derive_display_from_serialize!(Backend);
serde_plain::derive_fromstr_from_deserialize!(Backend);

/// A service that can be provisioned for a test and removed again afterwards.
#[async_trait]
pub trait Deployable: Send + Sync {
    fn name(&self) -> &str;

    /// Creates whatever runs the service. Called by [`Deployable::deploy`] only when the service
    /// is not deployed already.
    async fn create(&mut self) -> Result<()>;

    async fn undeploy(&mut self) -> Result<()>;

    /// Whether the service accepts requests.
    async fn is_ready(&self) -> Result<bool>;

    /// Whether the service has been created, ready or not.
    async fn is_deployed(&self) -> Result<bool>;

    /// How long [`Deployable::deploy`] waits for the service to become ready.
    fn ready_waiter(&self) -> Waiter {
        Waiter::new(format!("Waiting until {} is ready", self.name()))
            .interval(Duration::from_millis(WAIT_INTERVAL_MS))
            .max_attempts(READY_ATTEMPTS)
    }

    /// Creates the service unless it is deployed already, then waits until it is ready.
    async fn deploy(&mut self) -> Result<()> {
        if self.is_deployed().await? {
            info!("Service '{}' is already deployed", self.name());
        } else {
            info!("Deploying service '{}'", self.name());
            self.create().await?;
        }
        let this = &*self;
        this.ready_waiter()
            .until(move || this.is_ready())
            .await
            .context(ReadySnafu { name: this.name() })?;
        info!("Service '{}' is ready", this.name());
        Ok(())
    }
}

type Factory = Box<dyn Fn() -> Box<dyn Deployable> + Send + Sync>;

/// Maps service names and backends to the implementations providing them. Services are looked up
/// with the backend chosen for the test run, see
/// [`crate::configuration::TestConfiguration::backend`].
#[derive(Default)]
pub struct Registry {
    factories: BTreeMap<(String, Backend), Factory>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` as the provider of `service` on `backend`, replacing any earlier
    /// registration.
    pub fn register<S, F>(&mut self, service: S, backend: Backend, factory: F) -> &mut Self
    where
        S: Into<String>,
        F: Fn() -> Box<dyn Deployable> + Send + Sync + 'static,
    {
        self.factories
            .insert((service.into(), backend), Box::new(factory));
        self
    }

    /// Creates the `backend` implementation of `service`.
    pub fn resolve(&self, service: &str, backend: Backend) -> Result<Box<dyn Deployable>> {
        let factory = self
            .factories
            .get(&(service.to_string(), backend))
            .context(UnregisteredSnafu { service, backend })?;
        Ok(factory())
    }

    /// The backends `service` is available on.
    pub fn backends(&self, service: &str) -> Vec<Backend> {
        self.factories
            .keys()
            .filter(|(name, _)| name == service)
            .map(|(_, backend)| *backend)
            .collect()
    }

    /// The names of all registered services.
    pub fn services(&self) -> Vec<String> {
        let mut services: Vec<String> = self
            .factories
            .keys()
            .map(|(name, _)| name.clone())
            .collect();
        services.dedup();
        services
    }
}
