/*!

Services test suites depend on, ready to be deployed through a `tnb_model::Registry`:

- `mongodb` on OpenShift ([`mongodb::OpenshiftMongoDb`])
- `horreum`, an external results repository ([`horreum::Horreum`])

!*/

#![deny(
    clippy::expect_used,
    clippy::get_unwrap,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::panicking_unwrap,
    clippy::unwrap_in_result,
    clippy::unwrap_used
)]

pub use configuration::SystemXConfiguration;
pub use error::{Error, Result};

pub mod configuration;
mod error;
pub mod horreum;
pub mod mongodb;

use horreum::{Horreum, HorreumConfiguration};
use mongodb::OpenshiftMongoDb;
use snafu::ResultExt;
use tnb_model::{Backend, FromEnv, OpenshiftClient, Registry};

/// Everything the services in this crate need to be created.
#[derive(Clone)]
pub struct Context {
    pub client: OpenshiftClient,
    pub system_x: SystemXConfiguration,
    pub horreum: HorreumConfiguration,
}

impl Context {
    /// Creates a `Context` for `client`, reading the service settings from the environment.
    pub fn from_env(client: OpenshiftClient) -> Result<Self> {
        Ok(Self {
            client,
            system_x: SystemXConfiguration::from_env().context(error::ConfigurationSnafu)?,
            horreum: HorreumConfiguration::from_env().context(error::ConfigurationSnafu)?,
        })
    }
}

/// A registry providing every service of this crate on the backends it supports.
pub fn default_registry(context: &Context) -> Registry {
    let mut registry = Registry::new();

    let mongodb = context.clone();
    registry.register(OpenshiftMongoDb::NAME, Backend::Openshift, move || {
        Box::new(OpenshiftMongoDb::new(
            mongodb.client.clone(),
            &mongodb.system_x,
        ))
    });

    let horreum = context.horreum.clone();
    registry.register(Horreum::NAME, Backend::External, move || {
        Box::new(Horreum::new(horreum.clone()))
    });

    registry
}
