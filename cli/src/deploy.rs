use anyhow::{Context, Result};
use clap::Parser;
use system_x::{default_registry, Context as ServiceContext};
use tnb_model::{Backend, Deployable, FromEnv, OpenshiftClient, TestConfiguration};

/// Deploy a service and wait until it is ready.
#[derive(Debug, Parser)]
pub(crate) struct Deploy {
    /// The name of the service, e.g. `mongodb`.
    service: String,

    /// Where the service runs [local|openshift|external]. Defaults to the backend selected by
    /// TEST_USE_OPENSHIFT.
    #[clap(long)]
    backend: Option<Backend>,
}

impl Deploy {
    pub(crate) async fn run(self, client: OpenshiftClient) -> Result<()> {
        let mut service = resolve(client, &self.service, self.backend)?;
        service
            .deploy()
            .await
            .context(format!("Unable to deploy '{}'", self.service))?;
        println!("Service '{}' is ready", self.service);
        Ok(())
    }
}

/// Undeploy a service.
#[derive(Debug, Parser)]
pub(crate) struct Undeploy {
    /// The name of the service, e.g. `mongodb`.
    service: String,

    /// Where the service runs [local|openshift|external]. Defaults to the backend selected by
    /// TEST_USE_OPENSHIFT.
    #[clap(long)]
    backend: Option<Backend>,
}

impl Undeploy {
    pub(crate) async fn run(self, client: OpenshiftClient) -> Result<()> {
        let mut service = resolve(client, &self.service, self.backend)?;
        service
            .undeploy()
            .await
            .context(format!("Unable to undeploy '{}'", self.service))
    }
}

fn resolve(
    client: OpenshiftClient,
    service: &str,
    backend: Option<Backend>,
) -> Result<Box<dyn Deployable>> {
    let backend = match backend {
        Some(backend) => backend,
        None => TestConfiguration::from_env()
            .context("Unable to read the test configuration")?
            .backend(),
    };
    let context = ServiceContext::from_env(client).context("Unable to configure services")?;
    default_registry(&context)
        .resolve(service, backend)
        .context(format!("Unable to find service '{}'", service))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn backend_flag() {
        let deploy = Deploy::try_parse_from(["deploy", "mongodb", "--backend", "openshift"]).unwrap();
        assert_eq!(deploy.service, "mongodb");
        assert_eq!(deploy.backend, Some(Backend::Openshift));
        assert!(Deploy::try_parse_from(["deploy", "mongodb", "--backend", "docker"]).is_err());
        let undeploy = Undeploy::try_parse_from(["undeploy", "horreum"]).unwrap();
        assert_eq!(undeploy.backend, None);
    }
}
