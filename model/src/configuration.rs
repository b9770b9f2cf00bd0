use crate::constants::{DEFAULT_DEPLOYMENT_LABEL, MARKETPLACE_NAMESPACE};
use crate::deployable::Backend;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use snafu::{ResultExt, Snafu};
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Unable to read '{}*' environment variables: {}", prefix, source))]
    Environment { prefix: String, source: envy::Error },
}

/// A group of settings read from environment variables sharing a common `PREFIX`.
///
/// # Example
///
/// ```
/// use tnb_model::configuration::{FromEnv, OpenshiftConfiguration};
///
/// let configuration = OpenshiftConfiguration::from_iter(vec![
///     ("OPENSHIFT_NAMESPACE".to_string(), "my-tests".to_string()),
/// ])
/// .unwrap();
/// assert_eq!(configuration.namespace.as_deref(), Some("my-tests"));
/// ```
pub trait FromEnv: DeserializeOwned + Sized {
    const PREFIX: &'static str;

    /// Reads the settings from the process environment.
    fn from_env() -> Result<Self> {
        envy::prefixed(Self::PREFIX)
            .from_env::<Self>()
            .context(EnvironmentSnafu {
                prefix: Self::PREFIX,
            })
    }

    /// Reads the settings from `(key, value)` pairs, e.g. to build a configuration in tests.
    fn from_iter<I>(iter: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(Self::PREFIX)
            .from_iter::<_, Self>(iter)
            .context(EnvironmentSnafu {
                prefix: Self::PREFIX,
            })
    }
}

/// How to reach the cluster and where to put things in it.
///
/// ```text
/// OPENSHIFT_URL=https://api.my-cluster:6443
/// OPENSHIFT_TOKEN=sha256~...
/// OPENSHIFT_NAMESPACE=my-tests
/// ```
///
/// When `kubeconfig` is set it takes precedence over `url`. When neither is set the client is
/// inferred from the environment (in-cluster service account or the default kubeconfig).
#[derive(Debug, Clone, Deserialize)]
pub struct OpenshiftConfiguration {
    pub url: Option<String>,
    /// Target namespace. Defaults to the namespace of the kubeconfig context.
    pub namespace: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub token: Option<String>,
    pub kubeconfig: Option<PathBuf>,
    /// The label key used to tie deployments, services and pods together.
    #[serde(default = "deployment_label")]
    pub deployment_label: String,
    /// The namespace holding the catalog sources subscriptions are created from.
    #[serde(default = "marketplace_namespace")]
    pub marketplace_namespace: String,
}

impl FromEnv for OpenshiftConfiguration {
    const PREFIX: &'static str = "OPENSHIFT_";
}

impl Default for OpenshiftConfiguration {
    fn default() -> Self {
        Self {
            url: None,
            namespace: None,
            username: None,
            password: None,
            token: None,
            kubeconfig: None,
            deployment_label: deployment_label(),
            marketplace_namespace: marketplace_namespace(),
        }
    }
}

/// Settings of the test run itself.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestConfiguration {
    /// Deploy services into OpenShift instead of running them locally.
    #[serde(default)]
    pub use_openshift: bool,
}

impl FromEnv for TestConfiguration {
    const PREFIX: &'static str = "TEST_";
}

impl TestConfiguration {
    /// The backend deployable services should be resolved for.
    pub fn backend(&self) -> Backend {
        if self.use_openshift {
            Backend::Openshift
        } else {
            Backend::Local
        }
    }
}

/// We need these to provide defaults for serde.
fn deployment_label() -> String {
    DEFAULT_DEPLOYMENT_LABEL.to_string()
}

fn marketplace_namespace() -> String {
    MARKETPLACE_NAMESPACE.to_string()
}
