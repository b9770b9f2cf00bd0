use anyhow::{Context, Result};
use clap::Subcommand;
use tnb_model::OpenshiftClient;

/// Create or delete a namespace. Without a name the configured namespace is used.
#[derive(Debug, Subcommand)]
pub(crate) enum Namespace {
    /// Create the namespace unless it exists.
    Create {
        /// The namespace to create.
        name: Option<String>,
    },
    /// Delete the namespace if it exists.
    Delete {
        /// The namespace to delete.
        name: Option<String>,
    },
}

impl Namespace {
    pub(crate) async fn run(self, client: OpenshiftClient) -> Result<()> {
        match self {
            Namespace::Create { name } => {
                let name = name.as_deref().unwrap_or_else(|| client.namespace());
                client
                    .create_namespace(name)
                    .await
                    .context(format!("Unable to create namespace '{}'", name))
            }
            Namespace::Delete { name } => {
                let name = name.as_deref().unwrap_or_else(|| client.namespace());
                client
                    .delete_namespace(name)
                    .await
                    .context(format!("Unable to delete namespace '{}'", name))
            }
        }
    }
}
