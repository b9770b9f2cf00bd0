use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tnb_model::OpenshiftClient;

/// Manage operator subscriptions.
#[derive(Debug, Subcommand)]
pub(crate) enum Subscription {
    /// Subscribe to an operator, creating an operator group if the namespace has none.
    Create(CreateSubscription),
    /// Wait until the install plan of a subscription is complete.
    Wait {
        /// The name of the subscription.
        name: String,
    },
    /// Delete a subscription and the cluster service version it installed.
    Delete {
        /// The name of the subscription.
        name: String,
    },
}

#[derive(Debug, Parser)]
pub(crate) struct CreateSubscription {
    /// The name of the operator package.
    #[clap(long = "operator")]
    operator_name: String,

    /// The channel to subscribe to.
    #[clap(long)]
    channel: String,

    /// The catalog source providing the operator.
    #[clap(long, default_value = "redhat-operators")]
    source: String,

    /// The name of the subscription. Defaults to the operator name.
    #[clap(long)]
    name: Option<String>,

    /// Wait until the install plan is complete.
    #[clap(long)]
    wait: bool,
}

impl Subscription {
    pub(crate) async fn run(self, client: OpenshiftClient) -> Result<()> {
        match self {
            Subscription::Create(create) => {
                let name = create.name.as_deref().unwrap_or(&create.operator_name);
                client
                    .create_subscription(
                        &create.channel,
                        &create.operator_name,
                        &create.source,
                        name,
                    )
                    .await
                    .context(format!("Unable to create subscription '{}'", name))?;
                if create.wait {
                    client
                        .wait_for_completion(name)
                        .await
                        .context(format!("Subscription '{}' did not complete", name))?;
                }
                Ok(())
            }
            Subscription::Wait { name } => client
                .wait_for_completion(&name)
                .await
                .context(format!("Subscription '{}' did not complete", name)),
            Subscription::Delete { name } => client
                .delete_subscription(&name)
                .await
                .context(format!("Unable to delete subscription '{}'", name)),
        }
    }
}
