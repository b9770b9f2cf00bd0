use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use tnb_model::OpenshiftClient;

#[derive(Debug, Subcommand)]
pub(crate) enum ConfigMap {
    /// Create a config map, replacing the data of an existing one.
    Create(CreateConfigMap),
}

#[derive(Debug, Parser)]
pub(crate) struct CreateConfigMap {
    /// The name of the config map.
    name: String,

    /// An entry of the config map as `key=value`. May be repeated.
    #[clap(long = "data", short = 'd', parse(try_from_str = parse_key_val))]
    data: Vec<(String, String)>,
}

impl ConfigMap {
    pub(crate) async fn run(self, client: OpenshiftClient) -> Result<()> {
        match self {
            ConfigMap::Create(create) => {
                let data: BTreeMap<String, String> = create.data.into_iter().collect();
                client
                    .create_config_map(create.name.as_str(), data)
                    .await
                    .context(format!("Unable to create config map '{}'", create.name))
            }
        }
    }
}

fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected 'key=value', got '{}'", s))?;
    Ok((key.to_string(), value.to_string()))
}
