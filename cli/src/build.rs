use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tnb_model::constants::BUILD_ATTEMPTS;
use tnb_model::OpenshiftClient;

/// Start a binary build of a build config from a local file and wait until it completes.
#[derive(Debug, Parser)]
pub(crate) struct Build {
    /// The name of the build config.
    build_config: String,

    /// The file uploaded as the build input.
    file: PathBuf,

    /// How many times the build's phase is checked (every 5 seconds) before giving up.
    #[clap(long = "max-attempts", default_value_t = BUILD_ATTEMPTS)]
    max_attempts: u32,
}

impl Build {
    pub(crate) async fn run(self, client: OpenshiftClient) -> Result<()> {
        client
            .do_s2i_build_with_attempts(&self.build_config, &self.file, self.max_attempts)
            .await
            .context(format!("Build of '{}' failed", self.build_config))
    }
}
