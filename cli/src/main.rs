/*!

This is the command line interface for provisioning test dependencies in an OpenShift cluster.

!*/

mod build;
mod config_map;
mod deploy;
mod image_stream;
mod namespace;
mod subscription;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;
use std::path::PathBuf;
use tnb_model::{FromEnv, OpenshiftClient, OpenshiftConfiguration};

/// The command line interface for provisioning the services integration tests depend on.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Args {
    /// Set logging verbosity [trace|debug|info|warn|error]. If the environment variable `RUST_LOG`
    /// is present, it overrides the default logging behavior. See https://docs.rs/env_logger/latest
    #[clap(long = "log-level", default_value = "info")]
    log_level: LevelFilter,
    /// Path to the kubeconfig file. Also can be passed with the OPENSHIFT_KUBECONFIG environment
    /// variable.
    #[clap(long = "kubeconfig")]
    kubeconfig: Option<PathBuf>,
    /// The namespace to work in. Also can be passed with the OPENSHIFT_NAMESPACE environment
    /// variable.
    #[clap(long = "namespace", short = 'n')]
    namespace: Option<String>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Parser)]
enum Command {
    /// Create or delete a namespace.
    #[clap(subcommand)]
    Namespace(namespace::Namespace),
    /// Create config maps.
    #[clap(subcommand)]
    ConfigMap(config_map::ConfigMap),
    /// Manage operator subscriptions.
    #[clap(subcommand)]
    Subscription(subscription::Subscription),
    /// Wait for image streams.
    #[clap(subcommand)]
    ImageStream(image_stream::ImageStream),
    /// Run a binary build and wait for it to complete.
    Build(build::Build),
    /// Deploy a service and wait until it is ready.
    Deploy(deploy::Deploy),
    /// Undeploy a service.
    Undeploy(deploy::Undeploy),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logger(args.log_level);
    if let Err(e) = run(args).await {
        eprintln!("{:?}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let mut configuration = OpenshiftConfiguration::from_env()
        .context("Unable to read the OpenShift configuration")?;
    if args.kubeconfig.is_some() {
        configuration.kubeconfig = args.kubeconfig;
    }
    if args.namespace.is_some() {
        configuration.namespace = args.namespace;
    }
    let client = OpenshiftClient::from_configuration(&configuration)
        .await
        .context("Unable to create OpenShift client")?;
    match args.command {
        Command::Namespace(namespace) => namespace.run(client).await,
        Command::ConfigMap(config_map) => config_map.run(client).await,
        Command::Subscription(subscription) => subscription.run(client).await,
        Command::ImageStream(image_stream) => image_stream.run(client).await,
        Command::Build(build) => build.run(client).await,
        Command::Deploy(deploy) => deploy.run(client).await,
        Command::Undeploy(undeploy) => undeploy.run(client).await,
    }
}

/// Initialize the logger with the value passed by `--log-level` (or its default) when the
/// `RUST_LOG` environment variable is not present. If present, the `RUST_LOG` environment variable
/// overrides `--log-level`/`level`.
fn init_logger(level: LevelFilter) {
    match std::env::var(env_logger::DEFAULT_FILTER_ENV).ok() {
        Some(_) => {
            // RUST_LOG exists; env_logger will use it.
            Builder::from_default_env().init();
        }
        None => {
            // RUST_LOG does not exist; use default log level for our crates only.
            Builder::new()
                .filter(Some(env!("CARGO_CRATE_NAME")), level)
                .filter(Some("tnb_model"), level)
                .filter(Some("system_x"), level)
                .init();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn global_flags() {
        let args = Args::try_parse_from([
            "tnb",
            "--log-level",
            "debug",
            "--kubeconfig",
            "/tmp/kubeconfig",
            "-n",
            "tnb-tests",
            "namespace",
            "create",
        ])
        .unwrap();
        assert_eq!(args.log_level, LevelFilter::Debug);
        assert_eq!(args.kubeconfig, Some(PathBuf::from("/tmp/kubeconfig")));
        assert_eq!(args.namespace.as_deref(), Some("tnb-tests"));
        assert!(matches!(args.command, Command::Namespace(_)));
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Args::try_parse_from(["tnb"]).is_err());
    }
}
