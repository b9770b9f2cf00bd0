use crate::cluster::HttpStatusCode;
use http::StatusCode;
use snafu::Snafu;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// The error type for `OpenshiftClient`
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(super)))]
pub enum Error {
    #[snafu(display("Unable to create client: {}", source))]
    ClientCreateKubeconfig {
        source: kube::config::KubeconfigError,
    },

    #[snafu(display("Unable to infer the cluster configuration: {}", source))]
    ConfigInfer {
        source: kube::config::InferConfigError,
    },

    #[snafu(display("Unable to read kubeconfig: {}", source))]
    ConfigRead {
        source: kube::config::KubeconfigError,
    },

    #[snafu(display("Unable to read file '{}': {}", path.display(), source))]
    File {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Unable to build request to {}: {}", what, source))]
    HttpRequest { what: String, source: http::Error },

    #[snafu(display("Unable to {}: {}", action, source))]
    Io {
        action: String,
        source: std::io::Error,
    },

    #[snafu(display("Unable to {}: {}", action, source))]
    Kube { action: String, source: kube::Error },

    #[snafu(display("Unable to build kubeconfig for '{}': {}", url, source))]
    KubeconfigBuild {
        url: String,
        source: serde_json::Error,
    },

    #[snafu(display("Unable to find {}", what))]
    NotFound { what: String },

    #[snafu(display("{}", source))]
    Wait { source: crate::wait::Error },
}

impl HttpStatusCode for Error {
    fn status_code(&self) -> Option<StatusCode> {
        match self {
            Error::Kube { source, .. } => source.status_code(),
            _ => None,
        }
    }
}
