use reqwest::StatusCode;
use snafu::Snafu;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("{}", source))]
    Configuration {
        source: tnb_model::configuration::Error,
    },

    #[snafu(display("Unable to {}: {}", action, source))]
    Http {
        action: String,
        source: reqwest::Error,
    },

    #[snafu(display("Unable to {}: server responded with {}: {}", action, status, body))]
    HttpStatus {
        action: String,
        status: StatusCode,
        body: String,
    },

    #[snafu(display("Missing configuration value '{}'", name))]
    MissingConfiguration { name: String },
}

/// Wraps errors of the service `name` for the `Deployable` interface.
pub(crate) fn service(name: &str) -> impl FnOnce(Error) -> tnb_model::deployable::Error + '_ {
    move |source| tnb_model::deployable::Error::Service {
        name: name.to_string(),
        source: Box::new(source),
    }
}
