//! Horreum, a repository for performance test results. It is run by someone else; we only talk
//! to its REST API.

mod configuration;

pub use configuration::HorreumConfiguration;

use crate::error::{self, Result};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, Response};
use serde::Serialize;
use snafu::{ensure, OptionExt, ResultExt};
use tnb_model::{deployable, Deployable};

pub struct Horreum {
    configuration: HorreumConfiguration,
    http: Client,
}

impl Horreum {
    pub const NAME: &'static str = "horreum";

    pub fn new(configuration: HorreumConfiguration) -> Self {
        Self {
            configuration,
            http: Client::new(),
        }
    }

    /// Uploads `data` as a new run of the configured test and returns Horreum's response body,
    /// the id of the run.
    pub async fn upload_run<T>(&self, data: &T) -> Result<String>
    where
        T: Serialize + ?Sized,
    {
        let url = format!("{}/api/run/data", self.base_url()?);
        let query = [
            ("test", required("test_name", &self.configuration.test_name)?),
            ("owner", required("test_owner", &self.configuration.test_owner)?),
            ("access", "PUBLIC"),
            ("schema", required("schema", &self.configuration.schema)?),
        ];
        if self.configuration.http_log_enabled {
            info!(
                "POST {} {:?}: {}",
                url,
                query,
                serde_json::to_string(data).unwrap_or_default()
            );
        }
        let response = self
            .http
            .post(&url)
            .query(&query)
            .json(data)
            .send()
            .await
            .context(error::HttpSnafu {
                action: "upload run to Horreum",
            })?;
        self.read_success(response, "upload run to Horreum").await
    }

    async fn version(&self) -> Result<String> {
        let url = format!("{}/api/config/version", self.base_url()?);
        if self.configuration.http_log_enabled {
            info!("GET {}", url);
        }
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .context(error::HttpSnafu {
                action: "get Horreum version",
            })?;
        self.read_success(response, "get Horreum version").await
    }

    async fn read_success(&self, response: Response, action: &str) -> Result<String> {
        let status = response.status();
        let body = response
            .text()
            .await
            .context(error::HttpSnafu { action })?;
        if self.configuration.http_log_enabled {
            info!("{} {}", status, body);
        }
        ensure!(
            status.is_success(),
            error::HttpStatusSnafu {
                action,
                status,
                body
            }
        );
        Ok(body)
    }

    fn base_url(&self) -> Result<&str> {
        Ok(required("url", &self.configuration.url)?.trim_end_matches('/'))
    }
}

fn required<'a>(name: &str, value: &'a Option<String>) -> Result<&'a str> {
    value
        .as_deref()
        .context(error::MissingConfigurationSnafu {
            name: format!("HORREUM_{}", name.to_uppercase()),
        })
}

#[async_trait]
impl Deployable for Horreum {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn create(&mut self) -> deployable::Result<()> {
        Ok(())
    }

    async fn undeploy(&mut self) -> deployable::Result<()> {
        Ok(())
    }

    /// Horreum is ready once it answers version requests.
    async fn is_ready(&self) -> deployable::Result<bool> {
        match self.version().await {
            Ok(version) => {
                debug!("Horreum version {}", version);
                Ok(true)
            }
            Err(e @ error::Error::MissingConfiguration { .. }) => Err(error::service(Self::NAME)(e)),
            Err(e) => {
                debug!("Horreum is not ready: {}", e);
                Ok(false)
            }
        }
    }

    async fn is_deployed(&self) -> deployable::Result<bool> {
        Ok(true)
    }
}
