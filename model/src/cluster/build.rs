use super::{error, OpenshiftClient, Result};
use crate::cluster::AllowNotFound;
use crate::constants::{BUILD_ATTEMPTS, IMAGE_STREAM_ATTEMPTS, WAIT_INTERVAL_MS};
use crate::openshift::{Build, BuildConfig, BuildPhase, ImageStream};
use crate::wait::{wait_for, Waiter};
use http::header::CONTENT_TYPE;
use http::Request;
use kube::ResourceExt;
use log::{debug, info};
use snafu::ResultExt;
use std::path::Path;
use std::time::Duration;

impl OpenshiftClient {
    /// Waits until the image stream `name` lists `tag`.
    pub async fn wait_for_image_stream(&self, name: &str, tag: &str) -> Result<()> {
        wait_for(
            || self.image_stream_has_tag(name, tag),
            IMAGE_STREAM_ATTEMPTS,
            Duration::from_millis(WAIT_INTERVAL_MS),
            format!("Waiting until the image stream {} with tag {} exists", name, tag),
        )
        .await
        .context(error::WaitSnafu)
    }

    async fn image_stream_has_tag(&self, name: &str, tag: &str) -> Result<bool> {
        Ok(self
            .namespaced_api::<ImageStream>()
            .get(name)
            .await
            .allow_not_found(|_| ())
            .context(error::KubeSnafu {
                action: format!("get image stream '{}'", name),
            })?
            .map(|image_stream| image_stream.has_tag(tag))
            .unwrap_or(false))
    }

    /// Starts a binary build of the build config `name` from the contents of `file_path` and
    /// waits until the build completes.
    pub async fn do_s2i_build(&self, name: &str, file_path: &Path) -> Result<()> {
        self.do_s2i_build_with_attempts(name, file_path, BUILD_ATTEMPTS)
            .await
    }

    /// Like [`OpenshiftClient::do_s2i_build`], giving up after `max_attempts` polls of the
    /// build's phase.
    pub async fn do_s2i_build_with_attempts(
        &self,
        name: &str,
        file_path: &Path,
        max_attempts: u32,
    ) -> Result<()> {
        let content = tokio::fs::read(file_path).await.context(error::FileSnafu {
            path: file_path.to_path_buf(),
        })?;
        info!(
            "Starting binary build of '{}' from '{}' ({} bytes)",
            name,
            file_path.display(),
            content.len()
        );

        let uri = format!(
            "/apis/build.openshift.io/v1/namespaces/{}/buildconfigs/{}/instantiatebinary",
            self.namespace(),
            name
        );
        let request = Request::post(&uri)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(content)
            .context(error::HttpRequestSnafu { what: &uri })?;
        let build: Build = self
            .k8s_client
            .request(request)
            .await
            .context(error::KubeSnafu {
                action: format!("instantiate binary build of '{}'", name),
            })?;
        debug!("Started build '{}'", build.name_any());

        Waiter::new(format!("Waiting until the build {} completes", name))
            .interval(Duration::from_millis(WAIT_INTERVAL_MS))
            .max_attempts(max_attempts)
            .until_either(
                || self.last_build_is(name, BuildPhase::is_complete),
                || self.last_build_is(name, BuildPhase::is_failed),
            )
            .await
            .context(error::WaitSnafu)
    }

    /// Whether the latest build of the build config `name` is in a phase matching `matches`. A
    /// build config or build that does not exist yet, or a build without a phase, never matches.
    async fn last_build_is<F>(&self, name: &str, matches: F) -> Result<bool>
    where
        F: Fn(&BuildPhase) -> bool,
    {
        let build_config = match self
            .namespaced_api::<BuildConfig>()
            .get(name)
            .await
            .allow_not_found(|_| ())
            .context(error::KubeSnafu {
                action: format!("get build config '{}'", name),
            })? {
            Some(build_config) => build_config,
            None => return Ok(false),
        };
        let build_name = build_config.last_build_name();
        let phase = self
            .namespaced_api::<Build>()
            .get(&build_name)
            .await
            .allow_not_found(|_| ())
            .context(error::KubeSnafu {
                action: format!("get build '{}'", build_name),
            })?
            .and_then(|build| build.phase());
        Ok(phase.as_ref().map(matches).unwrap_or(false))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cluster::mock::{self, count};
    use crate::cluster::Error;
    use crate::wait;
    use http::{Method, StatusCode};
    use serde_json::{json, Value};
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::NamedTempFile;

    const GROUP: &str = "build.openshift.io/v1";

    fn image_stream_json(tags: &[&str]) -> Value {
        json!({
            "apiVersion": "image.openshift.io/v1",
            "kind": "ImageStream",
            "metadata": { "name": "fuse-java-openshift" },
            "spec": {
                "tags": tags.iter().map(|tag| json!({ "name": tag })).collect::<Vec<_>>()
            }
        })
    }

    fn build_config_json() -> Value {
        json!({
            "apiVersion": GROUP,
            "kind": "BuildConfig",
            "metadata": { "name": "my-integration" },
            "spec": {},
            "status": { "lastVersion": 1 }
        })
    }

    fn build_json(phase: &str) -> Value {
        json!({
            "apiVersion": GROUP,
            "kind": "Build",
            "metadata": { "name": "my-integration-1" },
            "spec": {},
            "status": { "phase": phase }
        })
    }

    fn archive() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"integration archive").unwrap();
        file
    }

    #[tokio::test(start_paused = true)]
    async fn image_stream_wait_outlasts_missing_stream_and_tag() {
        let polls = AtomicUsize::new(0);
        let (client, requests) = mock::client(move |_| match polls.fetch_add(1, Ordering::SeqCst) {
            0 => mock::not_found(),
            1 => mock::ok(image_stream_json(&["1.9"])),
            _ => mock::ok(image_stream_json(&["1.9", "1.10"])),
        });
        client
            .wait_for_image_stream("fuse-java-openshift", "1.10")
            .await
            .unwrap();
        assert_eq!(requests.lock().unwrap().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn image_stream_wait_times_out() {
        let (client, requests) = mock::client(|_| mock::not_found());
        let err = client
            .wait_for_image_stream("fuse-java-openshift", "1.10")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Wait {
                source: wait::Error::Timeout { attempts: IMAGE_STREAM_ATTEMPTS, .. }
            }
        ));
        assert_eq!(
            requests.lock().unwrap().len(),
            IMAGE_STREAM_ATTEMPTS as usize
        );
    }

    #[tokio::test(start_paused = true)]
    async fn image_stream_wait_stops_on_api_errors() {
        let (client, _) =
            mock::client(|_| mock::failure(StatusCode::INTERNAL_SERVER_ERROR, "InternalError"));
        let err = client
            .wait_for_image_stream("fuse-java-openshift", "1.10")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Wait {
                source: wait::Error::Probe { .. }
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn binary_build_uploads_file_and_waits_for_completion() {
        let build_config_polls = AtomicUsize::new(0);
        let build_polls = AtomicUsize::new(0);
        let (client, requests) = mock::client(move |request| {
            if request.method == Method::POST {
                mock::ok(build_json("New"))
            } else if request.path.ends_with("/buildconfigs/my-integration") {
                match build_config_polls.fetch_add(1, Ordering::SeqCst) {
                    0 => mock::not_found(),
                    _ => mock::ok(build_config_json()),
                }
            } else {
                match build_polls.fetch_add(1, Ordering::SeqCst) {
                    0 => mock::ok(build_json("Running")),
                    _ => mock::ok(build_json("Complete")),
                }
            }
        });
        let file = archive();
        client
            .do_s2i_build("my-integration", file.path())
            .await
            .unwrap();

        let upload = mock::path(GROUP, "buildconfigs", "my-integration/instantiatebinary");
        assert_eq!(count(&requests, Method::POST, &upload), 1);
        let requests = requests.lock().unwrap();
        let posted = requests
            .iter()
            .find(|request| request.method == Method::POST)
            .unwrap();
        assert_eq!(posted.body, b"integration archive");
    }

    #[tokio::test(start_paused = true)]
    async fn failed_builds_end_the_wait() {
        for phase in ["Failed", "Error", "Cancelled"] {
            let (client, requests) = mock::client(move |request| {
                if request.method == Method::POST {
                    mock::ok(build_json("New"))
                } else if request.path.ends_with("/buildconfigs/my-integration") {
                    mock::ok(build_config_json())
                } else {
                    mock::ok(build_json(phase))
                }
            });
            let file = archive();
            let err = client
                .do_s2i_build_with_attempts("my-integration", file.path(), 5)
                .await
                .unwrap_err();
            assert!(
                matches!(
                    err,
                    Error::Wait {
                        source: wait::Error::Failure { attempts: 1, .. }
                    }
                ),
                "{}: {}",
                phase,
                err
            );
            let build = mock::path(GROUP, "builds", "my-integration-1");
            // One poll each for the success and the failure condition.
            assert_eq!(count(&requests, Method::GET, &build), 2);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn build_wait_stops_on_api_errors() {
        let (client, _) = mock::client(|request| {
            if request.method == Method::POST {
                mock::ok(build_json("New"))
            } else {
                mock::failure(StatusCode::FORBIDDEN, "Forbidden")
            }
        });
        let file = archive();
        let err = client
            .do_s2i_build_with_attempts("my-integration", file.path(), 5)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Wait {
                source: wait::Error::Probe { .. }
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn build_that_never_finishes_times_out() {
        let (client, _) = mock::client(|request| {
            if request.method == Method::POST {
                mock::ok(build_json("New"))
            } else if request.path.ends_with("/buildconfigs/my-integration") {
                mock::ok(build_config_json())
            } else {
                mock::ok(build_json("Running"))
            }
        });
        let file = archive();
        let err = client
            .do_s2i_build_with_attempts("my-integration", file.path(), 3)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Wait {
                source: wait::Error::Timeout { attempts: 3, .. }
            }
        ));
    }
}
