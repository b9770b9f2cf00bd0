use serde::Deserialize;
use tnb_model::FromEnv;

/// Where results are uploaded to, read from `HORREUM_*` environment variables.
///
/// ```text
/// HORREUM_URL=https://horreum.example.com
/// HORREUM_TEST_NAME=camel-perf
/// HORREUM_SCHEMA=urn:camel-perf:1.0
/// HORREUM_TEST_OWNER=perf-team
/// HORREUM_HTTP_LOG_ENABLED=true
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HorreumConfiguration {
    pub url: Option<String>,
    pub test_name: Option<String>,
    pub schema: Option<String>,
    pub test_owner: Option<String>,
    /// Log every request and response at `info` level.
    #[serde(default)]
    pub http_log_enabled: bool,
}

impl FromEnv for HorreumConfiguration {
    const PREFIX: &'static str = "HORREUM_";
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn read_from_prefixed_variables() {
        let configuration = HorreumConfiguration::from_iter(vec![
            ("HORREUM_URL".to_string(), "http://localhost:8080".to_string()),
            ("HORREUM_TEST_NAME".to_string(), "perf".to_string()),
            ("HORREUM_HTTP_LOG_ENABLED".to_string(), "true".to_string()),
        ])
        .unwrap();
        assert_eq!(configuration.url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(configuration.test_name.as_deref(), Some("perf"));
        assert!(configuration.schema.is_none());
        assert!(configuration.http_log_enabled);
    }

    #[test]
    fn logging_is_off_by_default() {
        let configuration = HorreumConfiguration::from_iter(Vec::new()).unwrap();
        assert!(!configuration.http_log_enabled);
    }
}
