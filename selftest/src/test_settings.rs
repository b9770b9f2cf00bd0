use anyhow::{Context, Result};
use serde::Deserialize;

/// Settings for running the selftests, read from `TNB_SELFTEST_*` environment variables.
///
/// # Example
///
/// ```text
/// TNB_SELFTEST_KIND_PATH=/wherever/kind TNB_SELFTEST_KEEP_CLUSTER=true cargo test --features integ
/// ```
#[derive(Debug, Deserialize, PartialEq)]
pub struct TestSettings {
    /// The path to the [kind] binary. By default `kind` is looked up in `$PATH`.
    ///
    /// [kind]: https://kind.sigs.k8s.io/
    #[serde(default = "kind")]
    pub kind_path: String,

    /// Leave the kind cluster running when the test finishes so it can be inspected.
    #[serde(default)]
    pub keep_cluster: bool,
}

impl TestSettings {
    const PREFIX: &'static str = "TNB_SELFTEST_";

    pub fn from_env() -> Result<Self> {
        Self::from_iter(std::env::vars())
    }

    fn from_iter<I>(vars: I) -> Result<Self>
    where
        I: Iterator<Item = (String, String)>,
    {
        envy::prefixed(Self::PREFIX)
            .from_iter(vars)
            .context("Unable to read the selftest settings from the environment")
    }
}

fn kind() -> String {
    String::from("kind")
}

#[cfg(test)]
mod test {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Iterator<Item = (String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn defaults() {
        let settings = TestSettings::from_iter(vars(&[("KIND_PATH", "/ignored")])).unwrap();
        assert_eq!(settings.kind_path, "kind");
        assert!(!settings.keep_cluster);
    }

    #[test]
    fn prefixed_overrides() {
        let settings = TestSettings::from_iter(vars(&[
            ("TNB_SELFTEST_KIND_PATH", "/opt/kind"),
            ("TNB_SELFTEST_KEEP_CLUSTER", "true"),
        ]))
        .unwrap();
        assert_eq!(settings.kind_path, "/opt/kind");
        assert!(settings.keep_cluster);
    }

    #[test]
    fn invalid_flag_is_an_error() {
        assert!(TestSettings::from_iter(vars(&[("TNB_SELFTEST_KEEP_CLUSTER", "maybe")])).is_err());
    }
}
