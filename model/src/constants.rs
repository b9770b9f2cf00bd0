/// Helper macro to avoid retyping the base domain-like name of our system when creating further
/// string constants from it. When given no parameters, this returns the base domain-like name of
/// the system. When given a string literal parameter it adds `/parameter` to the end.
macro_rules! tnb {
    () => {
        "tnb.software"
    };
    ($s:literal) => {
        concat!(tnb!(), "/", $s)
    };
}

// System identifiers
pub const MANAGER: &str = "tnb";
pub const LABEL_SERVICE: &str = tnb!("service");

// Label keys
pub const DEFAULT_DEPLOYMENT_LABEL: &str = "app";

// OLM
pub const MARKETPLACE_NAMESPACE: &str = "openshift-marketplace";
pub const INSTALL_PLAN_COMPLETE: &str = "complete";

// Wait budgets, expressed as attempts of `WAIT_INTERVAL`.
pub const WAIT_INTERVAL_MS: u64 = 5000;
pub const INSTALL_PLAN_ATTEMPTS: u32 = 60;
pub const IMAGE_STREAM_ATTEMPTS: u32 = 24;
pub const BUILD_ATTEMPTS: u32 = 360;
pub const READY_ATTEMPTS: u32 = 60;

// Pod readiness
pub const POD_READY_CONDITION: &str = "Ready";
pub const POD_POLL_INTERVAL_MS: u64 = 1000;
pub const UNDEPLOY_TIMEOUT_SECS: u64 = 120;

// Standard tags https://kubernetes.io/docs/concepts/overview/working-with-objects/common-labels/
pub const APP_MANAGED_BY: &str = "app.kubernetes.io/managed-by";

#[test]
fn tnb_constants_macro_test() {
    assert_eq!("tnb.software", tnb!());
    assert_eq!("tnb.software/service", LABEL_SERVICE);
    assert_eq!("tnb.software/foo", tnb!("foo"));
}
