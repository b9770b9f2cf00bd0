use serde::Deserialize;
use tnb_model::FromEnv;

/// Settings of the services provided by this crate, read from `SYSTEM_X_*` environment
/// variables.
///
/// ```text
/// SYSTEM_X_MONGODB_IMAGE=registry.hub.docker.com/bitnami/mongodb:4.4.15
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct SystemXConfiguration {
    #[serde(default = "mongodb_image")]
    pub mongodb_image: String,
    #[serde(default = "mongodb_username")]
    pub mongodb_username: String,
    #[serde(default = "mongodb_password")]
    pub mongodb_password: String,
    #[serde(default = "mongodb_database")]
    pub mongodb_database: String,
    #[serde(default = "mongodb_root_password")]
    pub mongodb_root_password: String,
    #[serde(default = "mongodb_replica_set_key")]
    pub mongodb_replica_set_key: String,
}

impl FromEnv for SystemXConfiguration {
    const PREFIX: &'static str = "SYSTEM_X_";
}

impl Default for SystemXConfiguration {
    fn default() -> Self {
        Self {
            mongodb_image: mongodb_image(),
            mongodb_username: mongodb_username(),
            mongodb_password: mongodb_password(),
            mongodb_database: mongodb_database(),
            mongodb_root_password: mongodb_root_password(),
            mongodb_replica_set_key: mongodb_replica_set_key(),
        }
    }
}

/// We need these to provide defaults for serde.
fn mongodb_image() -> String {
    "registry.hub.docker.com/bitnami/mongodb:4.4.15".to_string()
}

fn mongodb_username() -> String {
    "user".to_string()
}

fn mongodb_password() -> String {
    "user".to_string()
}

fn mongodb_database() -> String {
    "sampledb".to_string()
}

fn mongodb_root_password() -> String {
    "admin".to_string()
}

fn mongodb_replica_set_key() -> String {
    "replicasetkey".to_string()
}
