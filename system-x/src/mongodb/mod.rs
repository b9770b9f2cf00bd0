//! MongoDB, deployed as a single-member replica set.

mod openshift;

pub use openshift::OpenshiftMongoDb;

use crate::SystemXConfiguration;
use maplit::btreemap;
use std::collections::BTreeMap;

/// The port MongoDB listens on.
pub const PORT: u16 = 27017;

/// The credentials and database a MongoDB instance is set up with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MongoDbAccount {
    pub username: String,
    pub password: String,
    pub database: String,
    pub root_password: String,
    pub replica_set_key: String,
}

impl From<&SystemXConfiguration> for MongoDbAccount {
    fn from(configuration: &SystemXConfiguration) -> Self {
        Self {
            username: configuration.mongodb_username.clone(),
            password: configuration.mongodb_password.clone(),
            database: configuration.mongodb_database.clone(),
            root_password: configuration.mongodb_root_password.clone(),
            replica_set_key: configuration.mongodb_replica_set_key.clone(),
        }
    }
}

impl MongoDbAccount {
    /// The environment the MongoDB container image is configured with.
    pub fn container_environment(&self, advertised_hostname: &str) -> BTreeMap<String, String> {
        btreemap! {
            "MONGODB_USERNAME".to_string() => self.username.clone(),
            "MONGODB_PASSWORD".to_string() => self.password.clone(),
            "MONGODB_DATABASE".to_string() => self.database.clone(),
            "MONGODB_ROOT_PASSWORD".to_string() => self.root_password.clone(),
            "MONGODB_REPLICA_SET_MODE".to_string() => "primary".to_string(),
            "MONGODB_REPLICA_SET_KEY".to_string() => self.replica_set_key.clone(),
            "MONGODB_ADVERTISED_HOSTNAME".to_string() => advertised_hostname.to_string(),
        }
    }

    /// The connection string for the replica set reachable as `host:port`.
    pub fn replica_set_url(&self, host: &str, port: u16) -> String {
        format!(
            "mongodb://{}:{}@{}:{}/{}",
            self.username, self.password, host, port, self.database
        )
    }
}
