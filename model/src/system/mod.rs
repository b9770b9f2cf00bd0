/// Encapsulates TNB related K8S object definitions
mod config_map;
mod namespace;
mod operator;
mod workload;

pub use config_map::config_map;
pub use namespace::namespace;
pub use operator::{operator_group, subscription};
pub use workload::{deployment_config, service, Workload};
