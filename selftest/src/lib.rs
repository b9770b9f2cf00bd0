/*!

Provides utilities for testing the tnb tooling using `kind` and `docker`.
We call this testing modality `selftest` to distinguish it from the test suites the tooling
provisions services for.

!*/

pub mod cluster;
pub mod test_settings;

pub use cluster::Cluster;
pub use test_settings::TestSettings;
