/*!

This library provides what test suites need to provision the services they test against in an
OpenShift cluster: typed definitions of the OpenShift objects involved, an `OpenshiftClient` that
creates them and waits for them to settle, and the `Deployable` abstraction services are built on.

!*/

#![deny(
    clippy::expect_used,
    clippy::get_unwrap,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::panicking_unwrap,
    clippy::unwrap_in_result,
    clippy::unwrap_used
)]

pub use cluster::OpenshiftClient;
pub use configuration::{FromEnv, OpenshiftConfiguration, TestConfiguration};
pub use deployable::{Backend, Deployable, Registry};
pub use wait::{wait_for, wait_for_either, Waiter};

pub mod cluster;
pub mod configuration;
pub mod constants;
pub mod deployable;
pub mod openshift;
pub mod system;
pub mod wait;
