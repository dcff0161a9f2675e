pub mod docker;
pub mod restart;

#[cfg(any(test, feature = "testing"))]
pub mod fake;

// Re-export dependencies potentially needed by consumers (like the gateway)
pub use bollard;
pub use dockgate_common as common;

pub use docker::DockerEngine;
pub use restart::{failure_message, restart_container, restart_many, restart_message};
