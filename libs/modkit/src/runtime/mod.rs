mod host_runtime;
mod runner;
pub mod shutdown;

pub use host_runtime::{HostRuntime, RuntimeError};
pub use runner::{run, RunOptions, ShutdownOptions};
