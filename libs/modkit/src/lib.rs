//! Core ModKit library: the pieces a host needs to bring modules up.
//!
//! - [`request_bus`]: topic-keyed request/response bus shared by all modules
//! - [`config`]: typed per-module configuration sections
//! - [`context`]: the [`ModuleCtx`] handed to `Module::init`
//! - [`runtime`]: ordered module initialization and shutdown strategies
//! - [`logging`]: process-wide `tracing` subscriber setup
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod context;
pub mod contracts;
pub mod logging;
pub mod request_bus;
pub mod runtime;

pub use config::{module_config_or_default, module_config_required, ConfigError, ConfigProvider};
pub use context::{ModuleContextBuilder, ModuleCtx};
pub use contracts::Module;
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use request_bus::{BoxError, Registrations, RequestBus, RequestBusError};
