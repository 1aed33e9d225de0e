//! Host Runtime - drives modules through the startup lifecycle.
//!
//! Phase order:
//! - `init` (all modules, in the order the host listed them)
//! - wait (until the shutdown strategy fires)
//!
//! A module failing `init` aborts startup; modules after it are not initialized.

use std::collections::HashSet;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::config::ConfigProvider;
use crate::context::ModuleContextBuilder;
use crate::contracts::Module;
use crate::request_bus::RequestBus;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("module '{module}' is listed more than once")]
    DuplicateModule { module: &'static str },

    #[error("module '{module}' failed to initialize: {source}")]
    Init {
        module: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

/// Owns the request bus and the ordered module list for one process.
pub struct HostRuntime {
    modules: Vec<Arc<dyn Module>>,
    ctx_builder: ModuleContextBuilder,
    request_bus: Arc<RequestBus>,
    cancel: CancellationToken,
}

impl HostRuntime {
    /// Prepare a runtime; no module code runs until [`HostRuntime::run_init_phase`].
    ///
    /// # Errors
    /// Returns `RuntimeError::DuplicateModule` if two modules share a name.
    pub fn new(
        modules_cfg: Arc<dyn ConfigProvider>,
        modules: Vec<Arc<dyn Module>>,
        cancel: CancellationToken,
    ) -> Result<Self, RuntimeError> {
        let mut seen = HashSet::new();
        for module in &modules {
            if !seen.insert(module.name()) {
                return Err(RuntimeError::DuplicateModule {
                    module: module.name(),
                });
            }
        }

        let request_bus = Arc::new(RequestBus::new());
        let ctx_builder =
            ModuleContextBuilder::new(modules_cfg, Arc::clone(&request_bus), cancel.clone());

        Ok(Self {
            modules,
            ctx_builder,
            request_bus,
            cancel,
        })
    }

    #[must_use]
    pub fn request_bus(&self) -> &Arc<RequestBus> {
        &self.request_bus
    }

    #[must_use]
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// INIT phase: initialize every module in order, stopping at the first failure.
    ///
    /// # Errors
    /// Returns `RuntimeError::Init` naming the module that failed.
    pub async fn run_init_phase(&self) -> Result<(), RuntimeError> {
        tracing::info!(modules = self.modules.len(), "Phase: init");
        for module in &self.modules {
            let ctx = self.ctx_builder.for_module(module.name());
            tracing::debug!(module = module.name(), "initializing module");
            module
                .init(&ctx)
                .await
                .map_err(|source| RuntimeError::Init {
                    module: module.name(),
                    source,
                })?;
            tracing::info!(module = module.name(), "module initialized");
        }
        tracing::info!(topics = ?self.request_bus.topics(), "init phase complete");
        Ok(())
    }
}
