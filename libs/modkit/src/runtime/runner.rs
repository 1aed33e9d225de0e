//! ModKit runtime runner.
//!
//! Phase order: **init → wait**. Shutdown can be driven by OS signals, an external
//! `CancellationToken`, or happen right after init for one-shot bootstrap runs.

use crate::config::ConfigProvider;
use crate::contracts::Module;
use crate::runtime::{shutdown, HostRuntime};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// How the runtime should decide when to stop.
pub enum ShutdownOptions {
    /// Listen for OS signals (Ctrl+C / SIGTERM).
    Signals,
    /// An external `CancellationToken` controls the lifecycle.
    Token(CancellationToken),
    /// Stop as soon as every module is initialized.
    AfterInit,
}

/// Options for running the ModKit runner.
pub struct RunOptions {
    /// Provider of module config sections (raw JSON by module name).
    pub modules_cfg: Arc<dyn ConfigProvider>,
    /// Modules in initialization order.
    pub modules: Vec<Arc<dyn Module>>,
    /// Shutdown strategy.
    pub shutdown: ShutdownOptions,
}

/// Full cycle: init → wait.
///
/// # Errors
/// Returns an error if a module fails to initialize.
pub async fn run(opts: RunOptions) -> anyhow::Result<()> {
    let cancel = match &opts.shutdown {
        ShutdownOptions::Token(t) => t.clone(),
        ShutdownOptions::Signals | ShutdownOptions::AfterInit => CancellationToken::new(),
    };

    let runtime = HostRuntime::new(opts.modules_cfg, opts.modules, cancel.clone())?;
    runtime.run_init_phase().await?;

    match opts.shutdown {
        ShutdownOptions::AfterInit => {
            tracing::info!("shutdown: one-shot run finished after init");
            cancel.cancel();
        }
        ShutdownOptions::Signals => {
            if let Err(e) = shutdown::wait_for_shutdown().await {
                tracing::warn!(error = %e, "shutdown: signal waiter failed; stopping now");
            }
            cancel.cancel();
        }
        ShutdownOptions::Token(_) => {
            tracing::info!("shutdown: external token will control lifecycle");
            cancel.cancelled().await;
        }
    }

    tracing::info!("Phase: stop");
    Ok(())
}
