use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::config::{module_config_or_default, ConfigError, ConfigProvider};
use crate::request_bus::RequestBus;

/// Module execution context handed to `Module::init`.
///
/// Gives a module access to:
/// - **Configuration**: typed loading of its own `modules.<name>.config` section
/// - **Request bus**: registering topics it answers and asking topics other modules answer
/// - **Lifecycle**: the process cancellation token
///
/// ```ignore
/// async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
///     let cfg: MyConfig = ctx.config()?;
///     ctx.request_bus().register("my:topic", |name: String| async move { Ok(!name.is_empty()) })?;
///     let ok: bool = ctx.request_bus().ask("other:topic", "x".to_owned()).await?;
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct ModuleCtx {
    module_name: Arc<str>,
    config_provider: Arc<dyn ConfigProvider>,
    request_bus: Arc<RequestBus>,
    cancellation_token: CancellationToken,
}

impl ModuleCtx {
    #[must_use]
    pub fn new(
        module_name: impl Into<Arc<str>>,
        config_provider: Arc<dyn ConfigProvider>,
        request_bus: Arc<RequestBus>,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            module_name: module_name.into(),
            config_provider,
            request_bus,
            cancellation_token,
        }
    }

    #[inline]
    #[must_use]
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    #[inline]
    #[must_use]
    pub fn config_provider(&self) -> &dyn ConfigProvider {
        &*self.config_provider
    }

    #[inline]
    #[must_use]
    pub fn request_bus(&self) -> &Arc<RequestBus> {
        &self.request_bus
    }

    #[inline]
    #[must_use]
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation_token
    }

    /// Deserialize this module's config section, or use defaults if it is missing.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidConfig` if the section is present but malformed.
    pub fn config<T: DeserializeOwned + Default>(&self) -> Result<T, ConfigError> {
        module_config_or_default(self.config_provider.as_ref(), &self.module_name)
    }
}

/// Builds per-module contexts that share one config provider, bus and root token.
pub struct ModuleContextBuilder {
    config_provider: Arc<dyn ConfigProvider>,
    request_bus: Arc<RequestBus>,
    root_token: CancellationToken,
}

impl ModuleContextBuilder {
    #[must_use]
    pub fn new(
        config_provider: Arc<dyn ConfigProvider>,
        request_bus: Arc<RequestBus>,
        root_token: CancellationToken,
    ) -> Self {
        Self {
            config_provider,
            request_bus,
            root_token,
        }
    }

    #[must_use]
    pub fn for_module(&self, module_name: &str) -> ModuleCtx {
        ModuleCtx::new(
            module_name,
            self.config_provider.clone(),
            self.request_bus.clone(),
            self.root_token.child_token(),
        )
    }
}
