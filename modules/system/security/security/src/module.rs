//! Security module.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use modkit::{BoxError, Module, ModuleCtx};
use security_sdk::{AdminExistence, FirstAdminRequest, SecurityError, topics};
use tracing::{info, warn};

use crate::config::SecurityConfig;
use crate::domain::{BootstrapDeps, FirstAdminBootstrap, reset_profiles, reset_roles};
use crate::infra::InMemorySecurityStore;

struct State {
    store: Arc<InMemorySecurityStore>,
    bootstrap: Arc<FirstAdminBootstrap>,
}

/// Security module.
///
/// Must be initialized after the storage module: it validates its internal index
/// name and profile restrictions through the storage topics.
#[derive(Default)]
pub struct SecurityModule {
    state: OnceLock<State>,
}

impl SecurityModule {
    pub const NAME: &'static str = "security";

    #[must_use]
    pub fn store(&self) -> Option<&Arc<InMemorySecurityStore>> {
        self.state.get().map(|s| &s.store)
    }

    #[must_use]
    pub fn bootstrap(&self) -> Option<&Arc<FirstAdminBootstrap>> {
        self.state.get().map(|s| &s.bootstrap)
    }
}

#[async_trait]
impl Module for SecurityModule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    #[tracing::instrument(skip_all, fields(module = Self::NAME))]
    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        let cfg: SecurityConfig = ctx.config()?;
        let bus = ctx.request_bus();
        info!(internal_index = %cfg.internal_index, "Initializing security module");

        let valid: bool = bus
            .ask(
                storage_sdk::topics::INDEX_IS_VALID,
                cfg.internal_index.clone(),
            )
            .await?;
        if !valid {
            anyhow::bail!("invalid internal index name '{}'", cfg.internal_index);
        }

        // The store starts empty on every process start; seed the built-in model.
        let store = Arc::new(InMemorySecurityStore::new(Arc::clone(bus)));
        reset_roles(&cfg.default_roles, store.as_ref()).await?;
        reset_profiles(store.as_ref()).await?;

        let bootstrap = Arc::new(FirstAdminBootstrap::new(
            BootstrapDeps::from_store(&store),
            cfg.default_roles.clone(),
        ));

        if let Some(first_admin) = &cfg.first_admin {
            match bootstrap.create_first_admin(first_admin.to_request()).await {
                Ok(user) => info!(user_id = %user.id, "first admin created from configuration"),
                Err(SecurityError::AdminExists) => {
                    warn!(user_id = %first_admin.id, "admin already set; skipping configured first admin");
                }
                Err(e) => return Err(e.into()),
            }
        }

        let admins = Arc::clone(&store);
        bus.register(topics::ADMIN_EXISTS, move |()| {
            let admins = Arc::clone(&admins);
            async move {
                admins
                    .admin_exists()
                    .await
                    .map(|a| a.exists)
                    .map_err(BoxError::from)
            }
        })?;

        let handler_bootstrap = Arc::clone(&bootstrap);
        bus.register(topics::FIRST_ADMIN_CREATE, move |request: FirstAdminRequest| {
            let bootstrap = Arc::clone(&handler_bootstrap);
            async move {
                bootstrap
                    .create_first_admin(request)
                    .await
                    .map_err(BoxError::from)
            }
        })?;

        self.state
            .set(State { store, bootstrap })
            .map_err(|_| anyhow::anyhow!("Security module already initialized"))?;
        Ok(())
    }
}
