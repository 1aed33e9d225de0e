//! Storage module.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use modkit::{Module, ModuleCtx};
use storage_sdk::StorageClient;
use tracing::info;

use crate::config::{ScopeConfig, StorageConfig};
use crate::domain::StorageEngine;
use crate::infra::InMemoryStorageClient;

/// Storage module.
///
/// During init it:
/// 1. Builds an in-memory backend per scope from `modules.storage.config`
/// 2. Initializes the [`StorageEngine`], which rejects overlapping scopes
/// 3. Leaves the storage topics registered on the request bus
#[derive(Default)]
pub struct StorageModule {
    engine: OnceLock<Arc<StorageEngine>>,
}

impl StorageModule {
    pub const NAME: &'static str = "storage";

    /// The engine, once `init` has succeeded.
    #[must_use]
    pub fn engine(&self) -> Option<&Arc<StorageEngine>> {
        self.engine.get()
    }
}

fn backend(cfg: &ScopeConfig) -> Arc<dyn StorageClient> {
    Arc::new(InMemoryStorageClient::with_indexes(
        cfg.naming,
        cfg.indexes.iter().cloned(),
    ))
}

#[async_trait]
impl Module for StorageModule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    #[tracing::instrument(skip_all, fields(module = Self::NAME))]
    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        let cfg: StorageConfig = ctx.config()?;
        info!(
            public_indexes = cfg.public.indexes.len(),
            private_indexes = cfg.private.indexes.len(),
            "Initializing storage module"
        );

        let engine = Arc::new(StorageEngine::new(
            Arc::clone(ctx.request_bus()),
            backend(&cfg.public),
            backend(&cfg.private),
        ));
        engine.init().await?;

        self.engine
            .set(engine)
            .map_err(|_| anyhow::anyhow!("Storage engine already initialized"))?;
        Ok(())
    }
}
