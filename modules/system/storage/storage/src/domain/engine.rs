//! Storage engine: the pair of scope adapters and the bus handlers routed to them.

use std::collections::BTreeSet;
use std::sync::Arc;

use modkit::{BoxError, Registrations, RequestBus};
use storage_sdk::{StorageClient, StorageError, StoreScope, topics};

use super::adapter::ClientAdapter;

/// Owns exactly one [`ClientAdapter`] per scope.
///
/// After a successful [`StorageEngine::init`] the public and private index name
/// sets are disjoint and the storage topics are answered by the public adapter.
pub struct StorageEngine {
    bus: Arc<RequestBus>,
    public: Arc<ClientAdapter>,
    private: Arc<ClientAdapter>,
    // Held across the whole init sequence so concurrent callers observe one outcome.
    initialized: tokio::sync::Mutex<bool>,
}

impl StorageEngine {
    #[must_use]
    pub fn new(
        bus: Arc<RequestBus>,
        public_client: Arc<dyn StorageClient>,
        private_client: Arc<dyn StorageClient>,
    ) -> Self {
        Self {
            bus,
            public: Arc::new(ClientAdapter::new(StoreScope::Public, public_client)),
            private: Arc::new(ClientAdapter::new(StoreScope::Private, private_client)),
            initialized: tokio::sync::Mutex::new(false),
        }
    }

    #[must_use]
    pub fn public(&self) -> &ClientAdapter {
        &self.public
    }

    #[must_use]
    pub fn private(&self) -> &ClientAdapter {
        &self.private
    }

    #[must_use]
    pub fn adapter(&self, scope: StoreScope) -> &ClientAdapter {
        match scope {
            StoreScope::Public => &self.public,
            StoreScope::Private => &self.private,
        }
    }

    /// Bring both scopes up, check their namespaces are disjoint, then register
    /// the storage topics on the bus.
    ///
    /// On any failure both adapters are reset and nothing is registered, so the
    /// caller may retry.
    ///
    /// # Errors
    /// - `StorageError::AlreadyInitialized` if a previous call succeeded
    /// - `StorageError::Connection` if either backend is unreachable
    /// - `StorageError::IndexAlreadyExists` if an index name exists in both scopes
    /// - `StorageError::Bus` if a storage topic is already answered by someone else
    #[tracing::instrument(name = "storage_engine.init", skip_all)]
    pub async fn init(&self) -> Result<(), StorageError> {
        let mut initialized = self.initialized.lock().await;
        if *initialized {
            return Err(StorageError::AlreadyInitialized);
        }

        if let Err(e) = self.bring_up().await {
            self.public.reset();
            self.private.reset();
            tracing::error!(code = e.code(), error = %e, "storage engine failed to initialize");
            return Err(e);
        }

        *initialized = true;
        tracing::info!("storage engine initialized");
        Ok(())
    }

    async fn bring_up(&self) -> Result<(), StorageError> {
        tokio::try_join!(self.public.init(), self.private.init())?;

        let (public_indexes, private_indexes) =
            tokio::try_join!(self.public.list_indexes(), self.private.list_indexes())?;
        tracing::debug!(
            public = public_indexes.len(),
            private = private_indexes.len(),
            "listed indexes"
        );

        let collisions = colliding_indexes(&public_indexes, &private_indexes);
        if !collisions.is_empty() {
            return Err(StorageError::IndexAlreadyExists {
                indexes: collisions,
            });
        }

        self.register_handlers()
    }

    // Both topics land together or not at all.
    fn register_handlers(&self) -> Result<(), StorageError> {
        let index = Arc::clone(&self.public);
        let collection = Arc::clone(&self.public);
        self.bus.register_all(
            Registrations::new()
                .with(topics::INDEX_IS_VALID, move |name: String| {
                    let valid = index.is_index_name_valid(&name);
                    async move { Ok::<_, BoxError>(valid) }
                })
                .with(topics::COLLECTION_IS_VALID, move |name: String| {
                    let valid = collection.is_collection_name_valid(&name);
                    async move { Ok::<_, BoxError>(valid) }
                }),
        )?;
        Ok(())
    }
}

/// Names present in both lists, sorted and deduplicated.
fn colliding_indexes(public: &[String], private: &[String]) -> Vec<String> {
    let private: BTreeSet<&str> = private.iter().map(String::as_str).collect();
    public
        .iter()
        .map(String::as_str)
        .filter(|name| private.contains(name))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}
