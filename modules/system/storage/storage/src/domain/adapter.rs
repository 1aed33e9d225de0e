use std::sync::Arc;

use parking_lot::RwLock;
use storage_sdk::{StorageClient, StorageError, StoreScope};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterState {
    Uninitialized,
    Ready,
}

/// Wraps the backend client of one scope and tracks whether it was initialized.
pub struct ClientAdapter {
    scope: StoreScope,
    client: Arc<dyn StorageClient>,
    state: RwLock<AdapterState>,
}

impl ClientAdapter {
    #[must_use]
    pub fn new(scope: StoreScope, client: Arc<dyn StorageClient>) -> Self {
        Self {
            scope,
            client,
            state: RwLock::new(AdapterState::Uninitialized),
        }
    }

    #[must_use]
    pub fn scope(&self) -> StoreScope {
        self.scope
    }

    #[must_use]
    pub fn state(&self) -> AdapterState {
        *self.state.read()
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state() == AdapterState::Ready
    }

    /// Initialize the backend client and mark the adapter ready.
    ///
    /// # Errors
    /// Returns `StorageError::Connection` if the backend cannot be reached.
    pub async fn init(&self) -> Result<(), StorageError> {
        self.client
            .init()
            .await
            .map_err(|e| StorageError::Connection {
                scope: self.scope,
                message: e.to_string(),
            })?;
        *self.state.write() = AdapterState::Ready;
        tracing::debug!(scope = %self.scope, "storage client ready");
        Ok(())
    }

    /// Index names the backend currently holds, read at call time.
    ///
    /// # Errors
    /// - `StorageError::NotReady` before a successful [`ClientAdapter::init`]
    /// - `StorageError::Connection` if the backend fails to answer
    pub async fn list_indexes(&self) -> Result<Vec<String>, StorageError> {
        if !self.is_ready() {
            return Err(StorageError::NotReady { scope: self.scope });
        }
        self.client
            .list_indexes()
            .await
            .map_err(|e| StorageError::Connection {
                scope: self.scope,
                message: e.to_string(),
            })
    }

    #[must_use]
    pub fn is_index_name_valid(&self, name: &str) -> bool {
        self.client.is_index_name_valid(name)
    }

    #[must_use]
    pub fn is_collection_name_valid(&self, name: &str) -> bool {
        self.client.is_collection_name_valid(name)
    }

    /// Back to `Uninitialized`; the next use requires a new `init`.
    pub fn reset(&self) {
        *self.state.write() = AdapterState::Uninitialized;
    }
}

impl std::fmt::Debug for ClientAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientAdapter")
            .field("scope", &self.scope)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
