//! Error types for the storage module.

use modkit::RequestBusError;
use thiserror::Error;

use crate::scope::StoreScope;

#[derive(Debug, Error)]
pub enum StorageError {
    /// The same index name exists in both scopes.
    #[error("indexes exist in both public and private scopes: {}", indexes.join(", "))]
    IndexAlreadyExists {
        /// Colliding names, sorted.
        indexes: Vec<String>,
    },

    #[error("{scope} storage connection failed: {message}")]
    Connection { scope: StoreScope, message: String },

    #[error("{scope} storage client is not initialized")]
    NotReady { scope: StoreScope },

    #[error("storage engine is already initialized")]
    AlreadyInitialized,

    #[error("request bus: {0}")]
    Bus(#[from] RequestBusError),
}

impl StorageError {
    /// Stable dotted error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            StorageError::IndexAlreadyExists { .. } => "services.storage.index_already_exists",
            StorageError::Connection { .. } => "services.storage.connection_failed",
            StorageError::NotReady { .. } => "services.storage.not_ready",
            StorageError::AlreadyInitialized => "services.storage.already_initialized",
            StorageError::Bus(_) => "services.storage.bus_failed",
        }
    }
}
