//! Backend client contract for a single storage scope.

use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by a backend client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// The backend could not be reached.
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    /// The backend answered with an error.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Client for the document store behind one scope.
///
/// The storage engine owns one implementation per [`crate::StoreScope`] and
/// never shares a client between scopes.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Connect to the backend and prepare the client for use.
    ///
    /// # Errors
    /// Returns `ClientError::Unreachable` if the backend cannot be contacted.
    async fn init(&self) -> Result<(), ClientError>;

    /// Index names currently present in the backend, in backend order.
    ///
    /// # Errors
    /// Returns `ClientError` if the backend cannot list its indexes.
    async fn list_indexes(&self) -> Result<Vec<String>, ClientError>;

    fn is_index_name_valid(&self, name: &str) -> bool;

    fn is_collection_name_valid(&self, name: &str) -> bool;
}
