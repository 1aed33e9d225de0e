//! In-memory document-store backend.
//!
//! Keeps index names in insertion order and applies [`NamingRules`] to both index
//! and collection names. Reachability can be toggled to exercise connection failures.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use storage_sdk::{ClientError, NamingRules, StorageClient};

#[derive(Debug)]
pub struct InMemoryStorageClient {
    naming: NamingRules,
    indexes: RwLock<Vec<String>>,
    reachable: AtomicBool,
    init_calls: AtomicUsize,
}

impl InMemoryStorageClient {
    #[must_use]
    pub fn new(naming: NamingRules) -> Self {
        Self {
            naming,
            indexes: RwLock::new(Vec::new()),
            reachable: AtomicBool::new(true),
            init_calls: AtomicUsize::new(0),
        }
    }

    /// Backend that already holds `indexes`. Seed names are taken as-is.
    #[must_use]
    pub fn with_indexes<I, S>(naming: NamingRules, indexes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let client = Self::new(naming);
        client
            .indexes
            .write()
            .extend(indexes.into_iter().map(Into::into));
        client
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    #[must_use]
    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    /// Add an index.
    ///
    /// # Errors
    /// Returns `ClientError::Backend` if the name is invalid or already taken.
    pub fn create_index(&self, name: &str) -> Result<(), ClientError> {
        if !self.naming.is_valid_name(name) {
            return Err(ClientError::Backend(format!("invalid index name '{name}'")));
        }
        let mut indexes = self.indexes.write();
        if indexes.iter().any(|existing| existing == name) {
            return Err(ClientError::Backend(format!("index '{name}' already exists")));
        }
        indexes.push(name.to_owned());
        Ok(())
    }

    fn ensure_reachable(&self) -> Result<(), ClientError> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ClientError::Unreachable("in-memory backend is offline".to_owned()))
        }
    }
}

#[async_trait]
impl StorageClient for InMemoryStorageClient {
    async fn init(&self) -> Result<(), ClientError> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        self.ensure_reachable()
    }

    async fn list_indexes(&self) -> Result<Vec<String>, ClientError> {
        self.ensure_reachable()?;
        Ok(self.indexes.read().clone())
    }

    fn is_index_name_valid(&self, name: &str) -> bool {
        self.naming.is_valid_name(name)
    }

    fn is_collection_name_valid(&self, name: &str) -> bool {
        self.naming.is_valid_name(name)
    }
}
