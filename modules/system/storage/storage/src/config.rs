//! Configuration for the storage module.

use serde::Deserialize;
use storage_sdk::NamingRules;

/// Module configuration (`modules.storage.config`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub public: ScopeConfig,
    pub private: ScopeConfig,
}

/// Settings of the in-memory backend serving one scope.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScopeConfig {
    /// Indexes the backend already holds when the process starts.
    pub indexes: Vec<String>,
    pub naming: NamingRules,
}
