//! Storage SDK
//!
//! This crate provides the public contract of the `storage` module:
//!
//! - [`StoreScope`] - the two isolated storage namespaces
//! - [`StorageClient`] - backend client contract implemented per scope
//! - [`NamingRules`] - index and collection name validity rules
//! - [`topics`] - request bus topics answered by the storage engine
//! - [`StorageError`] - error types
//!
//! ## Usage
//!
//! Other modules validate names through the request bus without depending on the engine:
//!
//! ```ignore
//! use storage_sdk::topics;
//!
//! let valid: bool = ctx.request_bus().ask(topics::INDEX_IS_VALID, name.to_owned()).await?;
//! ```

pub mod api;
pub mod error;
pub mod naming;
pub mod scope;
pub mod topics;

pub use api::{ClientError, StorageClient};
pub use error::StorageError;
pub use naming::NamingRules;
pub use scope::StoreScope;
