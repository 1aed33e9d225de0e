//! Domain layer for the storage module.

pub mod adapter;
pub mod engine;

pub use adapter::{AdapterState, ClientAdapter};
pub use engine::StorageEngine;
