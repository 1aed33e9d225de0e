//! Storage Module
//!
//! Owns one backend client per [`storage_sdk::StoreScope`], checks at startup that
//! the public and private index namespaces do not overlap, and then answers the
//! `store:index:isValid` and `store:collection:isValid` request bus topics.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod infra;
pub mod module;

pub use domain::{AdapterState, ClientAdapter, StorageEngine};
pub use infra::InMemoryStorageClient;
pub use module::StorageModule;
