//! Security Module
//!
//! Keeps the built-in authorization model (roles and profiles `admin`, `default`,
//! `anonymous`) in its canonical shape and creates the first administrator.
//!
//! Other modules reach it through the request bus topics in [`security_sdk::topics`].
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod infra;
pub mod module;

pub use domain::{
    BUILTIN_IDS, BootstrapDeps, DefaultRoles, FirstAdminBootstrap, RoleDefinition,
    canonical_profile, reset_profiles, reset_roles,
};
pub use infra::InMemorySecurityStore;
pub use module::SecurityModule;
