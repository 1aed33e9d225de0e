//! Domain layer for the security module.

pub mod bootstrap;
pub mod defaults;
pub mod reset;

pub use bootstrap::{ADMIN_PROFILE, BootstrapDeps, FirstAdminBootstrap};
pub use defaults::{BUILTIN_IDS, DefaultRoles, RoleDefinition, canonical_profile};
pub use reset::{reset_profiles, reset_roles};
