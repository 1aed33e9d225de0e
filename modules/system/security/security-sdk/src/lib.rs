//! Security SDK
//!
//! This crate provides the public contract of the `security` module:
//!
//! - Models: [`Role`], [`Profile`], [`User`] and the DTOs they are built from
//! - Collaborator traits: [`AdminExistence`], [`UserCreator`], [`IndexRefresher`],
//!   [`RoleRepository`], [`ProfileRepository`]
//! - [`topics`] answered on the request bus
//! - [`SecurityError`] - error types

pub mod api;
pub mod error;
pub mod models;
pub mod topics;

pub use api::{AdminExistence, IndexRefresher, ProfileRepository, RoleRepository, UserCreator};
pub use error::{EntityKind, SecurityError};
pub use models::{
    Ack, AdminExists, ControllerPolicies, ControllerRights, CreateUserRequest, FirstAdminRequest,
    Policy, PolicyDto, Profile, ProfileDto, RestrictedTo, Role, RoleDto, User,
};
