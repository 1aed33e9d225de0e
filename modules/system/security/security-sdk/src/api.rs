//! Collaborator contracts used by the first-admin bootstrap and the reset routines.
//!
//! Each contract is a separate trait so callers depend only on what they use. The
//! security module ships one store implementing all of them.

use async_trait::async_trait;

use crate::error::SecurityError;
use crate::models::{
    Ack, AdminExists, CreateUserRequest, Profile, ProfileDto, Role, RoleDto, User,
};

#[async_trait]
pub trait AdminExistence: Send + Sync {
    /// Whether some user holds the `admin` profile.
    ///
    /// # Errors
    /// Returns `SecurityError` if the store cannot be queried.
    async fn admin_exists(&self) -> Result<AdminExists, SecurityError>;
}

#[async_trait]
pub trait UserCreator: Send + Sync {
    /// Create a user.
    ///
    /// Implementations must reject an id that is already taken; concurrent
    /// first-admin bootstraps rely on it.
    ///
    /// # Errors
    /// - `SecurityError::AlreadyExists` if the id is taken
    /// - `SecurityError::Validation` if the request is malformed
    /// - `SecurityError::NotFound` if a referenced profile does not exist
    async fn create_user(&self, request: CreateUserRequest) -> Result<User, SecurityError>;
}

#[async_trait]
pub trait IndexRefresher: Send + Sync {
    /// Make recent writes to the internal index visible to readers.
    ///
    /// # Errors
    /// Returns `SecurityError` if the refresh fails.
    async fn refresh_internal(&self) -> Result<Ack, SecurityError>;
}

#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Build a role from its stored form, filling defaults.
    ///
    /// # Errors
    /// Returns `SecurityError` if the document cannot be turned into a role.
    async fn from_dto(&self, dto: RoleDto) -> Result<Role, SecurityError>;

    /// Validate the policy document and write the role, replacing any previous one.
    ///
    /// # Errors
    /// Returns `SecurityError::Validation` for a malformed policy document.
    async fn validate_and_save_role(&self, role: Role) -> Result<(), SecurityError>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Build a profile from its stored form, filling defaults.
    ///
    /// # Errors
    /// Returns `SecurityError` if the document cannot be turned into a profile.
    async fn from_dto(&self, dto: ProfileDto) -> Result<Profile, SecurityError>;

    /// Validate the policies and write the profile, replacing any previous one.
    ///
    /// # Errors
    /// Returns `SecurityError::Validation` for malformed policies.
    async fn validate_and_save_profile(&self, profile: Profile) -> Result<(), SecurityError>;
}
