//! First administrator bootstrap.

use std::sync::Arc;

use security_sdk::{
    AdminExistence, CreateUserRequest, FirstAdminRequest, IndexRefresher, ProfileRepository,
    RoleRepository, SecurityError, User, UserCreator,
};
use tracing::{info, warn};

use super::defaults::DefaultRoles;
use super::reset::{reset_profiles, reset_roles};

/// Profile given to the first administrator.
pub const ADMIN_PROFILE: &str = "admin";

/// Collaborators the bootstrap drives.
#[derive(Clone)]
pub struct BootstrapDeps {
    pub admins: Arc<dyn AdminExistence>,
    pub users: Arc<dyn UserCreator>,
    pub roles: Arc<dyn RoleRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub indexes: Arc<dyn IndexRefresher>,
}

impl BootstrapDeps {
    /// Use one store for every collaborator.
    #[must_use]
    pub fn from_store<S>(store: &Arc<S>) -> Self
    where
        S: AdminExistence
            + UserCreator
            + RoleRepository
            + ProfileRepository
            + IndexRefresher
            + 'static,
    {
        Self {
            admins: Arc::clone(store) as Arc<dyn AdminExistence>,
            users: Arc::clone(store) as Arc<dyn UserCreator>,
            roles: Arc::clone(store) as Arc<dyn RoleRepository>,
            profiles: Arc::clone(store) as Arc<dyn ProfileRepository>,
            indexes: Arc::clone(store) as Arc<dyn IndexRefresher>,
        }
    }
}

/// Creates the first administrator account, at most once per deployment.
///
/// The existence check and the creation are not serialized here: two concurrent
/// calls may both pass the check, and the user creator's duplicate-id rejection
/// decides which one wins.
pub struct FirstAdminBootstrap {
    deps: BootstrapDeps,
    default_roles: DefaultRoles,
}

impl FirstAdminBootstrap {
    #[must_use]
    pub fn new(deps: BootstrapDeps, default_roles: DefaultRoles) -> Self {
        Self {
            deps,
            default_roles,
        }
    }

    /// Create the admin user and, when `request.reset` is set, restore the built-in
    /// roles and profiles and refresh the internal index.
    ///
    /// The created user is not removed if the reset fails.
    ///
    /// # Errors
    /// - `SecurityError::AdminExists` if an administrator is already set; nothing is written
    /// - any error from user creation, the reset routines or the refresh, unchanged
    #[tracing::instrument(skip_all, fields(admin_id = %request.id, reset = request.reset))]
    pub async fn create_first_admin(&self, request: FirstAdminRequest) -> Result<User, SecurityError> {
        if self.deps.admins.admin_exists().await?.exists {
            warn!("first admin creation refused: an admin already exists");
            return Err(SecurityError::AdminExists);
        }

        let FirstAdminRequest { id, content, reset } = request;
        let user = self
            .deps
            .users
            .create_user(CreateUserRequest {
                id,
                profile_ids: vec![ADMIN_PROFILE.to_owned()],
                content,
            })
            .await?;
        info!(user_id = %user.id, "first admin created");

        if reset {
            reset_roles(&self.default_roles, self.deps.roles.as_ref()).await?;
            reset_profiles(self.deps.profiles.as_ref()).await?;
            self.deps.indexes.refresh_internal().await?;
            info!("built-in security model restored");
        }

        Ok(user)
    }
}
