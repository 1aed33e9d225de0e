//! In-memory security store.
//!
//! Implements every security collaborator contract over process-local maps. Profile
//! restrictions are checked against the storage naming rules through the request bus.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use modkit::RequestBus;
use parking_lot::RwLock;
use security_sdk::{
    Ack, AdminExistence, AdminExists, CreateUserRequest, EntityKind, IndexRefresher, Policy,
    Profile, ProfileDto, ProfileRepository, RestrictedTo, Role, RoleDto, RoleRepository,
    SecurityError, User, UserCreator,
};
use sha2::{Digest, Sha256};
use storage_sdk::topics;

use crate::domain::ADMIN_PROFILE;

const PASSWORD_FIELD: &str = "password";

struct StoredUser {
    user: User,
    salt: String,
    password_digest: String,
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

pub struct InMemorySecurityStore {
    bus: Arc<RequestBus>,
    roles: RwLock<BTreeMap<String, Role>>,
    profiles: RwLock<BTreeMap<String, Profile>>,
    users: RwLock<BTreeMap<String, StoredUser>>,
    refresh_generation: AtomicU64,
}

impl InMemorySecurityStore {
    #[must_use]
    pub fn new(bus: Arc<RequestBus>) -> Self {
        Self {
            bus,
            roles: RwLock::new(BTreeMap::new()),
            profiles: RwLock::new(BTreeMap::new()),
            users: RwLock::new(BTreeMap::new()),
            refresh_generation: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn role(&self, id: &str) -> Option<Role> {
        self.roles.read().get(id).cloned()
    }

    #[must_use]
    pub fn profile(&self, id: &str) -> Option<Profile> {
        self.profiles.read().get(id).cloned()
    }

    #[must_use]
    pub fn user(&self, id: &str) -> Option<User> {
        self.users.read().get(id).map(|stored| stored.user.clone())
    }

    /// Number of `refresh_internal` calls so far.
    #[must_use]
    pub fn refresh_generation(&self) -> u64 {
        self.refresh_generation.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn verify_password(&self, user_id: &str, password: &str) -> bool {
        self.users
            .read()
            .get(user_id)
            .is_some_and(|stored| digest(&stored.salt, password) == stored.password_digest)
    }

    async fn ask_name_valid(&self, topic: &str, name: &str) -> Result<bool, SecurityError> {
        self.bus
            .ask(topic, name.to_owned())
            .await
            .map_err(|e| SecurityError::Internal(e.to_string()))
    }

    async fn check_restrictions(
        &self,
        profile_id: &str,
        restrictions: &[RestrictedTo],
    ) -> Result<(), SecurityError> {
        for restriction in restrictions {
            if !self
                .ask_name_valid(topics::INDEX_IS_VALID, &restriction.index)
                .await?
            {
                return Err(SecurityError::validation(
                    EntityKind::Profile,
                    profile_id,
                    format!("invalid index name '{}' in restrictedTo", restriction.index),
                ));
            }
            for collection in &restriction.collections {
                if !self
                    .ask_name_valid(topics::COLLECTION_IS_VALID, collection)
                    .await?
                {
                    return Err(SecurityError::validation(
                        EntityKind::Profile,
                        profile_id,
                        format!(
                            "invalid collection name '{collection}' in restrictedTo of index '{}'",
                            restriction.index
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}

fn validate_role(role: &Role) -> Result<(), SecurityError> {
    if role.id.is_empty() {
        return Err(SecurityError::validation(EntityKind::Role, "", "missing _id"));
    }
    for (controller, rights) in &role.controllers {
        if controller.is_empty() {
            return Err(SecurityError::validation(
                EntityKind::Role,
                role.id.as_str(),
                "controller name must not be empty",
            ));
        }
        if rights.actions.is_empty() {
            return Err(SecurityError::validation(
                EntityKind::Role,
                role.id.as_str(),
                format!("controller '{controller}' has no actions"),
            ));
        }
    }
    Ok(())
}

#[async_trait]
impl RoleRepository for InMemorySecurityStore {
    async fn from_dto(&self, dto: RoleDto) -> Result<Role, SecurityError> {
        Ok(Role {
            id: dto.id,
            controllers: dto.controllers.unwrap_or_default(),
        })
    }

    async fn validate_and_save_role(&self, role: Role) -> Result<(), SecurityError> {
        validate_role(&role)?;
        tracing::debug!(role = %role.id, "role saved");
        self.roles.write().insert(role.id.clone(), role);
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for InMemorySecurityStore {
    async fn from_dto(&self, dto: ProfileDto) -> Result<Profile, SecurityError> {
        Ok(Profile {
            id: dto.id,
            policies: dto
                .policies
                .unwrap_or_default()
                .into_iter()
                .map(|policy| Policy {
                    role_id: policy.role_id,
                    restricted_to: policy.restricted_to.unwrap_or_default(),
                })
                .collect(),
        })
    }

    async fn validate_and_save_profile(&self, profile: Profile) -> Result<(), SecurityError> {
        if profile.id.is_empty() {
            return Err(SecurityError::validation(EntityKind::Profile, "", "missing _id"));
        }
        if profile.policies.is_empty() {
            return Err(SecurityError::validation(
                EntityKind::Profile,
                profile.id.as_str(),
                "at least one policy is required",
            ));
        }
        for policy in &profile.policies {
            self.check_restrictions(&profile.id, &policy.restricted_to)
                .await?;
        }

        {
            let roles = self.roles.read();
            if let Some(missing) = profile
                .policies
                .iter()
                .find(|policy| !roles.contains_key(&policy.role_id))
            {
                return Err(SecurityError::validation(
                    EntityKind::Profile,
                    profile.id.as_str(),
                    format!("unknown role '{}'", missing.role_id),
                ));
            }
        }

        tracing::debug!(profile = %profile.id, "profile saved");
        self.profiles.write().insert(profile.id.clone(), profile);
        Ok(())
    }
}

#[async_trait]
impl UserCreator for InMemorySecurityStore {
    async fn create_user(&self, request: CreateUserRequest) -> Result<User, SecurityError> {
        let CreateUserRequest {
            id,
            profile_ids,
            mut content,
        } = request;

        if id.is_empty() {
            return Err(SecurityError::validation(EntityKind::User, "", "missing _id"));
        }
        let password = match content.remove(PASSWORD_FIELD) {
            Some(serde_json::Value::String(password)) if !password.is_empty() => password,
            _ => {
                return Err(SecurityError::validation(
                    EntityKind::User,
                    id,
                    "a non-empty string password is required",
                ));
            }
        };
        if profile_ids.is_empty() {
            return Err(SecurityError::validation(
                EntityKind::User,
                id,
                "at least one profile is required",
            ));
        }
        {
            let profiles = self.profiles.read();
            if let Some(missing) = profile_ids.iter().find(|p| !profiles.contains_key(*p)) {
                return Err(SecurityError::NotFound {
                    kind: EntityKind::Profile,
                    id: missing.clone(),
                });
            }
        }

        let salt = hex::encode(rand::random::<[u8; 16]>());
        let password_digest = digest(&salt, &password);
        let user = User {
            id,
            profile_ids,
            content,
        };

        let mut users = self.users.write();
        if users.contains_key(&user.id) {
            return Err(SecurityError::AlreadyExists {
                kind: EntityKind::User,
                id: user.id,
            });
        }
        users.insert(
            user.id.clone(),
            StoredUser {
                user: user.clone(),
                salt,
                password_digest,
            },
        );
        drop(users);

        tracing::info!(user_id = %user.id, profiles = ?user.profile_ids, "user created");
        Ok(user)
    }
}

#[async_trait]
impl AdminExistence for InMemorySecurityStore {
    async fn admin_exists(&self) -> Result<AdminExists, SecurityError> {
        let exists = self
            .users
            .read()
            .values()
            .any(|stored| stored.user.has_profile(ADMIN_PROFILE));
        Ok(AdminExists { exists })
    }
}

#[async_trait]
impl IndexRefresher for InMemorySecurityStore {
    async fn refresh_internal(&self) -> Result<Ack, SecurityError> {
        let generation = self.refresh_generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(generation, "internal index refreshed");
        Ok(Ack { acknowledged: true })
    }
}
