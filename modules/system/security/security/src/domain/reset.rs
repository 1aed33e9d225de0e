//! Restore the built-in roles and profiles to their canonical documents.
//!
//! Writes go one id at a time in [`BUILTIN_IDS`] order. A failure stops the
//! sequence; ids written before it keep their new documents.

use security_sdk::{ProfileRepository, RoleDto, RoleRepository, SecurityError};
use tracing::{debug, info};

use super::defaults::{BUILTIN_IDS, DefaultRoles, canonical_profile};

/// Overwrite the `admin`, `default` and `anonymous` roles with `defaults`.
///
/// # Errors
/// Returns the first error reported by the repository.
pub async fn reset_roles(
    defaults: &DefaultRoles,
    repository: &dyn RoleRepository,
) -> Result<(), SecurityError> {
    for (id, definition) in defaults.iter() {
        let role = repository
            .from_dto(RoleDto {
                id: id.to_owned(),
                controllers: Some(definition.controllers.clone()),
            })
            .await?;
        repository.validate_and_save_role(role).await?;
        debug!(role = id, "role reset");
    }
    info!(roles = BUILTIN_IDS.len(), "built-in roles reset");
    Ok(())
}

/// Overwrite the `admin`, `default` and `anonymous` profiles.
///
/// # Errors
/// Returns the first error reported by the repository.
pub async fn reset_profiles(repository: &dyn ProfileRepository) -> Result<(), SecurityError> {
    for id in BUILTIN_IDS {
        let profile = repository.from_dto(canonical_profile(id)).await?;
        repository.validate_and_save_profile(profile).await?;
        debug!(profile = id, "profile reset");
    }
    info!(profiles = BUILTIN_IDS.len(), "built-in profiles reset");
    Ok(())
}
