//! Canonical definitions of the built-in roles and profiles.

use serde::{Deserialize, Serialize};
use security_sdk::{ControllerPolicies, ControllerRights, PolicyDto, ProfileDto};

/// Ids shared by the built-in roles and profiles, in reset order.
pub const BUILTIN_IDS: [&str; 3] = ["admin", "default", "anonymous"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoleDefinition {
    #[serde(default)]
    pub controllers: ControllerPolicies,
}

impl RoleDefinition {
    fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a [&'a str])>) -> Self {
        Self {
            controllers: pairs
                .into_iter()
                .map(|(controller, actions)| {
                    (controller.to_owned(), ControllerRights::allow(actions.iter().copied()))
                })
                .collect(),
        }
    }
}

/// Policy documents of the three built-in roles.
///
/// Read from `modules.security.config.default_roles`; any role left out keeps its
/// canonical document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultRoles {
    pub admin: RoleDefinition,
    pub default: RoleDefinition,
    pub anonymous: RoleDefinition,
}

impl Default for DefaultRoles {
    fn default() -> Self {
        Self {
            admin: RoleDefinition::from_pairs([("*", &["*"][..])]),
            default: RoleDefinition::from_pairs([
                (
                    "auth",
                    &["checkToken", "getCurrentUser", "getMyRights", "logout", "updateSelf"][..],
                ),
                ("server", &["info"][..]),
            ]),
            anonymous: RoleDefinition::from_pairs([
                (
                    "auth",
                    &["checkToken", "getCurrentUser", "getMyRights", "login"][..],
                ),
                ("server", &["info"][..]),
            ]),
        }
    }
}

impl DefaultRoles {
    /// `(id, definition)` pairs in [`BUILTIN_IDS`] order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &RoleDefinition)> {
        [
            (BUILTIN_IDS[0], &self.admin),
            (BUILTIN_IDS[1], &self.default),
            (BUILTIN_IDS[2], &self.anonymous),
        ]
        .into_iter()
    }
}

/// Built-in profile `id`: a single unrestricted policy on the role of the same id.
#[must_use]
pub fn canonical_profile(id: &str) -> ProfileDto {
    ProfileDto {
        id: id.to_owned(),
        policies: Some(vec![PolicyDto::role(id)]),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn canonical_roles_match_stored_documents() {
        let roles = DefaultRoles::default();

        assert_eq!(
            serde_json::to_value(&roles.admin).unwrap(),
            json!({ "controllers": { "*": { "actions": { "*": true } } } })
        );
        assert_eq!(
            serde_json::to_value(&roles.default).unwrap(),
            json!({ "controllers": {
                "auth": { "actions": {
                    "checkToken": true, "getCurrentUser": true, "getMyRights": true,
                    "logout": true, "updateSelf": true
                } },
                "server": { "actions": { "info": true } }
            } })
        );
        assert_eq!(
            serde_json::to_value(&roles.anonymous).unwrap(),
            json!({ "controllers": {
                "auth": { "actions": {
                    "checkToken": true, "getCurrentUser": true, "getMyRights": true, "login": true
                } },
                "server": { "actions": { "info": true } }
            } })
        );
    }

    #[test]
    fn iteration_follows_builtin_order() {
        let roles = DefaultRoles::default();
        let ids: Vec<_> = roles.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, BUILTIN_IDS);
        let (_, admin) = roles.iter().next().unwrap();
        assert!(admin.controllers["*"].actions["*"]);
    }

    #[test]
    fn each_profile_links_to_its_own_role() {
        for id in BUILTIN_IDS {
            let profile = canonical_profile(id);
            let policies = profile.policies.unwrap();
            assert_eq!(policies.len(), 1);
            assert_eq!(policies[0].role_id, id);
            assert!(policies[0].restricted_to.is_none());
        }
    }

    #[test]
    fn partial_override_keeps_other_canonical_roles() {
        let roles: DefaultRoles = serde_json::from_value(json!({
            "admin": { "controllers": { "foo": { "actions": { "bar": true } } } }
        }))
        .unwrap();

        assert!(roles.admin.controllers["foo"].actions["bar"]);
        assert_eq!(roles.default, DefaultRoles::default().default);
    }
}
