//! Security documents and the requests exchanged with the security module.
//!
//! DTO types mirror the stored JSON layout (`_id`, `roleId`, `restrictedTo`,
//! `profileIds`) and may omit optional parts; repositories turn them into the
//! fully populated domain types through `from_dto`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Actions allowed (or explicitly denied) on one controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerRights {
    #[serde(default)]
    pub actions: BTreeMap<String, bool>,
}

impl ControllerRights {
    /// Rights granting every listed action.
    #[must_use]
    pub fn allow<I, S>(actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            actions: actions.into_iter().map(|a| (a.into(), true)).collect(),
        }
    }
}

/// Controller name → rights. `*` matches every controller or action.
pub type ControllerPolicies = BTreeMap<String, ControllerRights>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDto {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controllers: Option<ControllerPolicies>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    #[serde(rename = "_id")]
    pub id: String,
    pub controllers: ControllerPolicies,
}

/// Limits a policy to some indexes, and optionally to some of their collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestrictedTo {
    pub index: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collections: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDto {
    #[serde(rename = "roleId")]
    pub role_id: String,
    #[serde(
        rename = "restrictedTo",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub restricted_to: Option<Vec<RestrictedTo>>,
}

impl PolicyDto {
    /// Unrestricted policy on `role_id`.
    #[must_use]
    pub fn role(role_id: impl Into<String>) -> Self {
        Self {
            role_id: role_id.into(),
            restricted_to: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    #[serde(rename = "roleId")]
    pub role_id: String,
    #[serde(rename = "restrictedTo", default, skip_serializing_if = "Vec::is_empty")]
    pub restricted_to: Vec<RestrictedTo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDto {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policies: Option<Vec<PolicyDto>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: String,
    pub policies: Vec<Policy>,
}

/// A stored user. Credentials never leave the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "profileIds")]
    pub profile_ids: Vec<String>,
    #[serde(default)]
    pub content: Map<String, Value>,
}

impl User {
    #[must_use]
    pub fn has_profile(&self, profile_id: &str) -> bool {
        self.profile_ids.iter().any(|p| p == profile_id)
    }
}

/// Input of `UserCreator::create_user`. `content` must carry a string `password`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "profileIds")]
    pub profile_ids: Vec<String>,
    #[serde(default)]
    pub content: Map<String, Value>,
}

impl std::fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("id", &self.id)
            .field("profile_ids", &self.profile_ids)
            .field("content_keys", &self.content.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Input of the first-admin bootstrap.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirstAdminRequest {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub content: Map<String, Value>,
    /// Restore the built-in roles and profiles after creating the admin.
    #[serde(default)]
    pub reset: bool,
}

impl std::fmt::Debug for FirstAdminRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // content holds the password
        f.debug_struct("FirstAdminRequest")
            .field("id", &self.id)
            .field("content_keys", &self.content.keys().collect::<Vec<_>>())
            .field("reset", &self.reset)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminExists {
    pub exists: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub acknowledged: bool,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn role_dto_uses_stored_field_names() {
        let dto: RoleDto = serde_json::from_value(json!({
            "_id": "admin",
            "controllers": { "*": { "actions": { "*": true } } }
        }))
        .unwrap();

        assert_eq!(dto.id, "admin");
        let controllers = dto.controllers.unwrap();
        assert!(controllers["*"].actions["*"]);
    }

    #[test]
    fn profile_dto_reads_role_links_and_restrictions() {
        let dto: ProfileDto = serde_json::from_value(json!({
            "_id": "editor",
            "policies": [
                { "roleId": "default" },
                { "roleId": "writer", "restrictedTo": [{ "index": "books", "collections": ["fr"] }] }
            ]
        }))
        .unwrap();

        let policies = dto.policies.unwrap();
        assert_eq!(policies[0], PolicyDto::role("default"));
        let restricted = policies[1].restricted_to.clone().unwrap();
        assert_eq!(restricted.len(), 1);
        assert_eq!(restricted[0].index, "books");
        assert_eq!(restricted[0].collections, vec!["fr"]);
    }

    #[test]
    fn unrestricted_policy_serializes_without_restrictions() {
        let policy = Policy {
            role_id: "admin".to_owned(),
            restricted_to: Vec::new(),
        };
        assert_eq!(serde_json::to_value(&policy).unwrap(), json!({ "roleId": "admin" }));
    }

    #[test]
    fn first_admin_request_defaults_reset_to_false() {
        let req: FirstAdminRequest = serde_json::from_value(json!({
            "_id": "toto",
            "content": { "password": "pwd" }
        }))
        .unwrap();

        assert!(!req.reset);
        assert!(!format!("{req:?}").contains("pwd"));
    }

    #[test]
    fn create_user_request_debug_lists_content_keys_only() {
        let req: CreateUserRequest = serde_json::from_value(json!({
            "_id": "toto",
            "profileIds": ["admin"],
            "content": { "password": "s3cret", "name": "Toto" }
        }))
        .unwrap();

        let shown = format!("{req:?}");

        assert!(shown.contains("toto"));
        assert!(shown.contains("admin"));
        assert!(shown.contains("password"), "field names stay visible: {shown}");
        assert!(!shown.contains("s3cret"));
        assert!(!shown.contains("Toto"));
    }
}
