//! Configuration for the security module.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use security_sdk::FirstAdminRequest;

use crate::domain::DefaultRoles;

/// Module configuration (`modules.security.config`).
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SecurityConfig {
    /// Name of the index holding the security documents.
    pub internal_index: String,
    /// Canonical documents restored by the role reset.
    pub default_roles: DefaultRoles,
    /// Administrator to create at startup, if none exists yet.
    pub first_admin: Option<FirstAdminConfig>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            internal_index: "internal".to_owned(),
            default_roles: DefaultRoles::default(),
            first_admin: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FirstAdminConfig {
    pub id: String,
    #[serde(deserialize_with = "deserialize_secret")]
    pub password: SecretString,
    /// Extra user fields stored with the account.
    #[serde(default)]
    pub content: Map<String, Value>,
    #[serde(default)]
    pub reset: bool,
}

impl FirstAdminConfig {
    /// Bootstrap request carrying the configured password in its content.
    #[must_use]
    pub fn to_request(&self) -> FirstAdminRequest {
        let mut content = self.content.clone();
        content.insert(
            "password".to_owned(),
            Value::String(self.password.expose_secret().to_owned()),
        );
        FirstAdminRequest {
            id: self.id.clone(),
            content,
            reset: self.reset,
        }
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}
