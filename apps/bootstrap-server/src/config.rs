//! Layered host configuration: defaults, then the YAML file, then `APP__*` environment variables.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use modkit::{ConfigProvider, LoggingConfig, module_config_or_default};
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "APP__";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    /// Raw module sections, `modules.<name>.config` is handed to the module.
    pub modules: BTreeMap<String, serde_json::Value>,
}

impl AppConfig {
    /// Load the effective configuration.
    ///
    /// Nested keys in the environment use `__`, e.g.
    /// `APP__LOGGING__LEVEL=debug` or `APP__MODULES__SECURITY__CONFIG__INTERNAL_INDEX=sec`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be parsed or a value has the wrong shape.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("failed to load configuration")
    }

    /// Parse the sections of the hosted modules without starting them.
    ///
    /// # Errors
    /// Returns an error naming the first module whose section is malformed.
    pub fn validate_modules(&self) -> Result<()> {
        module_config_or_default::<storage::config::StorageConfig>(self, storage::StorageModule::NAME)?;
        module_config_or_default::<security::config::SecurityConfig>(
            self,
            security::SecurityModule::NAME,
        )?;
        Ok(())
    }

    /// Effective configuration as text. JSON output is also valid YAML.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl ConfigProvider for AppConfig {
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
        self.modules.get(module_name)
    }
}
