//! Typed access to per-module configuration sections.
//!
//! Module configuration lives at `modules.<name>.config` in the host configuration.
//! Two loaders are provided:
//!
//! 1. [`module_config_or_default`]: a missing module, a non-object module entry, or a
//!    missing `config` section all yield `T::default()`.
//! 2. [`module_config_required`]: each of those cases is an error.
//!
//! In both cases a present but malformed `config` section is an error.

use serde::de::DeserializeOwned;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("module '{module}' not found")]
    ModuleNotFound { module: String },
    #[error("module '{module}' config must be an object")]
    InvalidModuleStructure { module: String },
    #[error("missing 'config' section in module '{module}'")]
    MissingConfigSection { module: String },
    #[error("invalid config for module '{module}': {source}")]
    InvalidConfig {
        module: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Source of raw module sections, keyed by module name.
pub trait ConfigProvider: Send + Sync {
    /// Returns the raw `modules.<name>` entry, if any.
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value>;
}

/// Where the `config` section of a module stands.
enum Section<'a> {
    Found(&'a serde_json::Value),
    NoModule,
    NotAnObject,
    NoConfig,
}

fn locate<'a>(provider: &'a dyn ConfigProvider, module_name: &str) -> Section<'a> {
    let Some(raw) = provider.get_module_config(module_name) else {
        return Section::NoModule;
    };
    let Some(obj) = raw.as_object() else {
        return Section::NotAnObject;
    };
    obj.get("config").map_or(Section::NoConfig, Section::Found)
}

fn parse<T: DeserializeOwned>(value: &serde_json::Value, module_name: &str) -> Result<T, ConfigError> {
    T::deserialize(value).map_err(|source| ConfigError::InvalidConfig {
        module: module_name.to_owned(),
        source,
    })
}

/// Load a module's config, falling back to `T::default()` when it is absent.
///
/// # Errors
/// Returns `ConfigError::InvalidConfig` if the section exists but cannot be deserialized.
pub fn module_config_or_default<T: DeserializeOwned + Default>(
    provider: &dyn ConfigProvider,
    module_name: &str,
) -> Result<T, ConfigError> {
    match locate(provider, module_name) {
        Section::Found(value) => parse(value, module_name),
        Section::NoModule | Section::NotAnObject | Section::NoConfig => Ok(T::default()),
    }
}

/// Load a module's config, failing when it is absent.
///
/// # Errors
/// Returns `ConfigError` if the module is missing, is not an object, has no `config`
/// section, or the section cannot be deserialized.
pub fn module_config_required<T: DeserializeOwned>(
    provider: &dyn ConfigProvider,
    module_name: &str,
) -> Result<T, ConfigError> {
    let module = module_name.to_owned();
    match locate(provider, module_name) {
        Section::Found(value) => parse(value, module_name),
        Section::NoModule => Err(ConfigError::ModuleNotFound { module }),
        Section::NotAnObject => Err(ConfigError::InvalidModuleStructure { module }),
        Section::NoConfig => Err(ConfigError::MissingConfigSection { module }),
    }
}
