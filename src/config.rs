//! Configuration management for the provider
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (schemaregistry.toml)
//! - Environment variables (SCHEMAREGISTRY__*)
//! - The plain `SCHEMA_REGISTRY_URL`, `SCHEMA_REGISTRY_USERNAME` and
//!   `SCHEMA_REGISTRY_PASSWORD` variables, when nothing else set the field
//!
//! ## Example config file (schemaregistry.toml):
//! ```toml
//! [registry]
//! url = "http://localhost:8081"
//! username = "svc-terraform"
//! password = "s3cret"
//! timeout_secs = 30
//! ```

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ProviderError, Result};

/// Fallback environment variables for the registry URL and credentials
pub const ENV_URL: &str = "SCHEMA_REGISTRY_URL";
pub const ENV_USERNAME: &str = "SCHEMA_REGISTRY_USERNAME";
pub const ENV_PASSWORD: &str = "SCHEMA_REGISTRY_PASSWORD";

/// Main configuration for the provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Registry connection settings
    #[serde(default)]
    pub registry: RegistryConfig,
}

/// Registry connection settings
#[derive(Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Base URL of the schema registry
    #[serde(default)]
    pub url: String,

    /// Basic auth username
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Basic auth password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            username: None,
            password: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl fmt::Debug for RegistryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ProviderConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, optionally layering a specific file on top
    pub fn load_from(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_locations = [
            "schemaregistry.toml",
            ".schemaregistry.toml",
            "config/schemaregistry.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "schemaregistry") {
            let xdg_config = config_dir.config_dir().join("schemaregistry.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("SCHEMAREGISTRY")
                .separator("__")
                .try_parsing(true),
        );

        let mut config: ProviderConfig = builder.build()?.try_deserialize()?;
        config.apply_env_fallbacks(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Build a configuration from a host's provider block.
    ///
    /// The block is expected to have passed `provider_schema().validate_config`;
    /// unset fields keep their defaults.
    pub fn from_provider_block(block: &serde_json::Value) -> Result<Self> {
        let string_field = |name: &str| -> Result<Option<String>> {
            match block.get(name) {
                None | Some(serde_json::Value::Null) => Ok(None),
                Some(serde_json::Value::String(s)) => Ok(Some(s.clone())),
                Some(_) => Err(ProviderError::InvalidAttribute {
                    name: name.to_string(),
                    reason: "must be a string".to_string(),
                }),
            }
        };

        let mut config = ProviderConfig::default();
        if let Some(url) = string_field("schema_registry_url")? {
            config.registry.url = url;
        }
        config.registry.username = string_field("username")?;
        config.registry.password = string_field("password")?;

        match block.get("timeout_secs") {
            None | Some(serde_json::Value::Null) => {}
            Some(value) => {
                config.registry.timeout_secs =
                    value.as_u64().ok_or_else(|| ProviderError::InvalidAttribute {
                        name: "timeout_secs".to_string(),
                        reason: "must be a non-negative whole number".to_string(),
                    })?;
            }
        }

        Ok(config)
    }

    /// Fill unset registry fields from the plain `SCHEMA_REGISTRY_*` variables
    pub fn apply_env_fallbacks(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let registry = &mut self.registry;
        if registry.url.is_empty() {
            if let Some(url) = lookup(ENV_URL) {
                registry.url = url;
            }
        }
        if registry.username.is_none() {
            registry.username = lookup(ENV_USERNAME);
        }
        if registry.password.is_none() {
            registry.password = lookup(ENV_PASSWORD);
        }
    }

    /// Check the configuration is usable for building a client
    pub fn validate(&self) -> Result<()> {
        let url = self.registry.url.trim();
        if url.is_empty() {
            return Err(ProviderError::InvalidConfig(format!(
                "registry url is not set (set [registry].url or {})",
                ENV_URL
            )));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ProviderError::InvalidConfig(format!(
                "registry url must start with http:// or https://, got {}",
                url
            )));
        }
        if self.registry.timeout_secs == 0 {
            return Err(ProviderError::InvalidConfig(
                "registry timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.registry.password.is_some() && self.registry.username.is_none() {
            return Err(ProviderError::InvalidConfig(
                "registry password is set without a username".to_string(),
            ));
        }
        Ok(())
    }

    /// Copy of this configuration with the password masked
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.registry.password.is_some() {
            config.registry.password = Some("***".to_string());
        }
        config
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ProviderError::InvalidConfig(e.to_string()))
    }
}
