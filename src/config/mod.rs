//! Configuration management for actor-modules
//!
//! Handles configuration loading, validation, and environment overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::module::registry::PathTemplate;
use crate::module::traits::ModuleError;
use crate::utils::env::{env_int, env_opt};

/// Environment variable overriding `search_path`
pub const ENV_SEARCH_PATH: &str = "ACTOR_MODULES_PATH";

/// Environment variable overriding `max_modules`
pub const ENV_MAX_MODULES: &str = "ACTOR_MODULES_MAX";

/// Registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Search path template, `;`-separated, one `?` per segment
    #[serde(default = "default_search_path")]
    pub search_path: String,

    /// Maximum number of distinct modules (unbounded if unset)
    #[serde(default)]
    pub max_modules: Option<usize>,

    /// Modules to load at startup
    #[serde(default)]
    pub preload: Vec<String>,

    /// Logging configuration
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

fn default_search_path() -> String {
    "./cservice/?.so".to_string()
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            search_path: default_search_path(),
            max_modules: None,
            preload: Vec::new(),
            logging: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log filter (e.g. "info", "actor_modules=debug"); RUST_LOG takes precedence
    #[serde(default)]
    pub filter: Option<String>,

    /// Emit JSON lines (requires the `json-logging` feature)
    #[serde(default)]
    pub json_format: bool,
}

impl RegistryConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ModuleError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ModuleError::Config(format!("Failed to read {}: {}", path.as_ref().display(), e))
        })?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self, ModuleError> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply `ACTOR_MODULES_PATH` / `ACTOR_MODULES_MAX` overrides
    pub fn apply_env_overrides(&mut self) {
        if let Some(search_path) = env_opt(ENV_SEARCH_PATH) {
            debug!("{} overrides search path: {}", ENV_SEARCH_PATH, search_path);
            self.search_path = search_path;
        }
        if let Some(max_modules) = env_int::<usize>(ENV_MAX_MODULES) {
            debug!("{} overrides max modules: {}", ENV_MAX_MODULES, max_modules);
            self.max_modules = Some(max_modules);
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ModuleError> {
        PathTemplate::parse(&self.search_path)?;

        if self.max_modules == Some(0) {
            return Err(ModuleError::Config(
                "max_modules must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RegistryConfig::default();
        assert_eq!(config.search_path, "./cservice/?.so");
        assert!(config.max_modules.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = RegistryConfig::from_toml("").unwrap();
        assert_eq!(config.search_path, "./cservice/?.so");
        assert!(config.preload.is_empty());
        assert!(config.logging.is_none());
    }

    #[test]
    fn test_full_toml() {
        let config = RegistryConfig::from_toml(
            r#"
            search_path = "./svc/?.so;/usr/lib/svc/?.so"
            max_modules = 32
            preload = ["logger", "gate"]

            [logging]
            filter = "actor_modules=debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.max_modules, Some(32));
        assert_eq!(config.preload, vec!["logger", "gate"]);
        let logging = config.logging.unwrap();
        assert_eq!(logging.filter.as_deref(), Some("actor_modules=debug"));
        assert!(!logging.json_format);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            RegistryConfig::from_toml("max_modules = \"many\""),
            Err(ModuleError::Config(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_template() {
        let config = RegistryConfig {
            search_path: "./svc/".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ModuleError::InvalidSearchPath { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let config = RegistryConfig {
            max_modules: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
