use crate::domain::sample::DEFAULT_LIMIT;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

pub const ENDPOINT_ENV: &str = "SAMPLE_VIEW_ENDPOINT";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    /// URL the sample service is fetched from
    pub endpoint: String,

    /// Per-fetch timeout (in seconds)
    pub timeout_seconds: u64,

    /// Limit used when a query does not set one
    pub default_limit: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/samples".to_string(),
            timeout_seconds: 10,
            default_limit: DEFAULT_LIMIT,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from the user config directory, writing defaults
    /// on first run. The endpoint can be overridden from the environment.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            let default_config = Self::default();
            default_config.save_to(&config_path)?;
            default_config
        };

        Ok(config.with_env_overrides())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        info!(path = %path.display(), "Configuration saved");
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("sample-view").join("config.toml"))
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            if !endpoint.trim().is_empty() {
                self.endpoint = endpoint;
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = ServiceConfig {
            endpoint: "https://samples.example.com/api".to_string(),
            timeout_seconds: 3,
            default_limit: 7,
        };

        config.save_to(&path).unwrap();

        assert_eq!(ServiceConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timeout_seconds = 2\n").unwrap();

        let config = ServiceConfig::load_from(&path).unwrap();

        assert_eq!(config.timeout_seconds, 2);
        assert_eq!(config.endpoint, ServiceConfig::default().endpoint);
        assert_eq!(config.default_limit, DEFAULT_LIMIT);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timeout_seconds = \"soon\"").unwrap();

        let err = ServiceConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config"));
    }

    #[test]
    #[serial]
    fn test_env_overrides_endpoint() {
        unsafe { std::env::set_var(ENDPOINT_ENV, "http://override:1234/s") };
        let config = ServiceConfig::default().with_env_overrides();
        unsafe { std::env::remove_var(ENDPOINT_ENV) };

        assert_eq!(config.endpoint, "http://override:1234/s");
    }

    #[test]
    #[serial]
    fn test_blank_env_value_is_ignored() {
        unsafe { std::env::set_var(ENDPOINT_ENV, "  ") };
        let config = ServiceConfig::default().with_env_overrides();
        unsafe { std::env::remove_var(ENDPOINT_ENV) };

        assert_eq!(config.endpoint, ServiceConfig::default().endpoint);
    }
}
