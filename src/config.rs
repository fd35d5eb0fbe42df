//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides. Only
//! the native CLI reads config files; the browser client carries its
//! settings in local storage instead.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::backend::RestConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub provisioner: ProvisionerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Hosted backend connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_url")]
    pub url: String,

    /// Public anon key; per-user permissions come from the signed-in
    /// session, not from this key
    #[serde(default)]
    pub anon_key: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_backend_url() -> String {
    "http://localhost:54321".to_string()
}

fn default_request_timeout() -> u64 {
    10_000
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            anon_key: String::new(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl BackendConfig {
    /// Build the REST client configuration from this section
    pub fn to_rest_config(&self) -> RestConfig {
        RestConfig {
            base_url: self.url.clone(),
            anon_key: self.anon_key.clone(),
            request_timeout_ms: self.request_timeout_ms,
        }
    }
}

/// Admin provisioning server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProvisionerConfig {
    #[serde(default = "default_provisioner_url")]
    pub url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_provisioner_url() -> String {
    "http://localhost:8787".to_string()
}

impl Default for ProvisionerConfig {
    fn default() -> Self {
        Self {
            url: default_provisioner_url(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("lectern").join("config.toml")),
            Some(PathBuf::from("/etc/lectern/config.toml")),
            Some(PathBuf::from("./lectern.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Some(url) = env_first(&["LECTERN_BACKEND_URL", "LECTERN_API_URL", "BACKEND_URL"]) {
            self.backend.url = url;
        }
        if let Some(key) = env_first(&["LECTERN_ANON_KEY", "LECTERN_API_KEY", "BACKEND_ANON_KEY"]) {
            self.backend.anon_key = key;
        }
        if let Ok(url) = std::env::var("LECTERN_PROVISIONER_URL") {
            self.provisioner.url = url;
        }
        if let Ok(level) = std::env::var("LECTERN_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("LECTERN_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// First set variable from a list of accepted names
fn env_first(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| std::env::var(name).ok())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Lectern Configuration
#
# Environment variables override these settings:
# - LECTERN_BACKEND_URL (or LECTERN_API_URL, BACKEND_URL)
# - LECTERN_ANON_KEY (or LECTERN_API_KEY, BACKEND_ANON_KEY)
# - LECTERN_PROVISIONER_URL
# - LECTERN_LOG_LEVEL
# - LECTERN_LOG_FORMAT

[backend]
# Base URL of the hosted backend environment
url = "http://localhost:54321"

# Public anon key for the environment
anon_key = ""

# Request timeout in milliseconds
request_timeout_ms = 10000

[provisioner]
# Admin server that performs privileged provisioning
url = "http://localhost:8787"

# Request timeout in milliseconds
request_timeout_ms = 10000

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/lectern/lectern.log"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config: Config = toml::from_str("[backend]\nanon_key = \"pk-test\"\n").unwrap();
        assert_eq!(config.backend.url, "http://localhost:54321");
        assert_eq!(config.backend.anon_key, "pk-test");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.provisioner.url, "http://localhost:8787");
    }

    #[test]
    fn test_load_round_trips_generated_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(generate_default_config().as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.backend.request_timeout_ms, 10_000);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[backend\nurl=").unwrap();

        match Config::load(file.path()) {
            Err(ConfigError::Parse { .. }) => {}
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_rest_config_mapping() {
        let section = BackendConfig {
            url: "https://env.lectern.test".to_string(),
            anon_key: "pk".to_string(),
            request_timeout_ms: 2_000,
        };
        let rest = section.to_rest_config();
        assert_eq!(rest.base_url, "https://env.lectern.test");
        assert_eq!(rest.anon_key, "pk");
        assert_eq!(rest.request_timeout_ms, 2_000);
    }
}
