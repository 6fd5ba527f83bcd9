//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::fhir::FhirConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fhir: FhirConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
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
            dirs::config_dir().map(|p| p.join("reptrack").join("config.toml")),
            Some(PathBuf::from("/etc/reptrack/config.toml")),
            Some(PathBuf::from("./config.toml")),
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
        // FHIR server overrides
        if let Ok(url) = std::env::var("REPTRACK_FHIR_URL") {
            self.fhir.base_url = url;
        }
        if let Ok(content_type) = std::env::var("REPTRACK_FHIR_CONTENT_TYPE") {
            self.fhir.content_type = content_type;
        }
        if let Ok(timeout) = std::env::var("REPTRACK_FHIR_TIMEOUT_MS") {
            if let Ok(ms) = timeout.parse() {
                self.fhir.request_timeout_ms = ms;
            }
        }

        // Logging overrides
        if let Ok(level) = std::env::var("REPTRACK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("REPTRACK_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
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
    r#"# Reptrack Configuration
#
# Environment variables override these settings:
# - REPTRACK_FHIR_URL
# - REPTRACK_FHIR_CONTENT_TYPE
# - REPTRACK_FHIR_TIMEOUT_MS
# - REPTRACK_LOG_LEVEL
# - REPTRACK_LOG_FORMAT

[fhir]
# FHIR server base URL
base_url = "https://server.fire.ly"

# Content type for FHIR exchanges: "application/fhir+json" or
# "application/json" depending on the server
content_type = "application/fhir+json"

# Request timeout in milliseconds
request_timeout_ms = 10000

[fhir.exercise]
# Coding of the tracked exercise
system = "http://loinc.org"
code = "22656-1"
display = "Squats"
unit = "reps"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/reptrack/reptrack.log"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file_with_partial_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[fhir]
base_url = "http://localhost:8080/fhir"

[logging]
level = "debug"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.fhir.base_url, "http://localhost:8080/fhir");
        assert_eq!(config.fhir.content_type, "application/fhir+json");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_generated_default_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();

        assert_eq!(config.fhir.base_url, "https://server.fire.ly");
        assert_eq!(config.fhir.exercise.code, "22656-1");
        assert_eq!(config.logging.level, "info");
    }
}
