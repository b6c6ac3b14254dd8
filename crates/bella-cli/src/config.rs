//! Application configuration.
//!
//! Built-in defaults, overridden by `bella.toml` (or the file passed with
//! `--config`), overridden in turn by command-line flags and environment
//! variables.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "bella.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub log_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("data/bella.db"),
            host: "127.0.0.1".to_string(),
            port: 3030,
            cors_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:5174".to_string(),
            ],
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl AppConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("Invalid configuration")
    }

    /// Load from `explicit` when given (it must exist), otherwise from
    /// `bella.toml` if present, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.exists() {
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            port = 8080
            cors_origins = ["https://bella.example.com"]
            "#,
        )
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.cors_origins, vec!["https://bella.example.com"]);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.database_path, PathBuf::from("data/bella.db"));
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        assert!(AppConfig::from_toml("port = \"not a number\"").is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(AppConfig::load(Some(Path::new("/nonexistent/bella.toml"))).is_err());
    }
}
