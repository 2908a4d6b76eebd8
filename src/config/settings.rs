//! Persisted settings

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{Result, RillError};

/// Environment variable overriding the configured endpoint base URL
pub const BASE_URL_ENV: &str = "RILLCHAT_BASE_URL";

/// Global configuration (stored in the platform config dir)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Base URL of the serving endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout for non-streamed calls, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Maximum gap between stream chunks before the turn is failed, in
    /// seconds
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,

    /// Verbose logging enabled
    #[serde(default)]
    pub verbose: bool,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_idle_timeout_secs() -> u64 {
    30
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            idle_timeout_secs: default_idle_timeout_secs(),
            verbose: false,
        }
    }
}

impl GlobalConfig {
    /// Load global configuration from disk
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load() -> Result<Self> {
        let path = super::Config::global_config_path();
        Self::load_from_path(&path)
    }

    /// Load configuration from a specific path
    ///
    /// A missing file is not an error; defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| RillError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&contents).map_err(|e| RillError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Save configuration to disk
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save(&self) -> Result<()> {
        let path = super::Config::global_config_path();
        self.save_to_path(&path)
    }

    /// Save configuration to a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = GlobalConfig::default();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.request_timeout_secs, 120);
        assert_eq!(config.idle_timeout_secs, 30);
        assert!(!config.verbose);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = GlobalConfig::load_from_path(&temp_dir.path().join("absent.json")).unwrap();
        assert_eq!(loaded.base_url, GlobalConfig::default().base_url);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.json");

        let mut config = GlobalConfig::default();
        config.base_url = "https://chat.example.com".to_string();
        config.idle_timeout_secs = 5;

        config.save_to_path(&config_path).unwrap();

        let loaded = GlobalConfig::load_from_path(&config_path).unwrap();
        assert_eq!(loaded.base_url, "https://chat.example.com");
        assert_eq!(loaded.idle_timeout_secs, 5);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        fs::write(&config_path, r#"{"base_url":"http://other:8080"}"#).unwrap();

        let loaded = GlobalConfig::load_from_path(&config_path).unwrap();
        assert_eq!(loaded.base_url, "http://other:8080");
        assert_eq!(loaded.idle_timeout_secs, 30);
    }

    #[test]
    fn test_invalid_file_is_a_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        fs::write(&config_path, "not json").unwrap();

        let err = GlobalConfig::load_from_path(&config_path).unwrap_err();
        assert!(matches!(err, RillError::ConfigParse { .. }));
    }
}
