//! Configuration management for rillchat
//!
//! Settings resolve in order: defaults, then the JSON config file in the
//! platform config dir, then environment variables (highest priority).

pub mod settings;

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use self::settings::{GlobalConfig, BASE_URL_ENV};
use crate::error::{Result, RillError};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub global: GlobalConfig,
}

impl Config {
    /// Load configuration from the config file
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read or parsed
    pub fn load() -> Result<Self> {
        let global = GlobalConfig::load()?;
        Ok(Self { global })
    }

    /// Get the configuration directory path
    #[must_use]
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rillchat")
    }

    /// Get the config file path
    #[must_use]
    pub fn global_config_path() -> PathBuf {
        Self::config_dir().join("config.json")
    }

    /// Save configuration to disk
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be written
    pub fn save(&self) -> Result<()> {
        self.global.save()
    }

    /// Endpoint base URL, honoring the environment override
    #[must_use]
    pub fn endpoint_base_url(&self) -> String {
        std::env::var(BASE_URL_ENV).unwrap_or_else(|_| self.global.base_url.clone())
    }

    /// Whole-request timeout for non-streamed calls
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.global.request_timeout_secs)
    }

    /// Maximum gap between stream chunks before a turn is failed
    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.global.idle_timeout_secs)
    }

    /// Read a settable key by name
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown key
    pub fn get_value(&self, key: &str) -> Result<String> {
        match key {
            "base_url" => Ok(self.global.base_url.clone()),
            "request_timeout_secs" => Ok(self.global.request_timeout_secs.to_string()),
            "idle_timeout_secs" => Ok(self.global.idle_timeout_secs.to_string()),
            "verbose" => Ok(self.global.verbose.to_string()),
            _ => Err(RillError::UnknownConfigKey(key.to_string())),
        }
    }

    /// Set a settable key by name
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown key or an unparseable value
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "base_url" => self.global.base_url = value.to_string(),
            "request_timeout_secs" => {
                self.global.request_timeout_secs = parse_number(key, value)?;
            }
            "idle_timeout_secs" => {
                self.global.idle_timeout_secs = parse_number(key, value)?;
            }
            "verbose" => {
                self.global.verbose = value.parse().map_err(|_| {
                    RillError::InvalidInput(format!("{key} expects true or false, got {value}"))
                })?;
            }
            _ => return Err(RillError::UnknownConfigKey(key.to_string())),
        }
        Ok(())
    }

    /// Every settable key with its current value
    #[must_use]
    pub fn list_values(&self) -> Vec<(&'static str, String)> {
        [
            "base_url",
            "request_timeout_secs",
            "idle_timeout_secs",
            "verbose",
        ]
        .iter()
        .map(|key| (*key, self.get_value(key).unwrap_or_default()))
        .collect()
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value
        .parse()
        .map_err(|_| RillError::InvalidInput(format!("{key} expects a number, got {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_paths() {
        let path = Config::global_config_path();
        assert!(path.ends_with("rillchat/config.json"));
    }

    #[test]
    fn test_get_set_round_trip() {
        let mut config = Config::default();
        config.set_value("base_url", "http://box:9000").unwrap();
        config.set_value("idle_timeout_secs", "7").unwrap();

        assert_eq!(config.get_value("base_url").unwrap(), "http://box:9000");
        assert_eq!(config.idle_timeout(), Duration::from_secs(7));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let mut config = Config::default();
        assert!(matches!(
            config.get_value("nope"),
            Err(RillError::UnknownConfigKey(_))
        ));
        assert!(matches!(
            config.set_value("nope", "1"),
            Err(RillError::UnknownConfigKey(_))
        ));
    }

    #[test]
    fn test_bad_number_is_rejected() {
        let mut config = Config::default();
        assert!(matches!(
            config.set_value("idle_timeout_secs", "soon"),
            Err(RillError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_list_values_covers_all_keys() {
        let config = Config::default();
        let keys: Vec<_> = config.list_values().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                "base_url",
                "request_timeout_secs",
                "idle_timeout_secs",
                "verbose"
            ]
        );
    }
}
