//! # Service Configuration
//!
//! Where the collection lives, what defaults new customers get, and how
//! much gets logged.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     ATRIUM_DATA_PATH=/var/lib/atrium/customers.json                    │
//! │     ATRIUM_DEFAULT_COUNTRY=PT                                          │
//! │     ATRIUM_DEFAULT_CURRENCY=EUR                                        │
//! │     ATRIUM_DEFAULT_LANGUAGE=pt-PT                                      │
//! │     ATRIUM_LOG=debug                                                   │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/atrium/atrium.toml (Linux)                               │
//! │     ~/Library/Application Support/com.atrium.atrium/atrium.toml (macOS)│
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     ./data/customers.json, BR / pt-BR / BRL                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # atrium.toml
//! [storage]
//! data_path = "/var/lib/atrium/customers.json"
//! pretty = true
//!
//! [defaults]
//! status = "active"
//! country = "BR"
//! language = "pt-BR"
//! currency = "BRL"
//! visibility = "private"
//!
//! [logging]
//! filter = "info,atrium=debug"
//! ```

use std::path::{Path, PathBuf};

use atrium_core::CustomerDefaults;
use atrium_store::StoreConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ConfigError;

// =============================================================================
// Storage Settings
// =============================================================================

/// Where and how the collection file is written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Path to the JSON collection file.
    /// Default: ./data/customers.json
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    /// Pretty-print the collection file.
    /// Default: true
    #[serde(default = "default_true")]
    pub pretty: bool,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data").join("customers.json")
}

fn default_true() -> bool {
    true
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            data_path: default_data_path(),
            pretty: default_true(),
        }
    }
}

// =============================================================================
// Logging Settings
// =============================================================================

/// Log filter used by [`crate::telemetry::init`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive.
    /// Default: "info,atrium=debug"
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "info,atrium=debug".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_filter(),
        }
    }
}

// =============================================================================
// Service Config
// =============================================================================

/// Complete service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    /// Values for attributes a create payload leaves unset.
    #[serde(default)]
    pub defaults: CustomerDefaults,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl ServiceConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else the platform config directory)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = match config_path.or_else(Self::default_config_path) {
            Some(path) if path.exists() => {
                info!(?path, "Loading config from file");
                Self::from_file(&path)?
            }
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML config file. Missing sections take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.data_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("storage.data_path must not be empty".into()));
        }

        let blank = self.defaults.blank_fields();
        if !blank.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "defaults must not be blank: {}",
                blank.join(", ")
            )));
        }

        Ok(())
    }

    /// Record store settings derived from this config.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(&self.storage.data_path).pretty(self.storage.pretty)
    }

    /// Applies `ATRIUM_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("ATRIUM_DATA_PATH") {
            debug!(path = %path, "Overriding data path from environment");
            self.storage.data_path = PathBuf::from(path);
        }

        if let Some(country) = lookup("ATRIUM_DEFAULT_COUNTRY") {
            self.defaults.country = country;
        }

        if let Some(currency) = lookup("ATRIUM_DEFAULT_CURRENCY") {
            self.defaults.currency = currency;
        }

        if let Some(language) = lookup("ATRIUM_DEFAULT_LANGUAGE") {
            self.defaults.language = language;
        }

        if let Some(filter) = lookup("ATRIUM_LOG") {
            self.logging.filter = filter;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "atrium", "atrium")
            .map(|dirs| dirs.config_dir().join("atrium.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.storage.data_path, PathBuf::from("data/customers.json"));
        assert!(config.storage.pretty);
        assert_eq!(config.defaults.country, "BR");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atrium.toml");
        std::fs::write(
            &path,
            "[storage]\ndata_path = \"/srv/atrium/customers.json\"\n\n[defaults]\ncurrency = \"EUR\"\n",
        )
        .unwrap();

        let config = ServiceConfig::from_file(&path).unwrap();

        assert_eq!(config.storage.data_path, PathBuf::from("/srv/atrium/customers.json"));
        assert!(config.storage.pretty);
        assert_eq!(config.defaults.currency, "EUR");
        assert_eq!(config.defaults.country, "BR");
        assert_eq!(config.logging.filter, "info,atrium=debug");
    }

    #[test]
    fn test_bad_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atrium.toml");
        std::fs::write(&path, "[storage\n").unwrap();

        assert!(matches!(ServiceConfig::from_file(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_overrides_win_over_file_values() {
        let env: HashMap<&str, &str> = [
            ("ATRIUM_DATA_PATH", "/tmp/override.json"),
            ("ATRIUM_DEFAULT_COUNTRY", "PT"),
            ("ATRIUM_LOG", "warn"),
        ]
        .into_iter()
        .collect();

        let mut config = ServiceConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.storage.data_path, PathBuf::from("/tmp/override.json"));
        assert_eq!(config.defaults.country, "PT");
        assert_eq!(config.defaults.currency, "BRL");
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn test_validation() {
        let mut config = ServiceConfig::default();

        config.defaults.country = "  ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.defaults.country = "BR".to_string();
        config.storage.data_path = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_reads_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atrium.toml");
        std::fs::write(&path, "[storage]\npretty = false\n").unwrap();

        let config = ServiceConfig::load(Some(path)).unwrap();

        assert!(!config.storage.pretty);
        assert!(!config.store_config().pretty);
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&ServiceConfig::default()).unwrap();
        assert!(toml_str.contains("[storage]"));
        assert!(toml_str.contains("[defaults]"));
    }
}
