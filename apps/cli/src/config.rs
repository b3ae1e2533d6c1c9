//! # Application Configuration
//!
//! TOML configuration for the `tillbox` binary.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                           │
//! │                                                                     │
//! │  1. Environment Variables (highest priority)                        │
//! │     TILLBOX_DATA_DIR=/var/lib/tillbox                               │
//! │     TILLBOX_BUSINESS_NAME="Corner Shop"                             │
//! │                                                                     │
//! │  2. TOML Config File                                                │
//! │     ~/.config/tillbox/config.toml (Linux)                           │
//! │     ~/Library/Application Support/com.tillbox.tillbox (macOS)       │
//! │                                                                     │
//! │  3. Default Values (lowest priority)                                │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # config.toml
//! [business]
//! name = "Corner Shop"
//! address = "12 High Street"
//!
//! [storage]
//! data_dir = "/var/lib/tillbox"   # optional, platform default otherwise
//! database_file = "tillbox.db"
//!
//! [receipt]
//! default_tax_rate_percent = "8.25"
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use tillbox_core::DEFAULT_BUSINESS_NAME;

// =============================================================================
// Sections
// =============================================================================

/// Business identity printed on receipts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessSettings {
    /// Business name. Default: "Your Business".
    #[serde(default = "default_business_name")]
    pub name: String,

    /// Business address, empty when unset.
    #[serde(default)]
    pub address: String,
}

fn default_business_name() -> String {
    DEFAULT_BUSINESS_NAME.to_string()
}

impl Default for BusinessSettings {
    fn default() -> Self {
        BusinessSettings {
            name: default_business_name(),
            address: String::new(),
        }
    }
}

/// Where the vault, session file, and database live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Data directory override. Platform default when unset.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Database filename inside the data directory.
    #[serde(default = "default_database_file")]
    pub database_file: String,
}

fn default_database_file() -> String {
    "tillbox.db".to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            data_dir: None,
            database_file: default_database_file(),
        }
    }
}

/// Receipt defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptSettings {
    /// Tax rate applied when the command line gives none.
    #[serde(default)]
    pub default_tax_rate_percent: Decimal,
}

impl Default for ReceiptSettings {
    fn default() -> Self {
        ReceiptSettings {
            default_tax_rate_percent: Decimal::ZERO,
        }
    }
}

// =============================================================================
// App Config
// =============================================================================

/// Full application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub business: BusinessSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub receipt: ReceiptSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (config.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config: {}", path.display()))?;
                config = toml::from_str(&contents)
                    .with_context(|| format!("failed to parse config: {}", path.display()))?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        Ok(config)
    }

    /// Loads config or returns defaults if the load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|err| {
            warn!("Failed to load config: {err:#}. Using defaults.");
            Self::default()
        })
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var("TILLBOX_DATA_DIR") {
            debug!(dir = %dir, "Overriding data dir from environment");
            self.storage.data_dir = Some(PathBuf::from(dir));
        }

        if let Ok(name) = std::env::var("TILLBOX_BUSINESS_NAME") {
            self.business.name = name;
        }

        if let Ok(address) = std::env::var("TILLBOX_BUSINESS_ADDRESS") {
            self.business.address = address;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "tillbox", "tillbox")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// The resolved data directory (override or platform default).
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.storage.data_dir {
            return Ok(dir.clone());
        }

        directories::ProjectDirs::from("com", "tillbox", "tillbox")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .context("could not determine a data directory for this platform")
    }

    /// The resolved database path inside the data directory.
    pub fn database_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(&self.storage.database_file))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.business.name, DEFAULT_BUSINESS_NAME);
        assert!(config.business.address.is_empty());
        assert_eq!(config.receipt.default_tax_rate_percent, Decimal::ZERO);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let parsed: AppConfig = toml::from_str(
            r#"
            [business]
            name = "Corner Shop"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.business.name, "Corner Shop");
        assert_eq!(parsed.storage.database_file, "tillbox.db");
        assert!(parsed.storage.data_dir.is_none());
    }

    #[test]
    fn test_round_trip() {
        let config = AppConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.business.name, config.business.name);
    }
}
