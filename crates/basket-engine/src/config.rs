//! # Kiosk Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BASKET_DB_PATH=/srv/catalog.db                                     │
//! │     BASKET_BUDGET=500                                                  │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/smart-basket/kiosk.toml (Linux)                          │
//! │     ~/Library/Application Support/com.smart-basket.kiosk/kiosk.toml    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # kiosk.toml
//! [store]
//! name = "Sentinels Smart Basket"
//! checkout_header = "Sentinels Smart Basket Checkout:"
//! currency_symbol = "₱"
//!
//! [catalog]
//! database_path = "/var/lib/smart-basket/catalog.db"
//! cache_lookups = true
//!
//! [scanner]
//! channel_capacity = 64
//! command_capacity = 16
//! idle_backoff_ms = 50
//!
//! [budget]
//! default = "500"
//! clear_on_reset = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use basket_core::validation::parse_amount;
use basket_core::{Budget, DEFAULT_CHECKOUT_HEADER};

use crate::controller::ControllerOptions;
use crate::error::{EngineError, EngineResult};
use crate::pipeline::PipelineOptions;

const CONFIG_FILE_NAME: &str = "kiosk.toml";
const DATABASE_FILE_NAME: &str = "catalog.db";

// =============================================================================
// Sections
// =============================================================================

/// Store branding and payload text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Store name shown in the console header.
    #[serde(default = "default_store_name")]
    pub name: String,

    /// First line of every checkout payload.
    #[serde(default = "default_checkout_header")]
    pub checkout_header: String,

    /// Currency symbol for on-screen amounts (never in the payload).
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_store_name() -> String {
    "Smart Basket".to_string()
}

fn default_checkout_header() -> String {
    DEFAULT_CHECKOUT_HEADER.to_string()
}

fn default_currency_symbol() -> String {
    "₱".to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: default_store_name(),
            checkout_header: default_checkout_header(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

/// Where the catalog lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// SQLite file; the platform data dir when unset.
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Cache found products for the session.
    #[serde(default = "default_true")]
    pub cache_lookups: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            database_path: None,
            cache_lookups: true,
        }
    }
}

/// Channel sizing for the scan pipeline and controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerSettings {
    /// Buffered resolved scans between pipeline and controller.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Buffered UI commands.
    #[serde(default = "default_command_capacity")]
    pub command_capacity: usize,

    /// Wait after an empty poll (milliseconds).
    #[serde(default = "default_idle_backoff")]
    pub idle_backoff_ms: u64,
}

fn default_channel_capacity() -> usize {
    64
}
fn default_command_capacity() -> usize {
    16
}
fn default_idle_backoff() -> u64 {
    50
}

impl Default for ScannerSettings {
    fn default() -> Self {
        ScannerSettings {
            channel_capacity: default_channel_capacity(),
            command_capacity: default_command_capacity(),
            idle_backoff_ms: default_idle_backoff(),
        }
    }
}

/// Budget behaviour.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BudgetSettings {
    /// Budget applied at startup, as keypad text. Unset or "0" means none.
    #[serde(default)]
    pub default: Option<String>,

    /// Whether resetting the basket also clears the budget.
    #[serde(default)]
    pub clear_on_reset: bool,
}

// =============================================================================
// Main Kiosk Configuration
// =============================================================================

/// Complete kiosk configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KioskConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub scanner: ScannerSettings,

    #[serde(default)]
    pub budget: BudgetSettings,
}

impl KioskConfig {
    /// Parses TOML text. Missing sections and keys take their defaults.
    pub fn from_toml_str(contents: &str) -> EngineResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (explicit path, else the platform config dir)
    /// 3. Environment variables
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file is not.
    pub fn load(config_path: Option<&Path>) -> EngineResult<Self> {
        let mut config = match config_path {
            Some(path) => {
                info!(path = %path.display(), "Loading kiosk config");
                Self::from_toml_str(&std::fs::read_to_string(path)?)?
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => {
                    info!(path = %path.display(), "Loading kiosk config");
                    Self::from_toml_str(&std::fs::read_to_string(&path)?)?
                }
                other => {
                    debug!(path = ?other, "Config file not found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Applies environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup (the environment in production).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("BASKET_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.catalog.database_path = Some(PathBuf::from(path));
        }

        if let Some(name) = lookup("BASKET_STORE_NAME") {
            self.store.name = name;
        }

        if let Some(budget) = lookup("BASKET_BUDGET") {
            debug!(budget = %budget, "Overriding default budget from environment");
            self.budget.default = Some(budget);
        }

        if let Some(cache) = lookup("BASKET_CACHE_LOOKUPS") {
            match cache.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.catalog.cache_lookups = true,
                "0" | "false" | "no" | "off" => self.catalog.cache_lookups = false,
                _ => warn!(value = %cache, "Unknown BASKET_CACHE_LOOKUPS value"),
            }
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> EngineResult<()> {
        if self.scanner.channel_capacity == 0 {
            return Err(EngineError::InvalidConfig(
                "scanner.channel_capacity must be greater than 0".into(),
            ));
        }

        if self.scanner.command_capacity == 0 {
            return Err(EngineError::InvalidConfig(
                "scanner.command_capacity must be greater than 0".into(),
            ));
        }

        if self.store.checkout_header.chars().any(char::is_control) {
            return Err(EngineError::InvalidConfig(
                "store.checkout_header must be a single line".into(),
            ));
        }

        self.initial_budget()?;

        Ok(())
    }

    /// The configured startup budget.
    pub fn initial_budget(&self) -> EngineResult<Budget> {
        match self.budget.default.as_deref() {
            None => Ok(Budget::unset()),
            Some(text) => parse_amount("budget.default", text)
                .map(Budget::from_money)
                .map_err(|e| EngineError::InvalidConfig(e.to_string())),
        }
    }

    /// Database file: the configured path or the platform data dir.
    pub fn database_path(&self) -> EngineResult<PathBuf> {
        if let Some(path) = &self.catalog.database_path {
            return Ok(path.clone());
        }

        Self::project_dirs()
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
            .ok_or_else(|| {
                EngineError::InvalidConfig("No home directory; set catalog.database_path".into())
            })
    }

    /// Options for [`crate::pipeline::ScanPipeline::spawn_with`].
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            capacity: self.scanner.channel_capacity,
            idle_backoff: Duration::from_millis(self.scanner.idle_backoff_ms),
        }
    }

    /// Options for [`crate::controller::BasketController::spawn`].
    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            command_capacity: self.scanner.command_capacity,
            clear_budget_on_reset: self.budget.clear_on_reset,
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "smart-basket", "kiosk")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basket_core::Money;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = KioskConfig::default();
        assert_eq!(config.store.checkout_header, DEFAULT_CHECKOUT_HEADER);
        assert_eq!(config.scanner.channel_capacity, 64);
        assert!(config.catalog.cache_lookups);
        assert!(!config.budget.clear_on_reset);
        assert!(config.validate().is_ok());
        assert!(!config.initial_budget().unwrap().is_set());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = KioskConfig::from_toml_str(
            r#"
            [store]
            checkout_header = "Sentinels Smart Basket Checkout:"

            [budget]
            default = "500"
            clear_on_reset = true
            "#,
        )
        .unwrap();

        assert_eq!(config.store.checkout_header, "Sentinels Smart Basket Checkout:");
        assert_eq!(config.store.currency_symbol, "₱");
        assert_eq!(config.scanner.command_capacity, 16);
        assert_eq!(
            config.initial_budget().unwrap().limit(),
            Some(Money::from_cents(50_000))
        );
        assert!(config.controller_options().clear_budget_on_reset);
    }

    #[test]
    fn test_malformed_toml_is_load_error() {
        let err = KioskConfig::from_toml_str("[store\nname = ").unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_config_validation() {
        let mut config = KioskConfig::default();
        config.scanner.channel_capacity = 0;
        assert!(config.validate().is_err());

        let mut config = KioskConfig::default();
        config.budget.default = Some("lots".into());
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));

        let mut config = KioskConfig::default();
        config.store.checkout_header = "Pay here\nTOTAL: 0.00".into();
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("BASKET_DB_PATH", "/tmp/catalog.db"),
            ("BASKET_BUDGET", "12.50"),
            ("BASKET_CACHE_LOOKUPS", "off"),
        ]);

        let mut config = KioskConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(
            config.database_path().unwrap(),
            PathBuf::from("/tmp/catalog.db")
        );
        assert!(!config.catalog.cache_lookups);
        assert_eq!(
            config.initial_budget().unwrap().limit(),
            Some(Money::from_cents(1250))
        );
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let err = KioskConfig::load(Some(Path::new("/definitely/not/here/kiosk.toml")));
        assert!(err.is_err());
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&KioskConfig::default()).unwrap();
        assert!(toml_str.contains("[store]"));
        assert!(toml_str.contains("[scanner]"));
    }
}
