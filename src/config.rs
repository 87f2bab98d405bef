//! Configuration types for the pantryd engine.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::trigger::{DEFAULT_CYCLE_BUDGET_SECS, DEFAULT_TICK_INTERVAL_SECS};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PantryConfig {
    /// Item database settings.
    pub database: DatabaseConfig,
    /// Dispatch cycle settings.
    pub notifications: NotificationConfig,
    /// Icon suggestion settings.
    pub icons: IconConfig,
}

/// Item database configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Directory holding `pantry.db` (None = platform data dir).
    pub path: Option<PathBuf>,
}

/// Dispatch cycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Seconds between dispatch cycles.
    pub tick_interval_secs: u64,
    /// Execution budget per cycle, in seconds. A cycle that overruns is
    /// cancelled between items and its remainder retried next cycle.
    pub cycle_budget_secs: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: DEFAULT_TICK_INTERVAL_SECS,
            cycle_budget_secs: DEFAULT_CYCLE_BUDGET_SECS,
        }
    }
}

/// Icon suggestion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IconConfig {
    /// Whether item saves ask the classifier for an icon.
    pub auto_suggest: bool,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self { auto_suggest: true }
    }
}

impl PantryConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::PantryError::Config(e.to_string()))
    }

    /// Write configuration to a TOML file, creating parent directories.
    pub fn save(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::PantryError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `{config_dir}/pantryd/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Ok(config) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("pantryd").join("config.toml")
        } else if let Some(dir) = dirs::config_dir() {
            dir.join("pantryd").join("config.toml")
        } else {
            PathBuf::from("/tmp/pantryd-config/config.toml")
        }
    }

    /// Directory holding the item database, honoring the configured
    /// override.
    pub fn database_dir(&self) -> PathBuf {
        if let Some(path) = &self.database.path {
            return path.clone();
        }
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp/pantryd-data"))
            .join("pantryd")
    }
}
