//! Configuration file support for Somno.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/somno/config.toml`.

use crate::{Error, Result, SleepGoals};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub goals: GoalsConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Initial sleep goals, used when no snapshot exists yet
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GoalsConfig {
    #[serde(default = "default_target_sleep_duration")]
    pub target_sleep_duration: f64,

    #[serde(default)]
    pub reminder_enabled: bool,

    #[serde(default = "default_reminder_minutes_before")]
    pub reminder_minutes_before: u32,
}

impl Default for GoalsConfig {
    fn default() -> Self {
        Self {
            target_sleep_duration: default_target_sleep_duration(),
            reminder_enabled: false,
            reminder_minutes_before: default_reminder_minutes_before(),
        }
    }
}

impl GoalsConfig {
    /// The goals record seeded into a brand-new store.
    pub fn initial_goals(&self) -> SleepGoals {
        SleepGoals {
            target_sleep_duration: self.target_sleep_duration,
            reminder_enabled: self.reminder_enabled,
            reminder_minutes_before: self.reminder_minutes_before,
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("somno")
}

fn default_target_sleep_duration() -> f64 {
    8.0
}

fn default_reminder_minutes_before() -> u32 {
    30
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("somno").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
