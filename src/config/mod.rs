//! # Configuration Management Module
//!
//! Centralized configuration for the interactive-worlds engine and CLI, loaded
//! from a TOML file with defaults for every value.
//!
//! ## Configuration Structure
//!
//! - [`GameConfig`] - Engine behaviour (starting world, difficulty, tutorial, strictness)
//! - [`StorageConfig`] - Where saves are kept
//! - [`LoggingConfig`] - Log level and optional log file
//!
//! ## Usage
//!
//! ```rust,no_run
//! use interactive_worlds::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Create default configuration
//!     Config::create_default("config.toml").await?;
//!
//!     // Load configuration from file
//!     let config = Config::load("config.toml").await?;
//!     println!("Starting world: {}", config.game.starting_world);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [game]
//! starting_world = "fantasy"
//! default_difficulty = "medium"
//! auto_start_tutorial = true
//! autosave = true
//! strict_requirements = false
//! strict_objectives = false
//! # worlds_file = "data/worlds.json"
//!
//! [storage]
//! data_dir = "./data"
//!
//! [logging]
//! level = "info"
//! file = "interactive-worlds.log"
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

use crate::game::{Difficulty, EngineOptions, DEFAULT_WORLD_ID};

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameConfig {
    #[serde(default = "default_starting_world")]
    pub starting_world: String,
    #[serde(default)]
    pub default_difficulty: Difficulty,
    #[serde(default = "default_true")]
    pub auto_start_tutorial: bool,
    #[serde(default = "default_true")]
    pub autosave: bool,
    /// Reject dialogue options whose requirements are unmet
    #[serde(default)]
    pub strict_requirements: bool,
    /// Verify collect/visit objectives against inventory and visited locations
    #[serde(default)]
    pub strict_objectives: bool,
    /// Optional JSON world pack replacing the built-in worlds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worlds_file: Option<String>,
}

fn default_starting_world() -> String {
    DEFAULT_WORLD_ID.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_world: default_starting_world(),
            default_difficulty: Difficulty::default(),
            auto_start_tutorial: true,
            autosave: true,
            strict_requirements: false,
            strict_objectives: false,
            worlds_file: None,
        }
    }
}

impl From<&GameConfig> for EngineOptions {
    fn from(game: &GameConfig) -> Self {
        EngineOptions {
            starting_world: game.starting_world.clone(),
            default_difficulty: game.default_difficulty,
            auto_start_tutorial: game.auto_start_tutorial,
            autosave: game.autosave,
            strict_requirements: game.strict_requirements,
            strict_objectives: game.strict_objectives,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    pub data_dir: String,
    /// Save database location; defaults to `<data_dir>/saves`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_db_path: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            save_db_path: None,
        }
    }
}

impl StorageConfig {
    pub fn save_db_path(&self) -> PathBuf {
        match &self.save_db_path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(&self.data_dir).join("saves"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: Some("interactive-worlds.log".to_string()),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        config.validate()?;
        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.game.starting_world.trim().is_empty() {
            return Err(anyhow!("game.starting_world must not be empty"));
        }
        if self.storage.data_dir.trim().is_empty() {
            return Err(anyhow!("storage.data_dir must not be empty"));
        }
        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(anyhow!(
                "logging.level '{}' is not one of {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            ));
        }
        Ok(())
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions::from(&self.game)
    }
}
