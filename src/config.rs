//! Configuration for a log session

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::render::DEFAULT_WIDTH;

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Wrap column for messages
    pub message_width: usize,
    /// Emit colors and other escape sequences
    pub color: bool,
    /// Whether the input device echoes the Enter key that ends a prompt
    /// answer. `None` detects it: a terminal stdin echoes, other inputs don't.
    pub input_echo: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            message_width: DEFAULT_WIDTH,
            color: true,
            input_echo: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from default location or return default config
    pub fn load_or_default() -> Self {
        // Try to load from ~/.config/linelog/config.json
        if let Some(config_dir) = dirs_config_path() {
            let config_path = config_dir.join("config.json");
            if config_path.exists() {
                match Self::load(&config_path) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!("Ignoring {}: {}", config_path.display(), e),
                }
            }
        }
        Self::default()
    }

    /// Check that the values are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.message_width == 0 {
            return Err(ConfigError::InvalidWidth(self.message_width));
        }
        Ok(())
    }
}

/// Get the configuration directory path
fn dirs_config_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".config").join("linelog"))
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Message width must be positive, got {0}")]
    InvalidWidth(usize),
}
