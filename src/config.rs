use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where the cleaned table lands unless --output says otherwise.
    #[serde(default = "default_output_path")]
    pub output_path: String,

    /// Row limit for the top-artists and top-songs summary tables.
    #[serde(default = "default_top_limit")]
    pub top_limit: usize,
}

fn default_output_path() -> String {
    "play_events.csv".to_string()
}

fn default_top_limit() -> usize {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            top_limit: default_top_limit(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("spinclean")
            .join("config.toml")
    }
}
