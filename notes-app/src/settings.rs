// Settings persistence (theme + light/dark mode)

use crate::session::config::Config;
use crate::session::store::atomic_write;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub theme: String,
    pub mode: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: "default".to_string(),
            mode: "dark".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from disk, falling back to defaults when no file exists
    pub fn load(config: &Config) -> Result<Self> {
        let path = config.settings_file();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = config.settings_file().parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
        }
        let contents =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize settings")?;
        atomic_write(&config.settings_file(), &contents)
    }
}
