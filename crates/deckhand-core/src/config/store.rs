//! Config store for loading and saving deckhand.toml.

use std::path::{Path, PathBuf};

use anyhow::Context;

use super::{DeckhandConfig, parser};

pub const CONFIG_FILE_NAME: &str = "deckhand.toml";

#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
}

impl ConfigStore {
    /// Store at `<config dir>/deckhand/deckhand.toml`.
    pub fn from_default_location() -> anyhow::Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("deckhand");
        Ok(Self::from_path(config_dir.join(CONFIG_FILE_NAME)))
    }

    pub fn from_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load the configuration; a missing file yields the defaults.
    pub fn load(&self) -> anyhow::Result<DeckhandConfig> {
        if !self.config_path.exists() {
            return Ok(DeckhandConfig::new());
        }
        parser::parse_config_toml(&self.config_path)
    }

    pub fn save(&self, config: &DeckhandConfig) -> anyhow::Result<()> {
        config.validate()?;
        let content = parser::to_toml(config).context("Failed to serialize config to TOML")?;
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(&self.config_path, content).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;
        Ok(())
    }
}
