//! Config store for loading and saving mcpdeck.toml.

use std::path::{Path, PathBuf};

use anyhow::Context;

use super::{ConsoleConfig, parser};

const CONFIG_FILE: &str = "mcpdeck.toml";

#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
}

impl ConfigStore {
    /// Store at `<config dir>/mcpdeck/mcpdeck.toml`.
    pub fn with_defaults() -> anyhow::Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("mcpdeck");
        Ok(Self::from_dir(config_dir))
    }

    pub fn from_dir(config_dir: impl AsRef<Path>) -> Self {
        Self::from_path(config_dir.as_ref().join(CONFIG_FILE))
    }

    pub fn from_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load the configuration. A missing file yields the defaults.
    pub fn load(&self) -> anyhow::Result<ConsoleConfig> {
        if !self.config_path.exists() {
            return Ok(ConsoleConfig::new());
        }
        parser::parse_config_toml(&self.config_path)
    }

    pub fn save(&self, config: &ConsoleConfig) -> anyhow::Result<()> {
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
