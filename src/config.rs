//! User configuration, read from `<config_dir>/snipshelf/config.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Overrides [`Config::data_dir`] when set.
pub const DATA_DIR_ENV: &str = "SNIPSHELF_DATA_DIR";

const APP_DIR: &str = "snipshelf";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the snippet and category slots are stored
    pub data_dir: Option<PathBuf>,
    pub default_language: String,
    pub default_category: String,
    /// Used when `RUST_LOG` is not set
    pub log_level: String,
    pub clipboard_command: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            default_language: String::from("javascript"),
            default_category: String::from("JavaScript"),
            log_level: String::from("warn"),
            clipboard_command: None,
        }
    }
}

impl Config {
    /// Loads the user's config file, or defaults if there is none.
    pub fn load() -> Result<Self> {
        match dirs::config_dir() {
            Some(dir) => Self::load_from(&dir.join(APP_DIR).join("config.toml")),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config TOML")
    }

    /// Resolves the storage directory: environment, then config, then the
    /// platform data directory.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let base = dirs::data_dir().context("Failed to get data directory")?;
        Ok(base.join(APP_DIR))
    }
}
