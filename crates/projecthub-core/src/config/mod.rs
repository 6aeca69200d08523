//! Configuration management with file persistence

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::storage::jsonl::PROJECTS_FILE;
use crate::storage::session_file::SESSION_FILE;

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "PROJECTHUB_CONFIG_DIR";

/// Projecthub configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub certificate: CertificateConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSONL project store; defaults to `projects.jsonl` in the config directory
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Remembered identity; defaults to `session.json` in the config directory
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateConfig {
    pub output_dir: PathBuf,
}

impl Default for CertificateConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
        }
    }
}

const KEYS: [&str; 3] = ["store.path", "session.path", "certificate.output_dir"];

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var(CONFIG_DIR_ENV) {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("projecthub")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, or defaults if it doesn't exist
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        self.validate()?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        let empty = |p: &Option<PathBuf>| p.as_ref().is_some_and(|p| p.as_os_str().is_empty());
        if empty(&self.store.path) {
            return Err(anyhow!("store.path must not be empty"));
        }
        if empty(&self.session.path) {
            return Err(anyhow!("session.path must not be empty"));
        }
        if self.certificate.output_dir.as_os_str().is_empty() {
            return Err(anyhow!("certificate.output_dir must not be empty"));
        }
        Ok(())
    }

    /// Resolved project store path
    pub fn store_path(&self) -> anyhow::Result<PathBuf> {
        match &self.store.path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join(PROJECTS_FILE)),
        }
    }

    /// Resolved session cache path
    pub fn session_path(&self) -> anyhow::Result<PathBuf> {
        match &self.session.path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join(SESSION_FILE)),
        }
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        match key {
            "store.path" => Ok(self.store_path()?.display().to_string()),
            "session.path" => Ok(self.session_path()?.display().to_string()),
            "certificate.output_dir" => Ok(self.certificate.output_dir.display().to_string()),
            _ => Err(anyhow!(
                "Unknown configuration key: {}. Use `projecthub config list` to see available keys.",
                key
            )),
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let value = value.trim();
        if value.is_empty() {
            return Err(anyhow!("Value for {} must not be empty", key));
        }

        match key {
            "store.path" => self.store.path = Some(PathBuf::from(value)),
            "session.path" => self.session.path = Some(PathBuf::from(value)),
            "certificate.output_dir" => self.certificate.output_dir = PathBuf::from(value),
            _ => {
                return Err(anyhow!(
                    "Unknown configuration key: {}. Use `projecthub config list` to see available keys.",
                    key
                ));
            }
        }
        Ok(())
    }

    /// List all configuration keys and their values
    pub fn list(&self) -> anyhow::Result<Vec<(String, String)>> {
        KEYS.into_iter()
            .map(|key| Ok((key.to_string(), self.get(key)?)))
            .collect()
    }

    /// Reset configuration to defaults
    pub fn reset() -> anyhow::Result<()> {
        let path = Self::config_path()?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove config file: {}", path.display()))?;
        }
        Ok(())
    }
}
