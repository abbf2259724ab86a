//! Configuration loading and representation.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::Context;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use lendkit_observability::LoggingConfig;

use crate::store::{ITEMS_KEY, RECORDS_KEY};

/// Where collections are persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local; nothing survives a restart.
    Memory,
    /// One JSON file per collection under `data_dir`.
    #[default]
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Defaults to `{data_dir}/lendkit` for the current OS user.
    pub data_dir: Option<PathBuf>,
    pub items_key: String,
    pub records_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_dir: None,
            items_key: ITEMS_KEY.to_string(),
            records_key: RECORDS_KEY.to_string(),
        }
    }
}

impl StorageConfig {
    /// Directory the file backend writes into.
    pub fn resolved_data_dir(&self) -> anyhow::Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }

        let mut dir = dirs::data_dir()
            .or_else(|| {
                dirs::home_dir().map(|mut h| {
                    h.push(".local");
                    h.push("share");
                    h
                })
            })
            .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;
        dir.push("lendkit");
        Ok(dir)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables.
    ///
    /// Sources, lowest precedence first:
    /// - built-in defaults
    /// - `config/lendkit.*` (optional)
    /// - the file named by `LENDKIT_CONFIG` (required if set)
    /// - `LENDKIT_*` variables, `__` between nesting levels
    ///   (e.g. `LENDKIT_STORAGE__BACKEND=memory`)
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(File::with_name("config/lendkit").required(false));

        if let Ok(path) = env::var("LENDKIT_CONFIG") {
            builder = builder.add_source(File::with_name(&path));
        }

        builder
            .add_source(
                Environment::with_prefix("LENDKIT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Load configuration from one file, without environment overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize()
    }
}
