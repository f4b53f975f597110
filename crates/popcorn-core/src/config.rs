use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::PopcornError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Environment variable that overrides `omdb.api_key`.
pub const API_KEY_ENV: &str = "OMDB_API_KEY";

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub omdb: OmdbSection,
    pub search: SearchSection,
    pub storage: StorageSection,
    pub exchange: ExchangeSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OmdbSection {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSection {
    pub min_query_len: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSection {
    pub watched_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeSection {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl AppConfig {
    /// Load config: user file if it exists, built-in defaults otherwise.
    /// `OMDB_API_KEY` wins over whatever the file says.
    pub fn load() -> Result<Self, PopcornError> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_api_key_override(std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    /// Load from an explicit path, falling back to defaults when it is missing.
    pub fn load_from(path: &Path) -> Result<Self, PopcornError> {
        if !path.exists() {
            return toml::from_str(DEFAULT_CONFIG).map_err(|e| PopcornError::Config(e.to_string()));
        }
        let content =
            std::fs::read_to_string(path).map_err(|e| PopcornError::Config(e.to_string()))?;
        toml::from_str(&content).map_err(|e| PopcornError::Config(e.to_string()))
    }

    /// Save current config to the user config file.
    pub fn save(&self) -> Result<(), PopcornError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PopcornError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| PopcornError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Replace the OMDb key when a non-blank override is given.
    pub fn apply_api_key_override(&mut self, key: Option<String>) {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.omdb.api_key = key.trim().to_string();
        }
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Path to the database file holding persisted slots.
    pub fn db_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.data_dir().join("popcorn.db"))
            .unwrap_or_else(|| PathBuf::from("popcorn.db"))
    }

    /// Ensure the data directory exists and return the DB path.
    pub fn ensure_db_path() -> Result<PathBuf, PopcornError> {
        let path = Self::db_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(path)
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "popcorn")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}
