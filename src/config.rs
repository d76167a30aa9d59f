use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app::tmdb::{DEFAULT_API_BASE, DEFAULT_IMAGE_BASE};

const APP_DIR: &str = "cinestream";
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_base")]
    pub api_base_url: String,
    #[serde(default = "default_image_base")]
    pub image_base_url: String,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default = "default_images")]
    pub images: bool,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: default_api_base(),
            image_base_url: default_image_base(),
            request_timeout_secs: None,
            images: default_images(),
            log_file: None,
        }
    }
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_image_base() -> String {
    DEFAULT_IMAGE_BASE.to_string()
}

fn default_images() -> bool {
    true
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.json"))
}

impl Config {
    /// Reads `path` if given. Otherwise the default location is used when it
    /// exists, falling back to built-in defaults. `TMDB_API_KEY` wins over
    /// any key from the file.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            config.override_api_key(key);
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(display.clone(), e))?;

        serde_json::from_str(&content).map_err(|e| ConfigError::ParseError(display, e))
    }

    fn override_api_key(&mut self, key: String) {
        if !key.trim().is_empty() {
            self.api_key = Some(key.trim().to_string());
        }
    }

    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn log_path(&self) -> PathBuf {
        if let Some(path) = &self.log_file {
            return path.clone();
        }
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(APP_DIR)
            .join("cinestream.log")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(String, serde_json::Error),
    #[error("No TMDB API key configured; set TMDB_API_KEY or api_key in the config file")]
    MissingApiKey,
}
