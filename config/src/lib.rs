//! Configuration file for TlapalIA.
//!
//! The file lives at `~/.tlapalia/config.toml` and is optional: a missing file
//! means "all defaults". Every section and every key is optional too.
//!
//! ```toml
//! [app]
//! ascii_only = false
//! high_contrast = false
//! reduced_motion = false
//!
//! [google]
//! model = "gemini-2.5-flash-preview-09-2025"
//! base_url = "https://generativelanguage.googleapis.com/v1beta"
//! timeout_seconds = 60
//!
//! [retry]
//! max_retries = 5
//! initial_delay_ms = 1000
//! max_delay_ms = 16000
//! jitter_factor = 0.0
//! ```
//!
//! The API key is not part of the file. It only ever comes from the settings
//! panel and lives in memory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

use tlapal_types::ui::UiOptions;

const CONFIG_DIR: &str = ".tlapalia";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Default, Deserialize)]
pub struct TlapalConfig {
    pub app: Option<AppConfig>,
    pub google: Option<GoogleConfig>,
    pub retry: Option<RetrySettings>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Use ASCII-only glyphs for icons and spinners.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
    /// Disable the spinner animation.
    #[serde(default)]
    pub reduced_motion: bool,
}

/// Gemini endpoint settings.
#[derive(Debug, Default, Deserialize)]
pub struct GoogleConfig {
    pub model: Option<String>,
    pub base_url: Option<String>,
    /// Per-attempt HTTP timeout.
    pub timeout_seconds: Option<u64>,
}

/// Retry policy overrides for the remote call.
///
/// ```toml
/// [retry]
/// max_retries = 5
/// initial_delay_ms = 1000
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct RetrySettings {
    pub max_retries: Option<u32>,
    pub initial_delay_ms: Option<u64>,
    pub max_delay_ms: Option<u64>,
    pub jitter_factor: Option<f64>,
}

impl TlapalConfig {
    /// Load the config from its default location.
    ///
    /// `Ok(None)` when the home directory is unknown or the file does not exist.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| {
            tracing::warn!("Failed to read config at {}: {source}", path.display());
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;

        toml::from_str(&content).map_err(|source| {
            tracing::warn!("Failed to parse config at {}: {source}", path.display());
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.app
            .as_ref()
            .map(|app| UiOptions {
                ascii_only: app.ascii_only,
                high_contrast: app.high_contrast,
                reduced_motion: app.reduced_motion,
            })
            .unwrap_or_default()
    }
}

/// `~/.tlapalia`, home of the config file and the logs.
#[must_use]
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR))
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}
