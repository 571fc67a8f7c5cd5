// SPDX-License-Identifier: MPL-2.0

use crate::config::{APP_ID, DEFAULT_SERVER, DEFAULT_TIMEOUT_SECS, DEFAULT_TIMESTAMP_FORMAT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid settings file: {0}")]
    Format(#[from] serde_json::Error),
}

/// Persistent client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub server_url: String,
    /// Value of the server's session cookie, copied from a logged-in browser
    pub session_cookie: Option<String>,
    /// Seed for the CSRF cookie when the server does not hand one out
    pub csrf_token: Option<String>,
    /// chrono strftime pattern for post timestamps
    pub timestamp_format: String,
    pub request_timeout_secs: u64,
    /// Show request failures in the view instead of only logging them
    pub alert_on_error: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER.to_string(),
            session_cookie: None,
            csrf_token: None,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            alert_on_error: false,
        }
    }
}

impl AppSettings {
    /// ~/.config/<APP_ID>/settings.json
    pub fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push(APP_ID);
            p.push("settings.json");
            p
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Load settings from the default location; a missing file gives defaults.
    pub fn load() -> Result<Self, SettingsError> {
        let path = Self::settings_path().ok_or(SettingsError::NoConfigDir)?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(SettingsError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn save(&self) -> Result<PathBuf, SettingsError> {
        let path = Self::settings_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| SettingsError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
