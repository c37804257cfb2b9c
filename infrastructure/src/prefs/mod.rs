//! Persisted user preferences
//!
//! A small TOML file (`prefs.toml` in the data directory) remembers choices
//! made inside the REPL, currently the light/dark theme.

use campus_chat_application::{PreferenceError, PreferencePort};
use campus_chat_domain::Theme;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("Failed to write preferences to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: Theme,
}

/// Reads and writes [`Preferences`] at a fixed path.
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the default location, if the platform has a data directory.
    pub fn default_location() -> Option<Self> {
        crate::config::paths::data_dir().map(|d| Self::new(d.join("prefs.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved preferences, or defaults when missing or unreadable.
    pub fn load(&self) -> Preferences {
        let Ok(content) = std::fs::read_to_string(&self.path) else {
            debug!("No preferences at {}", self.path.display());
            return Preferences::default();
        };

        toml::from_str(&content).unwrap_or_else(|e| {
            warn!("Ignoring malformed preferences {}: {}", self.path.display(), e);
            Preferences::default()
        })
    }

    pub fn save(&self, prefs: &Preferences) -> Result<(), PrefsError> {
        let content = toml::to_string(prefs)?;
        let write = |path: &Path| -> std::io::Result<()> {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content.as_bytes())
        };
        write(&self.path).map_err(|source| PrefsError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl PreferencePort for PreferenceStore {
    fn theme(&self) -> Theme {
        self.load().theme
    }

    fn save_theme(&self, theme: Theme) -> Result<(), PreferenceError> {
        let mut prefs = self.load();
        prefs.theme = theme;
        self.save(&prefs).map_err(|e| PreferenceError(e.to_string()))
    }
}
