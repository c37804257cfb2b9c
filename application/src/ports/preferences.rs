//! Preference storage port
//!
//! Lets the REPL remember the chosen theme without knowing where or how it
//! is stored.

use campus_chat_domain::Theme;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("Could not save preferences: {0}")]
pub struct PreferenceError(pub String);

pub trait PreferencePort: Send + Sync {
    /// Saved theme, or the default when nothing is stored.
    fn theme(&self) -> Theme;

    fn save_theme(&self, theme: Theme) -> Result<(), PreferenceError>;
}

/// Keeps preferences for the lifetime of the process only.
#[derive(Default)]
pub struct InMemoryPreferences {
    theme: Mutex<Theme>,
}

impl PreferencePort for InMemoryPreferences {
    fn theme(&self) -> Theme {
        self.theme.lock().map(|t| *t).unwrap_or_default()
    }

    fn save_theme(&self, theme: Theme) -> Result<(), PreferenceError> {
        let mut current = self
            .theme
            .lock()
            .map_err(|e| PreferenceError(e.to_string()))?;
        *current = theme;
        Ok(())
    }
}
