//! Application settings configuration.

use serde::{Deserialize, Serialize};

use super::{ConfigError, Result};
use crate::form::DEFAULT_CREATOR;

/// The user's theme choice.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    /// Follow the terminal's background.
    #[default]
    System,
}

impl ThemePreference {
    /// Get the next preference in the cycle light → dark → system.
    pub fn next(self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::System,
            ThemePreference::System => ThemePreference::Light,
        }
    }

    /// Get the display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            ThemePreference::Light => "Light",
            ThemePreference::Dark => "Dark",
            ThemePreference::System => "System",
        }
    }

    /// Resolve to a concrete light or dark choice.
    ///
    /// `System` reads the terminal background from `COLORFGBG` and falls
    /// back to dark when it is unset or unreadable.
    pub fn resolve(self) -> ThemePreference {
        match self {
            ThemePreference::System => {
                resolve_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
            }
            other => other,
        }
    }
}

/// Map a `COLORFGBG` value ("fg;bg" or "fg;default;bg") to light or dark.
fn resolve_colorfgbg(value: Option<&str>) -> ThemePreference {
    let background = value
        .and_then(|v| v.rsplit(';').next())
        .and_then(|bg| bg.trim().parse::<u8>().ok());

    match background {
        // ANSI 7 (light gray) and 9..=15 are the light backgrounds.
        Some(7) | Some(9..=15) => ThemePreference::Light,
        _ => ThemePreference::Dark,
    }
}

/// Application-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// The UI theme to use.
    pub theme: ThemePreference,
    /// User id recorded as the creator of new bugs.
    pub current_user: String,
    /// Whether the in-memory service waits like a remote one.
    pub simulate_latency: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: ThemePreference::System,
            current_user: DEFAULT_CREATOR.to_string(),
            simulate_latency: true,
        }
    }
}

impl Settings {
    /// Validate these settings.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::ValidationError` if the current user is blank
    /// or contains whitespace.
    pub fn validate(&self) -> Result<()> {
        if self.current_user.is_empty() {
            return Err(ConfigError::ValidationError(
                "current_user cannot be empty".to_string(),
            ));
        }

        if self.current_user.contains(char::is_whitespace) {
            return Err(ConfigError::ValidationError(format!(
                "current_user '{}' cannot contain whitespace",
                self.current_user
            )));
        }

        Ok(())
    }
}
