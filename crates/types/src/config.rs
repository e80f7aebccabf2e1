//! Combobox configuration and its JSON-backed loader.
//!
//! The file lives in the standard configuration directory
//! (`~/.config/combobox/config.json` on most platforms) unless
//! `COMBOBOX_CONFIG_PATH` points elsewhere. A missing file yields defaults;
//! a malformed one is logged and ignored.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use dirs_next::{config_dir, home_dir};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Environment variable allowing callers to override the config file path.
pub const CONFIG_PATH_ENV: &str = "COMBOBOX_CONFIG_PATH";

/// Default filename for the JSON payload.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Error surfaced when reading the configuration fails.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// How the filtered candidate list is computed from the input text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchPolicy {
    #[default]
    SubstringCaseInsensitive,
}

/// What the dropdown offers right after the input is cleared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClearBehavior {
    /// Every visible candidate is offered again.
    #[default]
    ShowAll,
    /// Nothing is offered until the user types.
    ShowNone,
}

/// Recognized combobox options.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboboxConfig {
    /// Whether an empty input is a valid submission.
    pub allow_empty_submit: bool,
    pub match_policy: MatchPolicy,
    /// Offer only candidates associated with the current account.
    pub restrict_to_known_set: bool,
    pub clear_behavior: ClearBehavior,
}

impl Default for ComboboxConfig {
    fn default() -> Self {
        Self {
            allow_empty_submit: true,
            match_policy: MatchPolicy::default(),
            restrict_to_known_set: true,
            clear_behavior: ClearBehavior::default(),
        }
    }
}

impl ComboboxConfig {
    pub fn with_allow_empty_submit(mut self, allow: bool) -> Self {
        self.allow_empty_submit = allow;
        self
    }

    pub fn with_restrict_to_known_set(mut self, restrict: bool) -> Self {
        self.restrict_to_known_set = restrict;
        self
    }

    pub fn with_clear_behavior(mut self, behavior: ClearBehavior) -> Self {
        self.clear_behavior = behavior;
        self
    }

    /// Load from the default location (see module docs).
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&default_config_path())
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(config) => Ok(config),
                Err(error) => {
                    warn!(
                        path = %path.display(),
                        error = %error,
                        "Failed to parse combobox config; using defaults"
                    );
                    Ok(Self::default())
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(ConfigError::Io(error)),
        }
    }
}

/// Resolve the config path from `COMBOBOX_CONFIG_PATH` or the platform config dir.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("combobox")
        .join(CONFIG_FILE_NAME)
}

fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = path.strip_prefix("~/") {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    PathBuf::from(path)
}
