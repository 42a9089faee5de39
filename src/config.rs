//! Configuration file parser for ~/.config/feedlist/config.toml.
//!
//! The file is optional; a missing or empty file yields `Config::default()`.
//! Unknown keys are accepted and logged as warnings, so a typo shows up in the
//! log instead of silently doing nothing.
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::row::{DEFAULT_ROW_FORMAT, DEFAULT_TITLE_FORMAT};
use crate::screen::{NamedFilter, ScreenSettings};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration
// ============================================================================

/// Top-level configuration. Any subset of keys may be given.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Show feeds that have nothing unread.
    pub show_read_feeds: bool,

    /// Row template, see [`crate::format`].
    pub feedlist_format: String,

    /// Title-line template.
    pub feedlist_title_format: String,

    /// Seconds between snapshot re-reads. 0 = only on request.
    pub refresh_interval_seconds: u64,

    /// "Reload all" covers only the feeds currently shown.
    pub reload_only_visible_feeds: bool,

    /// Snapshot file; `--feeds` takes precedence.
    pub feeds_file: Option<PathBuf>,

    /// Named filters offered by the select-filter action.
    pub filters: Vec<NamedFilter>,

    /// Keybinding overrides: action name to key string.
    pub keybindings: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            show_read_feeds: true,
            feedlist_format: DEFAULT_ROW_FORMAT.to_string(),
            feedlist_title_format: DEFAULT_TITLE_FORMAT.to_string(),
            refresh_interval_seconds: 60,
            reload_only_visible_feeds: false,
            feeds_file: None,
            filters: Vec::new(),
            keybindings: HashMap::new(),
        }
    }
}

const KNOWN_KEYS: &[&str] = &[
    "show_read_feeds",
    "feedlist_format",
    "feedlist_title_format",
    "refresh_interval_seconds",
    "reload_only_visible_feeds",
    "feeds_file",
    "filters",
    "keybindings",
];

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing or blank file → defaults
    /// - Invalid TOML or wrong value types → `ConfigError::Parse`
    /// - Larger than 1 MB → `ConfigError::TooLarge`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        tracing::info!(
            show_read_feeds = config.show_read_feeds,
            filters = config.filters.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Background refresh period, or `None` for manual refresh only.
    pub fn refresh_interval(&self) -> Option<Duration> {
        (self.refresh_interval_seconds > 0)
            .then(|| Duration::from_secs(self.refresh_interval_seconds))
    }

    pub fn screen_settings(&self) -> ScreenSettings {
        ScreenSettings {
            show_read_feeds: self.show_read_feeds,
            row_format: self.feedlist_format.clone(),
            title_format: self.feedlist_title_format.clone(),
            reload_only_visible_feeds: self.reload_only_visible_feeds,
            filters: self.filters.clone(),
        }
    }
}
