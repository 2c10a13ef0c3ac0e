//! Configuration loading for Bibliotheque.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. User config (`~/.bibliotheque/config.toml`)
//! 3. Defaults (lowest priority)
//!
//! All configuration is optional. Two readers with a goal of 24 books each
//! are assumed when nothing is configured.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BiblioError, FailOpen, Result};

/// Annual goal used when none is configured.
pub const DEFAULT_GOAL: u32 = 24;

/// Smallest goal the engine will divide by.
pub const MIN_GOAL: u32 = 1;

/// One of the two readers sharing a library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReaderId {
    Partner1,
    Partner2,
}

impl ReaderId {
    /// Both readers, first reader first.
    pub fn all() -> &'static [ReaderId] {
        &[ReaderId::Partner1, ReaderId::Partner2]
    }

    /// Storage key for this reader.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReaderId::Partner1 => "partner1",
            ReaderId::Partner2 => "partner2",
        }
    }

    /// Name shown when the reader has not set one.
    pub fn default_name(&self) -> &'static str {
        match self {
            ReaderId::Partner1 => "Ian",
            ReaderId::Partner2 => "Hannah",
        }
    }

    fn env_prefix(&self) -> &'static str {
        match self {
            ReaderId::Partner1 => "BIBLIO_PARTNER1",
            ReaderId::Partner2 => "BIBLIO_PARTNER2",
        }
    }
}

impl fmt::Display for ReaderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-reader settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReaderSettings {
    /// Display name. Empty means "use the default name".
    pub name: String,
    /// Annual book target.
    pub goal: u32,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            goal: DEFAULT_GOAL,
        }
    }
}

impl ReaderSettings {
    /// Create settings with a name and goal.
    pub fn new(name: impl Into<String>, goal: u32) -> Self {
        Self {
            name: name.into(),
            goal,
        }
    }

    /// Goal clamped so it is always safe to divide by.
    pub fn effective_goal(&self) -> u32 {
        self.goal.max(MIN_GOAL)
    }

    /// The configured name, or the reader's default when blank.
    pub fn display_name(&self, reader: ReaderId) -> &str {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            reader.default_name()
        } else {
            trimmed
        }
    }
}

/// Main configuration struct for Bibliotheque.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// First reader.
    pub partner1: ReaderSettings,
    /// Second reader.
    pub partner2: ReaderSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            partner1: ReaderSettings::new(ReaderId::Partner1.default_name(), DEFAULT_GOAL),
            partner2: ReaderSettings::new(ReaderId::Partner2.default_name(), DEFAULT_GOAL),
        }
    }
}

impl Config {
    /// Load configuration with the full precedence chain.
    pub fn load() -> Self {
        let mut config = Config::default();

        if let Some(user_config) = Self::load_user_config() {
            config = config.merge(user_config);
        }

        config.apply_env_overrides();
        config
    }

    /// Load configuration using `home` as the config directory.
    pub fn load_from_home(home: &Path) -> Self {
        let mut config = Config::default();

        if let Some(user_config) = Self::read_optional(&home.join("config.toml")) {
            config = config.merge(user_config);
        }

        config.apply_env_overrides();
        config
    }

    fn load_user_config() -> Option<Config> {
        Self::read_optional(&biblio_home()?.join("config.toml"))
    }

    /// Read a config file that may not exist. Unreadable or invalid files
    /// are logged and skipped.
    fn read_optional(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        Self::load_from_file(path)
            .map(Some)
            .fail_open_default("ignoring user config")
    }

    /// Load config from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| BiblioError::storage(path, e))?;
        toml::from_str(&content).map_err(|e| BiblioError::config(e.to_string()))
    }

    /// Settings for one reader.
    pub fn reader(&self, reader: ReaderId) -> &ReaderSettings {
        match reader {
            ReaderId::Partner1 => &self.partner1,
            ReaderId::Partner2 => &self.partner2,
        }
    }

    fn reader_mut(&mut self, reader: ReaderId) -> &mut ReaderSettings {
        match reader {
            ReaderId::Partner1 => &mut self.partner1,
            ReaderId::Partner2 => &mut self.partner2,
        }
    }

    /// Apply environment variable overrides.
    ///
    /// `BIBLIO_PARTNER{1,2}_NAME` and `BIBLIO_PARTNER{1,2}_GOAL`. Invalid
    /// goals are ignored with a warning.
    fn apply_env_overrides(&mut self) {
        for reader in ReaderId::all() {
            let prefix = reader.env_prefix();
            let settings = self.reader_mut(*reader);

            if let Ok(val) = env::var(format!("{}_NAME", prefix)) {
                if !val.trim().is_empty() {
                    settings.name = val.trim().to_string();
                }
            }

            if let Ok(val) = env::var(format!("{}_GOAL", prefix)) {
                match val.trim().parse::<u32>() {
                    Ok(n) if n >= MIN_GOAL => settings.goal = n,
                    _ => tracing::warn!(
                        "Invalid {}_GOAL value '{}'. Expected a positive integer. Using '{}'.",
                        prefix,
                        val,
                        settings.goal
                    ),
                }
            }
        }
    }

    /// Merge another config into this one, field by field.
    ///
    /// Values in `other` that equal the defaults (blank name, default goal)
    /// do not override `self`.
    fn merge(mut self, other: Config) -> Self {
        for reader in ReaderId::all() {
            let incoming = other.reader(*reader).clone();
            let target = self.reader_mut(*reader);
            if !incoming.name.trim().is_empty() {
                target.name = incoming.name.trim().to_string();
            }
            if incoming.goal != DEFAULT_GOAL {
                target.goal = incoming.goal;
            }
        }
        self
    }

    /// Save configuration to `path`, atomically.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| BiblioError::storage(parent, e))?;
            }
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| BiblioError::config(e.to_string()))?;

        let temp_path = path.with_extension("toml.tmp");
        fs::write(&temp_path, &content).map_err(|e| BiblioError::storage(&temp_path, e))?;
        fs::rename(&temp_path, path).map_err(|e| BiblioError::storage(path, e))?;

        Ok(())
    }
}

/// Get the Bibliotheque home directory.
///
/// `BIBLIO_HOME` wins when set and non-empty; otherwise `~/.bibliotheque`.
pub fn biblio_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("BIBLIO_HOME") {
        if home.is_empty() {
            tracing::warn!("BIBLIO_HOME is empty, using default");
        } else {
            return Some(PathBuf::from(home));
        }
    }

    if let Some(home) = dirs::home_dir() {
        return Some(home.join(".bibliotheque"));
    }

    let fallback = env::temp_dir().join("bibliotheque");
    tracing::warn!(
        "HOME not set, using fallback location: {}",
        fallback.display()
    );
    Some(fallback)
}

/// Path of the user config file.
pub fn user_config_path() -> Option<PathBuf> {
    biblio_home().map(|h| h.join("config.toml"))
}
