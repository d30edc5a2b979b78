//! Effective configuration and where each value came from.
//!
//! Every setting is resolved through the same priority chain:
//!
//! 1. command-line argument
//! 2. environment variable
//! 3. `~/.config/bgg-shelf/settings.toml`
//! 4. built-in default

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use bgg_shelf_catalog::{DEFAULT_API_URL, DEFAULT_REQUEST_DELAY};

use crate::error::ShelfError;
use crate::gallery::{DEFAULT_CARDS_PER_ROW, clamp_cards_per_row};

pub const ENV_COLLECTION: &str = "BGG_SHELF_COLLECTION";
pub const ENV_DELAY: &str = "BGG_SHELF_DELAY";
pub const ENV_API_URL: &str = "BGG_SHELF_API_URL";

const DEFAULT_COLLECTION: &str = "collection.xml";

/// Canonical path to the settings file: `~/.config/bgg-shelf/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("bgg-shelf").join("settings.toml")
}

/// Contents of `settings.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    pub collection: Option<PathBuf>,
    /// Seconds between catalog requests.
    pub delay: Option<f64>,
    pub api_url: Option<String>,
    pub cards_per_row: Option<usize>,
}

impl SettingsFile {
    /// Read the settings file. A missing file is the same as an empty one.
    pub fn load(path: &Path) -> Result<Self, ShelfError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ShelfError::settings(format!(
                    "cannot read {}: {e}",
                    path.display()
                )));
            }
        };
        toml::from_str(&contents)
            .map_err(|e| ShelfError::settings(format!("invalid {}: {e}", path.display())))
    }
}

/// Where a setting's value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingSource {
    Argument,
    EnvVar(&'static str),
    SettingsFile,
    Default,
}

impl std::fmt::Display for SettingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Argument => write!(f, "command line"),
            Self::EnvVar(var) => write!(f, "env ${var}"),
            Self::SettingsFile => write!(f, "settings file"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// A resolved value and its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Setting<T> {
    pub value: T,
    pub source: SettingSource,
}

impl<T> Setting<T> {
    fn new(value: T, source: SettingSource) -> Self {
        Self { value, source }
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub collection: Option<PathBuf>,
    pub delay: Option<f64>,
    pub api_url: Option<String>,
    pub cards_per_row: Option<usize>,
}

/// Effective configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub collection: Setting<PathBuf>,
    pub delay: Setting<Duration>,
    pub api_url: Setting<String>,
    pub cards_per_row: Setting<usize>,
}

impl Settings {
    /// Resolve against the process environment and the user's settings file.
    pub fn resolve(overrides: Overrides) -> Result<Self, ShelfError> {
        let file = SettingsFile::load(&settings_path())?;
        Self::resolve_with(overrides, |var| std::env::var(var).ok(), file)
    }

    /// Resolve against an explicit environment lookup and settings file.
    pub fn resolve_with<E>(
        overrides: Overrides,
        env: E,
        file: SettingsFile,
    ) -> Result<Self, ShelfError>
    where
        E: Fn(&str) -> Option<String>,
    {
        let collection = if let Some(p) = overrides.collection {
            Setting::new(p, SettingSource::Argument)
        } else if let Some(p) = env(ENV_COLLECTION).filter(|v| !v.is_empty()) {
            Setting::new(PathBuf::from(p), SettingSource::EnvVar(ENV_COLLECTION))
        } else if let Some(p) = file.collection {
            Setting::new(p, SettingSource::SettingsFile)
        } else {
            Setting::new(PathBuf::from(DEFAULT_COLLECTION), SettingSource::Default)
        };

        let delay = if let Some(secs) = overrides.delay {
            Setting::new(parse_delay(secs, "--delay")?, SettingSource::Argument)
        } else if let Some(raw) = env(ENV_DELAY).filter(|v| !v.is_empty()) {
            let secs = raw.trim().parse::<f64>().map_err(|_| {
                ShelfError::settings(format!("{ENV_DELAY} must be a number of seconds, got '{raw}'"))
            })?;
            Setting::new(parse_delay(secs, ENV_DELAY)?, SettingSource::EnvVar(ENV_DELAY))
        } else if let Some(secs) = file.delay {
            Setting::new(parse_delay(secs, "delay")?, SettingSource::SettingsFile)
        } else {
            Setting::new(DEFAULT_REQUEST_DELAY, SettingSource::Default)
        };

        let api_url = if let Some(url) = overrides.api_url {
            Setting::new(url, SettingSource::Argument)
        } else if let Some(url) = env(ENV_API_URL).filter(|v| !v.is_empty()) {
            Setting::new(url, SettingSource::EnvVar(ENV_API_URL))
        } else if let Some(url) = file.api_url {
            Setting::new(url, SettingSource::SettingsFile)
        } else {
            Setting::new(DEFAULT_API_URL.to_string(), SettingSource::Default)
        };

        let cards_per_row = if let Some(n) = overrides.cards_per_row {
            Setting::new(clamp_cards_per_row(n), SettingSource::Argument)
        } else if let Some(n) = file.cards_per_row {
            Setting::new(clamp_cards_per_row(n), SettingSource::SettingsFile)
        } else {
            Setting::new(DEFAULT_CARDS_PER_ROW, SettingSource::Default)
        };

        Ok(Self {
            collection,
            delay,
            api_url,
            cards_per_row,
        })
    }
}

fn parse_delay(secs: f64, origin: &str) -> Result<Duration, ShelfError> {
    Duration::try_from_secs_f64(secs).map_err(|_| {
        ShelfError::settings(format!(
            "{origin} must be a non-negative number of seconds, got {secs}"
        ))
    })
}
