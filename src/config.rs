//! Configuration loaded from `config.toml`.
//!
//! ```toml
//! [keyboard]
//! show_decimal = true   # false switches to fixed-point entry
//! decimal_places = 2    # implied decimals in fixed-point entry
//!
//! [logging]
//! level = "warn"
//! ```
//!
//! A missing file is not an error; every field has a default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::calculator::EntryMode;
use crate::error::ConfigError;

/// Upper bound for fixed-point decimal places.
pub const MAX_DECIMAL_PLACES: u8 = 6;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub keyboard: KeyboardConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    /// Show the decimal key. When off, digits are entered fixed-point.
    pub show_decimal: bool,
    pub decimal_places: u8,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            show_decimal: true,
            decimal_places: 2,
        }
    }
}

impl KeyboardConfig {
    /// The entry mode these settings select.
    pub fn entry_mode(&self) -> Result<EntryMode, ConfigError> {
        if self.show_decimal {
            return Ok(EntryMode::FreeForm);
        }

        if self.decimal_places > MAX_DECIMAL_PLACES {
            return Err(ConfigError::Invalid {
                field: "keyboard.decimal_places",
                reason: format!(
                    "{} exceeds the maximum of {}",
                    self.decimal_places, MAX_DECIMAL_PLACES
                ),
            });
        }

        Ok(EntryMode::FixedPoint {
            places: self.decimal_places,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `"warn"` or `"calckeys=debug"`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Default config file location (`~/.config/calckeys/config.toml` on Linux).
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("calckeys").join("config.toml"))
}

impl Config {
    /// Load the config from `path`, or from [`default_path`] if none is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match default_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;

        Self::parse(&text, &path)
    }

    fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        // Reject bad values at load time rather than on first use
        config.keyboard.entry_mode()?;
        Ok(config)
    }
}
