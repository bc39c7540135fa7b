//! Error types for the layers around the calculator core.
//!
//! The processor itself never fails; these cover configuration, key
//! scripts, and the clipboard.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("Unknown key '{token}' at offset {offset}")]
    UnknownKey { token: String, offset: usize },
}

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("Failed to access clipboard: {0}")]
    Unavailable(arboard::Error),

    #[error("Failed to copy to clipboard: {0}")]
    Write(arboard::Error),
}
