//! Error types for bracket configuration

use crate::host::Level;
use std::{io, path::PathBuf};
use thiserror::Error;

/// Result type for configuration loading and validation
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Bracket configuration errors.
///
/// All of these are fatal at startup; a reload that fails keeps the
/// previous configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A faction has no brackets at all
    #[error("No level brackets configured for {0}")]
    NoBrackets(&'static str),

    /// Factions disagree on the number of brackets
    #[error("Bracket count mismatch: Alliance has {alliance}, Horde has {horde}")]
    BracketCountMismatch { alliance: usize, horde: usize },

    /// Synchronized factions with different bracket bounds
    #[error(
        "Bracket mismatch between factions at index {index}: Alliance {alliance_lower}-{alliance_upper}, \
         Horde {horde_lower}-{horde_upper}. Synchronized factions require identical bracket bounds"
    )]
    BracketMismatch {
        index: usize,
        alliance_lower: Level,
        alliance_upper: Level,
        horde_lower: Level,
        horde_upper: Level,
    },

    /// Global minimum above global maximum
    #[error("Invalid random bot level bounds: min {min} is above max {max}")]
    InvalidLevelBounds { min: Level, max: Level },

    /// A setting could not be parsed
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    /// JSON parse failure
    #[error("Failed to parse brackets config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Config file could not be read
    #[error("Failed to read brackets config from {path:?}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ConfigError {
    pub(crate) fn invalid(key: &str, value: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.into(),
        }
    }
}
