//! Error types for icpcmap core

use thiserror::Error;

/// Result type for configuration-time operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Invalid matcher or scoring configuration.
///
/// These represent programmer error and are raised when a scorer or matcher
/// is constructed, never while matching.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A weight is negative, NaN or infinite
    #[error("Invalid weight `{name}`: {value}")]
    InvalidWeight { name: &'static str, value: f64 },

    /// A similarity threshold lies outside `[0, 1]`
    #[error("Invalid threshold `{name}`: {value} (expected a value in [0, 1])")]
    InvalidThreshold { name: &'static str, value: f64 },

    /// A result limit is zero
    #[error("Invalid limit `{0}`: must be greater than zero")]
    InvalidLimit(&'static str),

    /// A timeout is zero
    #[error("Invalid timeout `{0}`: must be greater than zero")]
    InvalidTimeout(&'static str),

    /// A stop word is empty after normalization
    #[error("Stop word set contains a blank entry")]
    BlankStopWord,
}

/// Errors raised while extracting keywords from a language-model reply
#[derive(Debug, Error)]
pub enum KeywordParseError {
    #[error("No JSON object found in reply")]
    NoJsonObject,

    #[error("Invalid JSON in reply: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Reply does not contain a `keywords` string array")]
    MissingKeywords,
}

impl ConfigError {
    /// Create a new InvalidWeight error
    pub fn invalid_weight(name: &'static str, value: f64) -> Self {
        Self::InvalidWeight { name, value }
    }

    /// Create a new InvalidThreshold error
    pub fn invalid_threshold(name: &'static str, value: f64) -> Self {
        Self::InvalidThreshold { name, value }
    }
}
