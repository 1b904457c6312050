//! Error types for terminology access

use icpcmap_core::ConfigError;
use thiserror::Error;

/// Failure of a single terminology lookup.
///
/// Lookup errors are recovered at the registry/resolver boundary and never
/// reach callers of the matching pipeline.
#[derive(Debug, Clone, Error)]
pub enum LookupError {
    /// Connection, TLS or body transfer failure
    #[error("Network error: {0}")]
    Transport(String),

    /// The lookup did not complete in time
    #[error("Lookup timeout: {0}")]
    Timeout(String),

    /// The service answered with a non-success status
    #[error("HTTP error: status {status} from {url}")]
    Status { url: String, status: u16 },

    /// The response body could not be decoded
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// A request URL could not be built
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

impl LookupError {
    /// Transient failures may succeed on retry and are not cached.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_))
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Errors raised while constructing registries, clients and suggesters.
#[derive(Debug, Error)]
pub enum TerminologyError {
    #[error("Invalid terminology server URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to create HTTP client: {0}")]
    HttpClientError(String),

    #[error("Failed to read code registry: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse code registry: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unsupported code registry format: {0}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
