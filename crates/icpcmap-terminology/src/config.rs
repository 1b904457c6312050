//! Terminology, registry and suggestion configuration

use std::time::Duration;

use icpcmap_core::ConfigError;
use serde::{Deserialize, Serialize};

/// Default terminology server (FAT, Norwegian Directorate of Health)
const DEFAULT_TERMINOLOGY_SERVER: &str = "https://fat.kote.helsedirektoratet.no";

/// Configuration for the remote terminology service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminologyConfig {
    /// Base URL of the terminology server
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Path of the free-text code search endpoint, relative to `server_url`
    #[serde(default = "default_search_path")]
    pub search_path: String,

    /// Query parameter carrying the search term
    #[serde(default = "default_search_param")]
    pub search_param: String,

    /// Coding system a concept mapping must target (default: ICPC-2)
    #[serde(default = "default_target_system")]
    pub target_system: String,

    /// Value of the `Accept-Language` header (default: nb)
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// HTTP request timeout (ms)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// Upper bound for one concept lookup in the resolver (ms)
    #[serde(default = "default_lookup_timeout")]
    pub lookup_timeout_ms: u64,
}

impl Default for TerminologyConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            search_path: default_search_path(),
            search_param: default_search_param(),
            target_system: default_target_system(),
            accept_language: default_accept_language(),
            request_timeout_ms: default_request_timeout(),
            lookup_timeout_ms: default_lookup_timeout(),
        }
    }
}

impl TerminologyConfig {
    #[must_use]
    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }

    #[must_use]
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Reject zero timeouts, which would make every lookup fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout("request_timeout_ms"));
        }
        if self.lookup_timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout("lookup_timeout_ms"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }
}

/// Configuration for [`LocalRegistry`](crate::local::LocalRegistry) search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalRegistryConfig {
    /// Minimum similarity for the fuzzy fallback pass (default: 0.3)
    #[serde(default = "default_fuzzy_floor")]
    pub fuzzy_floor: f64,

    /// Maximum number of fuzzy fallback results (default: 5)
    #[serde(default = "default_fuzzy_limit")]
    pub fuzzy_limit: usize,

    /// Search each whitespace- or slash-separated token of the keyword
    #[serde(default)]
    pub split_terms: bool,
}

impl Default for LocalRegistryConfig {
    fn default() -> Self {
        Self {
            fuzzy_floor: default_fuzzy_floor(),
            fuzzy_limit: default_fuzzy_limit(),
            split_terms: false,
        }
    }
}

impl LocalRegistryConfig {
    #[must_use]
    pub fn with_split_terms(mut self, split_terms: bool) -> Self {
        self.split_terms = split_terms;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.fuzzy_floor) {
            return Err(ConfigError::invalid_threshold("fuzzy_floor", self.fuzzy_floor));
        }
        if self.fuzzy_limit == 0 {
            return Err(ConfigError::InvalidLimit("fuzzy_limit"));
        }
        Ok(())
    }
}

/// Configuration for [`CodeSuggester`](crate::suggest::CodeSuggester).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestConfig {
    /// Best matches kept per keyword (default: 1)
    #[serde(default = "default_per_keyword")]
    pub per_keyword: usize,

    /// Minimum match score for a suggestion
    #[serde(default)]
    pub min_score: Option<f64>,

    /// ICPC-2 chapters to favour, e.g. `["T", "K"]`
    #[serde(default)]
    pub preferred_prefixes: Vec<String>,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            per_keyword: default_per_keyword(),
            min_score: None,
            preferred_prefixes: Vec::new(),
        }
    }
}

impl SuggestConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.per_keyword == 0 {
            return Err(ConfigError::InvalidLimit("per_keyword"));
        }
        if let Some(min_score) = self.min_score
            && !min_score.is_finite()
        {
            return Err(ConfigError::invalid_weight("min_score", min_score));
        }
        Ok(())
    }
}

fn default_server_url() -> String {
    DEFAULT_TERMINOLOGY_SERVER.to_string()
}

fn default_search_path() -> String {
    "api/icpc2/search".to_string()
}

fn default_search_param() -> String {
    "term".to_string()
}

fn default_target_system() -> String {
    "ICPC-2".to_string()
}

fn default_accept_language() -> String {
    "nb".to_string()
}

fn default_request_timeout() -> u64 {
    10_000
}

fn default_lookup_timeout() -> u64 {
    10_000
}

fn default_fuzzy_floor() -> f64 {
    0.3
}

fn default_fuzzy_limit() -> usize {
    5
}

fn default_per_keyword() -> usize {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminology_config_defaults() {
        let config = TerminologyConfig::default();
        assert_eq!(config.server_url, "https://fat.kote.helsedirektoratet.no");
        assert_eq!(config.target_system, "ICPC-2");
        assert_eq!(config.accept_language, "nb");
        assert_eq!(config.lookup_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_terminology_config_partial_json() {
        let config: TerminologyConfig =
            serde_json::from_str(r#"{ "server_url": "http://localhost:9000" }"#).unwrap();
        assert_eq!(config.server_url, "http://localhost:9000");
        assert_eq!(config.search_param, "term");
        assert_eq!(config.request_timeout_ms, 10_000);
    }

    #[test]
    fn test_terminology_config_rejects_zero_timeouts() {
        assert!(TerminologyConfig::default().validate().is_ok());

        let request = TerminologyConfig {
            request_timeout_ms: 0,
            ..Default::default()
        };
        assert_eq!(
            request.validate(),
            Err(ConfigError::InvalidTimeout("request_timeout_ms"))
        );

        let lookup = TerminologyConfig::default().with_lookup_timeout(Duration::ZERO);
        assert_eq!(
            lookup.validate(),
            Err(ConfigError::InvalidTimeout("lookup_timeout_ms"))
        );
    }

    #[test]
    fn test_with_lookup_timeout_saturates() {
        let config = TerminologyConfig::default().with_lookup_timeout(Duration::MAX);
        assert_eq!(config.lookup_timeout_ms, u64::MAX);

        let config = TerminologyConfig::default().with_lookup_timeout(Duration::from_secs(3));
        assert_eq!(config.lookup_timeout_ms, 3_000);
    }

    #[test]
    fn test_local_registry_config_validation() {
        assert!(LocalRegistryConfig::default().validate().is_ok());

        let floor = LocalRegistryConfig {
            fuzzy_floor: 1.5,
            ..Default::default()
        };
        assert_eq!(
            floor.validate(),
            Err(ConfigError::invalid_threshold("fuzzy_floor", 1.5))
        );

        let limit = LocalRegistryConfig {
            fuzzy_limit: 0,
            ..Default::default()
        };
        assert_eq!(limit.validate(), Err(ConfigError::InvalidLimit("fuzzy_limit")));
    }

    #[test]
    fn test_suggest_config_validation() {
        assert!(SuggestConfig::default().validate().is_ok());

        let zero = SuggestConfig {
            per_keyword: 0,
            ..Default::default()
        };
        assert_eq!(zero.validate(), Err(ConfigError::InvalidLimit("per_keyword")));
    }
}
