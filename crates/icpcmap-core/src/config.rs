//! Scoring and matcher configuration

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Weights used by [`WeightedScorer`](crate::scoring::WeightedScorer).
///
/// Exact, substring and fuzzy weights are alternative base scores (the first
/// tier that applies wins); `prefix_boost` is added on top at most once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Term equals keyword (default: 100)
    #[serde(default = "default_exact")]
    pub exact: f64,

    /// Term contains keyword (default: 80)
    #[serde(default = "default_substring")]
    pub substring: f64,

    /// Multiplier for the bigram similarity in `[0, 1]` (default: 10)
    #[serde(default = "default_fuzzy")]
    pub fuzzy: f64,

    /// Added when the code starts with a preferred prefix (default: 30)
    #[serde(default = "default_prefix_boost")]
    pub prefix_boost: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            exact: default_exact(),
            substring: default_substring(),
            fuzzy: default_fuzzy(),
            prefix_boost: default_prefix_boost(),
        }
    }
}

impl ScoringWeights {
    #[must_use]
    pub fn with_exact(mut self, weight: f64) -> Self {
        self.exact = weight;
        self
    }

    #[must_use]
    pub fn with_substring(mut self, weight: f64) -> Self {
        self.substring = weight;
        self
    }

    #[must_use]
    pub fn with_fuzzy(mut self, weight: f64) -> Self {
        self.fuzzy = weight;
        self
    }

    #[must_use]
    pub fn with_prefix_boost(mut self, weight: f64) -> Self {
        self.prefix_boost = weight;
        self
    }

    /// Reject negative, NaN and infinite weights.
    pub fn validate(&self) -> ConfigResult<()> {
        for (name, value) in [
            ("exact", self.exact),
            ("substring", self.substring),
            ("fuzzy", self.fuzzy),
            ("prefix_boost", self.prefix_boost),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid_weight(name, value));
            }
        }
        Ok(())
    }
}

/// Configuration for the [`KeywordMatcher`](crate::matcher::KeywordMatcher)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    #[serde(default)]
    pub weights: ScoringWeights,

    /// Keywords too generic to search on (compared case-insensitively)
    #[serde(default = "default_stop_words")]
    pub stop_words: Vec<String>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            stop_words: default_stop_words(),
        }
    }
}

impl MatcherConfig {
    #[must_use]
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    #[must_use]
    pub fn with_stop_words<I, S>(mut self, stop_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop_words = stop_words.into_iter().map(Into::into).collect();
        self
    }
}

fn default_exact() -> f64 {
    100.0
}

fn default_substring() -> f64 {
    80.0
}

fn default_fuzzy() -> f64 {
    10.0
}

fn default_prefix_boost() -> f64 {
    30.0
}

fn default_stop_words() -> Vec<String> {
    ["aktivitet", "diagnose", "plan", "analyse"]
        .into_iter()
        .map(String::from)
        .collect()
}
