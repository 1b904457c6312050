//! Keyword-to-candidate scoring
//!
//! Scores are built from one base tier plus an optional chapter boost:
//!
//! | tier      | condition                      | base score               |
//! |-----------|--------------------------------|--------------------------|
//! | exact     | term == keyword                | `weights.exact`          |
//! | substring | term contains keyword          | `weights.substring`      |
//! | fuzzy     | otherwise                      | `similarity * weights.fuzzy` |
//!
//! Keyword and term are trimmed and lowercased before comparison. The chapter
//! boost (`weights.prefix_boost`) is added once when the candidate code starts
//! with any preferred prefix.

use crate::config::ScoringWeights;
use crate::error::ConfigResult;
use crate::text::{normalize, similarity};
use crate::types::CandidateCode;

/// Context shared by every candidate scored for one keyword.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringContext<'a> {
    /// Code prefixes (ICPC-2 chapters such as `T` or `K`) to favour
    pub preferred_prefixes: &'a [String],
}

impl<'a> ScoringContext<'a> {
    pub fn new(preferred_prefixes: &'a [String]) -> Self {
        Self { preferred_prefixes }
    }
}

/// Scores one keyword against one candidate. Implementations must be pure.
pub trait CandidateScorer: Send + Sync {
    fn score(&self, keyword: &str, candidate: &CandidateCode, context: &ScoringContext<'_>) -> f64;
}

/// Exact/substring/fuzzy scorer with configurable weights
#[derive(Debug, Clone)]
pub struct WeightedScorer {
    weights: ScoringWeights,
}

impl WeightedScorer {
    /// Create a scorer, failing fast on invalid weights.
    pub fn new(weights: ScoringWeights) -> ConfigResult<Self> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    fn base_score(&self, keyword: &str, term: &str) -> f64 {
        if term == keyword {
            self.weights.exact
        } else if term.contains(keyword) {
            self.weights.substring
        } else {
            similarity(keyword, term) * self.weights.fuzzy
        }
    }

    fn prefix_boost(&self, code: &str, context: &ScoringContext<'_>) -> f64 {
        let boosted = context
            .preferred_prefixes
            .iter()
            .filter(|prefix| !prefix.is_empty())
            .any(|prefix| code.starts_with(prefix.as_str()));

        if boosted {
            self.weights.prefix_boost
        } else {
            0.0
        }
    }
}

impl Default for WeightedScorer {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }
}

impl CandidateScorer for WeightedScorer {
    fn score(&self, keyword: &str, candidate: &CandidateCode, context: &ScoringContext<'_>) -> f64 {
        let keyword = normalize(keyword);
        let term = normalize(&candidate.term);

        self.base_score(&keyword, &term) + self.prefix_boost(&candidate.code, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    fn score(keyword: &str, code: &str, term: &str, prefixes: &[String]) -> f64 {
        WeightedScorer::default().score(
            keyword,
            &CandidateCode::new(code, term),
            &ScoringContext::new(prefixes),
        )
    }

    #[test]
    fn test_exact_match_after_normalization() {
        assert_eq!(score(" Diabetes ", "T90", "DIABETES", &[]), 100.0);
    }

    #[test]
    fn test_substring_match() {
        assert_eq!(score("diabetes", "T90", "Diabetes mellitus type 2", &[]), 80.0);
    }

    #[test]
    fn test_fuzzy_match_is_scaled_similarity() {
        let fuzzy = score("diabetes", "T90", "diabetisk", &[]);
        let expected = similarity("diabetes", "diabetisk") * 10.0;
        assert!((fuzzy - expected).abs() < f64::EPSILON);
        assert!(fuzzy > 0.0 && fuzzy < 10.0);
    }

    #[test]
    fn test_tiers_rank_exact_over_substring_over_fuzzy() {
        let exact = score("diabetes", "T90", "diabetes", &[]);
        let substring = score("diabetes", "T90", "diabetes mellitus type 2", &[]);
        let fuzzy = score("diabetes", "T90", "diabetisk", &[]);
        assert!(exact > substring);
        assert!(substring > fuzzy);
    }

    #[test]
    fn test_prefix_boost_applied_once() {
        let one = vec!["T".to_string()];
        let two = vec!["T".to_string(), "T9".to_string()];

        let base = score("hodepine", "T90", "hodepine", &[]);
        let boosted_once = score("hodepine", "T90", "hodepine", &one);
        let boosted_twice = score("hodepine", "T90", "hodepine", &two);

        assert_eq!(boosted_once, base + 30.0);
        assert_eq!(boosted_twice, boosted_once);
    }

    #[test]
    fn test_prefix_boost_ignores_other_chapters_and_blank_prefixes() {
        let prefixes = vec!["K".to_string(), String::new()];
        assert_eq!(score("hodepine", "N01", "hodepine", &prefixes), 100.0);
    }

    #[test]
    fn test_custom_weights() {
        let scorer =
            WeightedScorer::new(ScoringWeights::default().with_substring(50.0)).unwrap();
        let value = scorer.score(
            "astma",
            &CandidateCode::new("R96", "Astma bronkiale"),
            &ScoringContext::default(),
        );
        assert_eq!(value, 50.0);
    }

    #[test]
    fn test_new_rejects_invalid_weights() {
        let result = WeightedScorer::new(ScoringWeights::default().with_substring(-5.0));
        assert_eq!(
            result.unwrap_err(),
            ConfigError::invalid_weight("substring", -5.0)
        );
    }
}
