//! Ranking of candidate codes for a single keyword

use std::collections::HashSet;

use crate::config::MatcherConfig;
use crate::error::{ConfigError, ConfigResult};
use crate::scoring::{CandidateScorer, ScoringContext, WeightedScorer};
use crate::text::normalize;
use crate::types::{CandidateCode, ScoredCandidate};

/// Per-call options for [`KeywordMatcher::match_keyword_to_codes`]
#[derive(Debug, Clone, Default)]
pub struct MatchOptions {
    /// Code prefixes to boost (ICPC-2 chapters)
    pub preferred_prefixes: Vec<String>,

    /// Drop candidates scoring below this value
    pub min_score: Option<f64>,

    /// Keep at most this many candidates
    pub max_results: Option<usize>,
}

impl MatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_preferred_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferred_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = Some(min_score);
        self
    }

    #[must_use]
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }
}

/// Scores and ranks candidates for one keyword.
///
/// Results only ever borrow from the input slice: the matcher reorders and
/// filters, it never produces new candidates.
#[derive(Debug, Clone)]
pub struct KeywordMatcher<S = WeightedScorer> {
    scorer: S,
    stop_words: HashSet<String>,
}

impl KeywordMatcher<WeightedScorer> {
    /// Create a matcher with the weighted scorer described by `config`.
    pub fn new(config: MatcherConfig) -> ConfigResult<Self> {
        let scorer = WeightedScorer::new(config.weights)?;
        Self::with_scorer(scorer, config.stop_words)
    }
}

impl Default for KeywordMatcher<WeightedScorer> {
    fn default() -> Self {
        let config = MatcherConfig::default();
        Self {
            scorer: WeightedScorer::default(),
            stop_words: config.stop_words.iter().map(|w| normalize(w)).collect(),
        }
    }
}

impl<S: CandidateScorer> KeywordMatcher<S> {
    /// Create a matcher around a custom scorer.
    pub fn with_scorer<I, W>(scorer: S, stop_words: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        let mut normalized = HashSet::new();
        for word in stop_words {
            let word = normalize(word.as_ref());
            if word.is_empty() {
                return Err(ConfigError::BlankStopWord);
            }
            normalized.insert(word);
        }

        Ok(Self {
            scorer,
            stop_words: normalized,
        })
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Check whether a keyword is a stop word (case-insensitive, trimmed).
    pub fn is_stop_word(&self, keyword: &str) -> bool {
        self.stop_words.contains(&normalize(keyword))
    }

    /// Rank `candidates` for `keyword`, best first.
    ///
    /// Returns an empty list for stop words and blank keywords without
    /// scoring anything.
    pub fn match_keyword_to_codes<'a>(
        &self,
        keyword: &str,
        candidates: &'a [CandidateCode],
        options: &MatchOptions,
    ) -> Vec<&'a CandidateCode> {
        self.match_scored(keyword, candidates, options)
            .into_iter()
            .map(|scored| scored.candidate)
            .collect()
    }

    /// Like [`match_keyword_to_codes`](Self::match_keyword_to_codes) but keeps
    /// the scores.
    pub fn match_scored<'a>(
        &self,
        keyword: &str,
        candidates: &'a [CandidateCode],
        options: &MatchOptions,
    ) -> Vec<ScoredCandidate<'a>> {
        let keyword = normalize(keyword);
        if keyword.is_empty() || self.stop_words.contains(&keyword) {
            tracing::debug!(keyword = %keyword, "Skipping stop word");
            return Vec::new();
        }

        let context = ScoringContext::new(&options.preferred_prefixes);
        let mut scored: Vec<ScoredCandidate<'a>> = candidates
            .iter()
            .map(|candidate| ScoredCandidate {
                candidate,
                score: self.scorer.score(&keyword, candidate, &context),
            })
            .collect();

        // Stable: equal scores keep input order
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));

        for entry in &scored {
            tracing::trace!(
                keyword = %keyword,
                code = %entry.candidate.code,
                score = entry.score,
                "Scored candidate"
            );
        }

        if let Some(min_score) = options.min_score {
            scored.retain(|entry| entry.score >= min_score);
        }
        if let Some(max_results) = options.max_results {
            scored.truncate(max_results);
        }

        tracing::debug!(
            keyword = %keyword,
            candidates = candidates.len(),
            matched = scored.len(),
            "Matched keyword to codes"
        );

        scored
    }
}
