//! Code suggestion pipeline
//!
//! Keywords are searched concurrently in a [`CodeRegistry`], ranked with the
//! [`KeywordMatcher`] and merged with the codes the doctor entered.

use futures_util::future::join_all;
use icpcmap_core::{CandidateCode, KeywordMatcher, MatchOptions};
use indexmap::IndexMap;
use serde::Serialize;

use crate::config::SuggestConfig;
use crate::error::TerminologyError;
use crate::registry::DynCodeRegistry;

/// Description used when the registry knows nothing about a code
pub const NO_DESCRIPTION: &str = "(no description)";

/// Where a suggested code came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SuggestionSource {
    /// Entered by the doctor
    DoctorInput,
    /// Proposed by keyword matching
    Suggested,
}

impl SuggestionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DoctorInput => "doctor",
            Self::Suggested => "suggested",
        }
    }
}

/// A code proposed to the clinician
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub code: String,
    pub description: String,
    pub source: SuggestionSource,

    /// First keyword whose best matches include the code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

/// Turns note keywords into ICPC-2 code suggestions.
pub struct CodeSuggester {
    registry: DynCodeRegistry,
    matcher: KeywordMatcher,
    options: MatchOptions,
    per_keyword: usize,
}

impl CodeSuggester {
    pub fn new(
        registry: DynCodeRegistry,
        matcher: KeywordMatcher,
        config: SuggestConfig,
    ) -> Result<Self, TerminologyError> {
        config.validate()?;

        let mut options = MatchOptions::new().with_preferred_prefixes(config.preferred_prefixes);
        if let Some(min_score) = config.min_score {
            options = options.with_min_score(min_score);
        }

        Ok(Self {
            registry,
            matcher,
            options,
            per_keyword: config.per_keyword,
        })
    }

    pub fn matcher(&self) -> &KeywordMatcher {
        &self.matcher
    }

    /// Doctor codes first, in input order, then the best matches per keyword
    /// that are not already present.
    ///
    /// A code matched by a keyword is described by the first matched term,
    /// doctor codes included. Other doctor codes keep the registry
    /// description.
    pub async fn suggest(&self, keywords: &[String], doctor_codes: &[String]) -> Vec<Suggestion> {
        let mut suggestions: IndexMap<String, Suggestion> = IndexMap::new();

        for code in doctor_codes {
            let code = code.trim().to_uppercase();
            if code.is_empty() || suggestions.contains_key(&code) {
                continue;
            }
            let description = self
                .registry
                .describe(&code)
                .await
                .unwrap_or_else(|| NO_DESCRIPTION.to_string());
            suggestions.insert(
                code.clone(),
                Suggestion {
                    code,
                    description,
                    source: SuggestionSource::DoctorInput,
                    keyword: None,
                },
            );
        }

        let searches = keywords.iter().map(|keyword| async move {
            if keyword.trim().is_empty() || self.matcher.is_stop_word(keyword) {
                return Vec::new();
            }
            self.registry.search_candidates(keyword).await
        });
        let results: Vec<Vec<CandidateCode>> = join_all(searches).await;

        for (keyword, candidates) in keywords.iter().zip(&results) {
            let ranked = self
                .matcher
                .match_keyword_to_codes(keyword, candidates, &self.options);

            tracing::debug!(
                keyword = %keyword,
                candidates = candidates.len(),
                matched = ranked.len(),
                "Matched keyword"
            );

            for candidate in ranked.into_iter().take(self.per_keyword) {
                let code = candidate.code.to_uppercase();
                match suggestions.get_mut(&code) {
                    Some(existing) => {
                        if existing.keyword.is_none() {
                            existing.description = candidate.term.clone();
                            existing.keyword = Some(keyword.trim().to_string());
                        }
                    }
                    None => {
                        suggestions.insert(
                            code.clone(),
                            Suggestion {
                                code,
                                description: candidate.term.clone(),
                                source: SuggestionSource::Suggested,
                                keyword: Some(keyword.trim().to_string()),
                            },
                        );
                    }
                }
            }
        }

        suggestions.into_values().collect()
    }
}
