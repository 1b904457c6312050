//! Shared data model: candidates, scored candidates and mappings

use serde::{Deserialize, Serialize};

/// One terminology entry eligible for matching (e.g. an ICPC-2 code and its text).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateCode {
    pub code: String,
    pub term: String,
}

impl CandidateCode {
    pub fn new(code: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            term: term.into(),
        }
    }
}

/// A candidate paired with the score it received for one keyword.
///
/// Borrows the candidate so that ranked output always refers back to the
/// caller's input.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScoredCandidate<'a> {
    pub candidate: &'a CandidateCode,
    pub score: f64,
}

/// Association from a concept to a code in the target classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mapping {
    /// Target coding system, e.g. `ICPC-2`
    pub system: String,

    /// Code in the target system, e.g. `T90`
    pub target_code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,

    /// Remaining fields of the terminology service payload, kept verbatim
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Mapping {
    pub fn new(system: impl Into<String>, target_code: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            target_code: target_code.into(),
            display: None,
            extra: serde_json::Map::new(),
        }
    }

    #[must_use]
    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }
}

/// A mapping together with the concept it was found on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedMapping {
    pub mapping: Mapping,

    /// Concept that carried the mapping
    pub concept_id: String,

    /// Number of parent hops from the requested concept (0 = direct mapping)
    pub depth: usize,
}
