//! Local ICPC-2 code table
//!
//! Search runs in two passes:
//! 1. Strict: entries whose name, short text, inclusion or more-info text
//!    contains the keyword, unless the exclusion text also contains it
//! 2. Fuzzy fallback (only when the strict pass is empty): bigram similarity
//!    against name and short text, kept above `fuzzy_floor`, best first,
//!    capped at `fuzzy_limit`
//!
//! Both passes deduplicate by code.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use async_trait::async_trait;
use icpcmap_core::CandidateCode;
use icpcmap_core::text::{normalize, similarity};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::LocalRegistryConfig;
use crate::error::TerminologyError;
use crate::registry::CodeRegistry;

/// One row of the ICPC-2 code table.
///
/// Field names follow the Directorate of Health JSON export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryEntry {
    #[serde(rename = "codeValue", alias = "code", default)]
    pub code: String,

    /// Full Norwegian name
    #[serde(rename = "nameNorwegian", default)]
    pub name: Option<String>,

    /// Display text of at most 60 characters
    #[serde(rename = "textMax60", default)]
    pub short_text: Option<String>,

    #[serde(default)]
    pub inclusion: Option<String>,

    #[serde(default)]
    pub exclusion: Option<String>,

    #[serde(rename = "moreInfo", default)]
    pub more_info: Option<String>,
}

impl RegistryEntry {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Text shown for the entry: short text, falling back to the full name.
    pub fn display_term(&self) -> Option<&str> {
        non_blank(self.short_text.as_deref()).or_else(|| non_blank(self.name.as_deref()))
    }
}

/// Top-level layout of a registry JSON file
#[derive(Deserialize)]
#[serde(untagged)]
enum RegistryFile {
    Wrapped { data: Vec<Value> },
    Bare(Vec<Value>),
}

/// Entry with its search fields lowercased once at load time
#[derive(Debug, Clone)]
struct IndexedEntry {
    entry: RegistryEntry,
    term: String,
    name: String,
    short_text: String,
    inclusion: String,
    exclusion: String,
    more_info: String,
}

impl IndexedEntry {
    fn new(mut entry: RegistryEntry) -> Option<Self> {
        entry.code = entry.code.trim().to_string();
        if entry.code.is_empty() {
            return None;
        }
        let term = entry.display_term()?.trim().to_string();
        let lower = |field: &Option<String>| field.as_deref().map(normalize).unwrap_or_default();

        Some(Self {
            term,
            name: lower(&entry.name),
            short_text: lower(&entry.short_text),
            inclusion: lower(&entry.inclusion),
            exclusion: lower(&entry.exclusion),
            more_info: lower(&entry.more_info),
            entry,
        })
    }

    fn matches_strict(&self, token: &str) -> bool {
        !self.exclusion.contains(token)
            && (self.name.contains(token)
                || self.short_text.contains(token)
                || self.inclusion.contains(token)
                || self.more_info.contains(token))
    }

    fn fuzzy_score(&self, token: &str) -> f64 {
        similarity(token, &self.name).max(similarity(token, &self.short_text))
    }

    fn candidate(&self) -> CandidateCode {
        CandidateCode::new(self.entry.code.clone(), self.term.clone())
    }
}

/// Preloaded ICPC-2 table searched in memory.
#[derive(Debug, Clone)]
pub struct LocalRegistry {
    entries: Vec<IndexedEntry>,
    by_code: HashMap<String, usize>,
    config: LocalRegistryConfig,
}

impl LocalRegistry {
    /// Build a registry from table rows.
    ///
    /// Rows without a code or without any display text are dropped.
    pub fn new(
        entries: impl IntoIterator<Item = RegistryEntry>,
        config: LocalRegistryConfig,
    ) -> Result<Self, TerminologyError> {
        config.validate()?;

        let entries: Vec<IndexedEntry> = entries.into_iter().filter_map(IndexedEntry::new).collect();
        let mut by_code = HashMap::new();
        for (index, indexed) in entries.iter().enumerate() {
            by_code.entry(indexed.entry.code.to_uppercase()).or_insert(index);
        }

        tracing::debug!(entries = entries.len(), "Loaded local code registry");

        Ok(Self {
            entries,
            by_code,
            config,
        })
    }

    /// Build a registry from a plain `code -> description` table.
    pub fn from_descriptions<I, C, D>(
        descriptions: I,
        config: LocalRegistryConfig,
    ) -> Result<Self, TerminologyError>
    where
        I: IntoIterator<Item = (C, D)>,
        C: Into<String>,
        D: Into<String>,
    {
        Self::new(
            descriptions
                .into_iter()
                .map(|(code, description)| RegistryEntry::new(code, description)),
            config,
        )
    }

    /// Parse a JSON registry: `{"data": [...]}` or a bare array of rows.
    ///
    /// Rows that do not decode are skipped.
    pub fn from_json_str(json: &str, config: LocalRegistryConfig) -> Result<Self, TerminologyError> {
        let rows = match serde_json::from_str::<RegistryFile>(json) {
            Ok(RegistryFile::Wrapped { data }) | Ok(RegistryFile::Bare(data)) => data,
            Err(_) => {
                // Surface the real syntax error if the document is not JSON at all
                serde_json::from_str::<Value>(json)?;
                return Err(TerminologyError::UnsupportedFormat(
                    "expected an array of entries or an object with a `data` array".to_string(),
                ));
            }
        };

        let total = rows.len();
        let entries: Vec<RegistryEntry> = rows
            .into_iter()
            .filter_map(|row| serde_json::from_value(row).ok())
            .collect();
        if entries.len() < total {
            tracing::warn!(
                skipped = total - entries.len(),
                "Skipped malformed code registry rows"
            );
        }

        Self::new(entries, config)
    }

    /// Load a JSON registry file.
    pub fn load(path: impl AsRef<Path>, config: LocalRegistryConfig) -> Result<Self, TerminologyError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        tracing::info!(path = %path.display(), "Loading code registry");
        Self::from_json_str(&content, config)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by code, case-insensitively.
    pub fn get(&self, code: &str) -> Option<&RegistryEntry> {
        self.by_code
            .get(&code.trim().to_uppercase())
            .map(|&index| &self.entries[index].entry)
    }

    /// Search the table for a keyword.
    pub fn search(&self, keyword: &str) -> Vec<CandidateCode> {
        let keyword = normalize(keyword);
        if keyword.is_empty() {
            return Vec::new();
        }

        let tokens: Vec<&str> = if self.config.split_terms {
            keyword
                .split(|c: char| c.is_whitespace() || c == '/')
                .filter(|t| !t.is_empty())
                .collect()
        } else {
            vec![keyword.as_str()]
        };

        let strict = self.strict_pass(&tokens);
        if !strict.is_empty() {
            tracing::debug!(keyword = %keyword, results = strict.len(), "Strict registry matches");
            return strict;
        }

        let fuzzy = self.fuzzy_pass(&tokens);
        tracing::debug!(keyword = %keyword, results = fuzzy.len(), "Fuzzy registry fallback");
        fuzzy
    }

    fn strict_pass(&self, tokens: &[&str]) -> Vec<CandidateCode> {
        let mut seen = HashSet::new();
        let mut results = Vec::new();
        for token in tokens {
            for indexed in &self.entries {
                if indexed.matches_strict(token) && seen.insert(indexed.entry.code.as_str()) {
                    results.push(indexed.candidate());
                }
            }
        }
        results
    }

    fn fuzzy_pass(&self, tokens: &[&str]) -> Vec<CandidateCode> {
        let mut scored: Vec<(&IndexedEntry, f64)> = Vec::new();
        for token in tokens {
            for indexed in &self.entries {
                let score = indexed.fuzzy_score(token);
                if score >= self.config.fuzzy_floor {
                    scored.push((indexed, score));
                }
            }
        }
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut seen = HashSet::new();
        scored
            .into_iter()
            .filter(|(indexed, _)| seen.insert(indexed.entry.code.as_str()))
            .take(self.config.fuzzy_limit)
            .map(|(indexed, _)| indexed.candidate())
            .collect()
    }
}

#[async_trait]
impl CodeRegistry for LocalRegistry {
    async fn search_candidates(&self, term: &str) -> Vec<CandidateCode> {
        self.search(term)
    }

    async fn describe(&self, code: &str) -> Option<String> {
        let entry = self.get(code)?;
        non_blank(entry.name.as_deref())
            .or_else(|| entry.display_term())
            .map(|text| text.trim().to_string())
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}
