//! Core matching logic for icpcmap
//!
//! This crate is free of I/O and provides:
//! - The candidate/mapping data model shared by all icpcmap crates
//! - Weighted scoring of a keyword against a candidate term
//! - Ranking of a candidate set for one keyword, with stop-word handling
//! - Parsing of keyword replies and doctor-entered ICPC-2 codes

pub mod config;
pub mod error;
pub mod keywords;
pub mod matcher;
pub mod scoring;
pub mod text;
pub mod types;

pub use config::{MatcherConfig, ScoringWeights};
pub use error::{ConfigError, KeywordParseError};
pub use keywords::{parse_doctor_codes, parse_keyword_json, parse_keyword_list, parse_keywords};
pub use matcher::{KeywordMatcher, MatchOptions};
pub use scoring::{CandidateScorer, ScoringContext, WeightedScorer};
pub use types::{CandidateCode, Mapping, ResolvedMapping, ScoredCandidate};
