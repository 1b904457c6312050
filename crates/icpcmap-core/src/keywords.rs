//! Keyword extraction from language-model replies and doctor code parsing
//!
//! Two reply formats are understood:
//! - a JSON object embedded anywhere in the reply: `{ "keywords": ["...", ...] }`
//! - a plain comma- or newline-separated list, optionally with bullets or numbering

use std::sync::LazyLock;

use regex::Regex;

use crate::error::KeywordParseError;

static LIST_BULLET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\s\-\d\.]+").expect("Invalid list bullet regex"));

static LIST_SEPARATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,\n]+").expect("Invalid list separator regex"));

static JSON_OBJECT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[\s\S]*\}").expect("Invalid JSON object regex"));

static ICPC_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][0-9]{2}$").expect("Invalid ICPC-2 code regex"));

/// Split a comma/newline separated reply into keywords.
///
/// Leading whitespace, dashes, digits and dots are stripped from each item so
/// that `1. hodepine` and `- hodepine` both yield `hodepine`.
pub fn parse_keyword_list(reply: &str) -> Vec<String> {
    let reply = reply.replace("\r\n", "\n").replace('\r', "\n");

    LIST_SEPARATOR_REGEX
        .split(&reply)
        .map(|item| LIST_BULLET_REGEX.replace(item, "").trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Extract the `keywords` array from a JSON object embedded in a reply.
pub fn parse_keyword_json(reply: &str) -> Result<Vec<String>, KeywordParseError> {
    let object = JSON_OBJECT_REGEX
        .find(reply)
        .ok_or(KeywordParseError::NoJsonObject)?;

    let parsed: serde_json::Value = serde_json::from_str(object.as_str())?;
    let keywords = parsed
        .get("keywords")
        .and_then(|k| k.as_array())
        .ok_or(KeywordParseError::MissingKeywords)?;

    Ok(keywords
        .iter()
        .filter_map(|k| k.as_str())
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .collect())
}

/// Parse a reply in either format, preferring the JSON form.
pub fn parse_keywords(reply: &str) -> Vec<String> {
    match parse_keyword_json(reply) {
        Ok(keywords) => keywords,
        Err(e) => {
            tracing::debug!(error = %e, "Reply is not a JSON keyword object, parsing as list");
            parse_keyword_list(reply)
        }
    }
}

/// Extract ICPC-2 codes (`A01` style) typed by the doctor.
///
/// Input is uppercased and split on whitespace; anything that is not a
/// chapter letter followed by two digits is ignored. Order is kept and
/// duplicates are dropped.
pub fn parse_doctor_codes(input: &str) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    for token in input.to_uppercase().split_whitespace() {
        if ICPC_CODE_REGEX.is_match(token) && !codes.iter().any(|c| c == token) {
            codes.push(token.to_string());
        }
    }
    codes
}
