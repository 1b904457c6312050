//! Remote code search against the terminology service

use async_trait::async_trait;
use icpcmap_core::CandidateCode;
use serde::Deserialize;
use serde_json::Value;

use crate::client::TerminologyClient;
use crate::config::TerminologyConfig;
use crate::error::{LookupError, TerminologyError};
use crate::registry::CodeRegistry;

/// Known shapes of a search response
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SearchPayload {
    List(Vec<Value>),
    Wrapped(serde_json::Map<String, Value>),
}

impl SearchPayload {
    fn into_candidates(self) -> Vec<CandidateCode> {
        let rows = match self {
            Self::List(rows) => rows,
            Self::Wrapped(mut object) => ["items", "results", "data"]
                .iter()
                .find_map(|key| match object.remove(*key) {
                    Some(Value::Array(rows)) => Some(rows),
                    _ => None,
                })
                .unwrap_or_default(),
        };

        rows.iter().filter_map(candidate_from_value).collect()
    }
}

fn first_string<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

fn candidate_from_value(value: &Value) -> Option<CandidateCode> {
    let code = first_string(value, &["code", "codeValue"])?;
    let term = first_string(value, &["term", "display", "textMax60", "nameNorwegian"])?;
    Some(CandidateCode::new(code, term))
}

/// [`CodeRegistry`] that queries a remote search endpoint on every call.
///
/// Nothing is cached; failures are logged and yield no candidates.
#[derive(Debug, Clone)]
pub struct RemoteSearchRegistry {
    client: TerminologyClient,
    search_path: Vec<String>,
    search_param: String,
}

impl RemoteSearchRegistry {
    pub fn new(config: &TerminologyConfig) -> Result<Self, TerminologyError> {
        Ok(Self::with_client(TerminologyClient::new(config)?, config))
    }

    pub fn with_client(client: TerminologyClient, config: &TerminologyConfig) -> Self {
        Self {
            client,
            search_path: config
                .search_path
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(String::from)
                .collect(),
            search_param: config.search_param.clone(),
        }
    }

    async fn try_search(&self, term: &str) -> Result<Vec<CandidateCode>, LookupError> {
        let url = self
            .client
            .endpoint(self.search_path.iter().map(String::as_str))?;
        let body = self
            .client
            .get_json(url, &[(self.search_param.as_str(), term)])
            .await?;

        let payload: SearchPayload =
            serde_json::from_value(body).map_err(|e| LookupError::Decode(e.to_string()))?;
        Ok(payload.into_candidates())
    }
}

#[async_trait]
impl CodeRegistry for RemoteSearchRegistry {
    async fn search_candidates(&self, term: &str) -> Vec<CandidateCode> {
        let term = term.trim();
        if term.is_empty() {
            return Vec::new();
        }

        match self.try_search(term).await {
            Ok(candidates) => {
                tracing::debug!(term = %term, results = candidates.len(), "Remote code search");
                candidates
            }
            Err(e) => {
                tracing::warn!(term = %term, error = %e, "Remote code search failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: Value) -> Result<Vec<CandidateCode>, serde_json::Error> {
        serde_json::from_value::<SearchPayload>(value).map(SearchPayload::into_candidates)
    }

    #[test]
    fn test_bare_list() {
        let candidates = decode(json!([
            { "code": "T90", "term": "Diabetes type 2" },
            { "codeValue": "T89", "textMax60": "Diabetes type 1" }
        ]))
        .unwrap();
        assert_eq!(
            candidates,
            vec![
                CandidateCode::new("T90", "Diabetes type 2"),
                CandidateCode::new("T89", "Diabetes type 1"),
            ]
        );
    }

    #[test]
    fn test_wrapped_list_and_malformed_entries() {
        let candidates = decode(json!({
            "total": 4,
            "results": [
                { "code": "K86", "display": "Hypertensjon ukomplisert" },
                { "code": "", "term": "Blank code" },
                { "code": 86, "term": "Numeric code" },
                { "term": "No code" },
                "K87"
            ]
        }))
        .unwrap();
        assert_eq!(candidates, vec![CandidateCode::new("K86", "Hypertensjon ukomplisert")]);
    }

    #[test]
    fn test_unknown_shapes_yield_nothing() {
        assert!(decode(json!({ "hits": [{ "code": "T90", "term": "x" }] })).unwrap().is_empty());
        assert!(decode(json!({ "items": "T90" })).unwrap().is_empty());
        assert!(decode(json!("T90")).is_err());
    }
}
