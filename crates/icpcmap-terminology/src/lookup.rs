//! Concept lookups: direct mappings and hierarchy parents
//!
//! [`HttpConceptLookup`] talks to the FAT terminology API:
//! - `GET {base}/api/snomed/{id}` returns either `{ "mappings": [...] }` or a
//!   single mapping object
//! - `GET {base}/api/snomed/{id}/parents` returns `{ "items": [{ "conceptId": ... }] }`

use async_trait::async_trait;
use icpcmap_core::Mapping;
use serde::Deserialize;
use serde_json::Value;

use crate::client::TerminologyClient;
use crate::config::TerminologyConfig;
use crate::error::{LookupError, TerminologyError};

/// Concept hierarchy and mapping lookups consumed by the resolver.
#[async_trait]
pub trait ConceptLookup: Send + Sync {
    /// Mapping of the concept itself into the target system, if any.
    async fn fetch_direct_mapping(&self, concept_id: &str) -> Result<Option<Mapping>, LookupError>;

    /// Immediate parents of the concept, in provider order.
    async fn fetch_parents(&self, concept_id: &str) -> Result<Vec<String>, LookupError>;
}

/// Known shapes of the direct mapping response
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DirectMappingPayload {
    Listed { mappings: Vec<Value> },
    Single(Value),
}

impl DirectMappingPayload {
    fn into_mapping(self, target_system: &str) -> Option<Mapping> {
        match self {
            Self::Listed { mappings } => mappings
                .iter()
                .filter_map(mapping_from_value)
                .find(|m| m.system == target_system),
            Self::Single(value) => {
                mapping_from_value(&value).filter(|m| m.system == target_system)
            }
        }
    }
}

/// Decode one mapping object; entries without a system or target code are absent.
fn mapping_from_value(value: &Value) -> Option<Mapping> {
    let object = value.as_object()?;
    let system = object.get("system")?.as_str()?.trim();
    let target_code = ["targetId", "targetCode", "code"]
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|code| !code.is_empty())?;
    let display = ["display", "targetDisplay"]
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_str))
        .map(String::from);

    let extra = object
        .iter()
        .filter(|(key, _)| {
            !matches!(
                key.as_str(),
                "system" | "targetId" | "targetCode" | "code" | "display" | "targetDisplay"
            )
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Some(Mapping {
        system: system.to_string(),
        target_code: target_code.to_string(),
        display,
        extra,
    })
}

/// Decode a parents response; items without a concept id are skipped.
fn parents_from_value(value: &Value) -> Vec<String> {
    let Some(items) = value.get("items").and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item.get("conceptId")? {
            Value::String(id) => Some(id.trim().to_string()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        })
        .filter(|id| !id.is_empty())
        .collect()
}

/// [`ConceptLookup`] backed by the FAT terminology HTTP API.
#[derive(Debug, Clone)]
pub struct HttpConceptLookup {
    client: TerminologyClient,
    target_system: String,
}

impl HttpConceptLookup {
    pub fn new(config: &TerminologyConfig) -> Result<Self, TerminologyError> {
        Ok(Self::with_client(
            TerminologyClient::new(config)?,
            config.target_system.clone(),
        ))
    }

    pub fn with_client(client: TerminologyClient, target_system: impl Into<String>) -> Self {
        Self {
            client,
            target_system: target_system.into(),
        }
    }
}

#[async_trait]
impl ConceptLookup for HttpConceptLookup {
    async fn fetch_direct_mapping(&self, concept_id: &str) -> Result<Option<Mapping>, LookupError> {
        let url = self.client.endpoint(["api", "snomed", concept_id])?;
        let body = self.client.get_json(url, &[]).await?;

        let payload: DirectMappingPayload =
            serde_json::from_value(body).map_err(|e| LookupError::Decode(e.to_string()))?;
        Ok(payload.into_mapping(&self.target_system))
    }

    async fn fetch_parents(&self, concept_id: &str) -> Result<Vec<String>, LookupError> {
        let url = self.client.endpoint(["api", "snomed", concept_id, "parents"])?;
        let body = self.client.get_json(url, &[]).await?;
        Ok(parents_from_value(&body))
    }
}
