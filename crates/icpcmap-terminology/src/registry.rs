//! Code registry abstraction

use std::sync::Arc;

use async_trait::async_trait;
use icpcmap_core::CandidateCode;

/// Source of candidate codes for a search term.
///
/// Implementations fail soft: lookup problems are logged and reported as an
/// empty result. Returned candidates always have a non-empty code.
#[async_trait]
pub trait CodeRegistry: Send + Sync {
    /// Find candidate codes for a free-text term.
    async fn search_candidates(&self, term: &str) -> Vec<CandidateCode>;

    /// Descriptive text for a known code, if the registry has one.
    async fn describe(&self, _code: &str) -> Option<String> {
        None
    }
}

/// Shared, dynamically dispatched registry
pub type DynCodeRegistry = Arc<dyn CodeRegistry>;

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedRegistry;

    #[async_trait]
    impl CodeRegistry for FixedRegistry {
        async fn search_candidates(&self, _term: &str) -> Vec<CandidateCode> {
            vec![CandidateCode::new("T90", "Diabetes type 2")]
        }
    }

    #[test]
    fn test_describe_defaults_to_none() {
        let registry: DynCodeRegistry = Arc::new(FixedRegistry);
        assert_eq!(tokio_test::block_on(registry.describe("T90")), None);
        assert_eq!(
            tokio_test::block_on(registry.search_candidates("diabetes")).len(),
            1
        );
    }
}
