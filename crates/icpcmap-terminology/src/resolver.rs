//! Nearest-mapping resolution over a concept hierarchy.
//!
//! When a concept has no mapping of its own, its ancestors are searched
//! depth-first, direct mapping before parents, parents in the order the
//! lookup returns them. The first mapping found wins.
//!
//! Each top-level call owns one visited set, so every concept is examined at
//! most once per call and cyclic hierarchies terminate. Direct mappings and
//! parent lists are cached per concept id for the lifetime of the resolver,
//! including empty outcomes.

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use dashmap::DashMap;
use icpcmap_core::{Mapping, ResolvedMapping};

use crate::error::LookupError;
use crate::lookup::ConceptLookup;

/// Default upper bound for one lookup
const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Cache statistics for monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverCacheStats {
    pub mapping_cache_size: usize,
    pub parents_cache_size: usize,
}

/// Finds the closest concept in a hierarchy that has a mapping.
#[derive(Debug)]
pub struct NearestMappingResolver<L> {
    lookup: L,

    /// Direct mapping per concept id; `None` records "no mapping"
    mapping_cache: DashMap<String, Option<Mapping>>,

    /// Immediate parents per concept id
    parents_cache: DashMap<String, Vec<String>>,

    lookup_timeout: Duration,
}

impl<L: ConceptLookup> NearestMappingResolver<L> {
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            mapping_cache: DashMap::new(),
            parents_cache: DashMap::new(),
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    /// Sets the upper bound for a single lookup. A timed-out lookup counts
    /// as an empty result.
    #[must_use]
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Mapping of the concept or of its nearest mapped ancestor.
    pub async fn find_nearest_mapping(&self, concept_id: &str) -> Option<Mapping> {
        self.resolve(concept_id).await.map(|resolved| resolved.mapping)
    }

    /// Like [`find_nearest_mapping`](Self::find_nearest_mapping), also
    /// reporting which concept carried the mapping.
    pub async fn resolve(&self, concept_id: &str) -> Option<ResolvedMapping> {
        let concept_id = concept_id.trim();
        if concept_id.is_empty() {
            return None;
        }

        let mut visited: HashSet<String> = HashSet::new();
        let mut pending: Vec<(String, usize)> = vec![(concept_id.to_string(), 0)];

        while let Some((id, depth)) = pending.pop() {
            if !visited.insert(id.clone()) {
                tracing::trace!(concept_id = %id, "Concept already visited");
                continue;
            }

            if let Some(mapping) = self.direct_mapping(&id).await {
                tracing::debug!(
                    concept_id = %concept_id,
                    mapped_concept = %id,
                    target_code = %mapping.target_code,
                    depth,
                    "Resolved nearest mapping"
                );
                return Some(ResolvedMapping {
                    mapping,
                    concept_id: id,
                    depth,
                });
            }

            // Reversed so the first parent is popped first
            let parents = self.parents(&id).await;
            pending.extend(parents.into_iter().rev().map(|parent| (parent, depth + 1)));
        }

        tracing::debug!(
            concept_id = %concept_id,
            visited = visited.len(),
            "No mapping found in ancestor hierarchy"
        );
        None
    }

    /// Clear both caches.
    pub fn clear_cache(&self) {
        self.mapping_cache.clear();
        self.parents_cache.clear();
        tracing::debug!("Cleared resolver caches");
    }

    pub fn cache_stats(&self) -> ResolverCacheStats {
        ResolverCacheStats {
            mapping_cache_size: self.mapping_cache.len(),
            parents_cache_size: self.parents_cache.len(),
        }
    }

    async fn direct_mapping(&self, concept_id: &str) -> Option<Mapping> {
        let cached = self
            .mapping_cache
            .get(concept_id)
            .map(|entry| entry.value().clone());
        if let Some(mapping) = cached {
            tracing::trace!(concept_id, "Cache hit for direct mapping");
            return mapping;
        }

        let result = self
            .bounded("direct mapping", concept_id, self.lookup.fetch_direct_mapping(concept_id))
            .await;
        match result {
            Ok(mapping) => self
                .mapping_cache
                .entry(concept_id.to_string())
                .or_insert(mapping)
                .value()
                .clone(),
            Err(e) => {
                tracing::warn!(concept_id, error = %e, "Direct mapping lookup failed");
                if !e.is_transient() {
                    self.mapping_cache
                        .entry(concept_id.to_string())
                        .or_insert(None);
                }
                None
            }
        }
    }

    async fn parents(&self, concept_id: &str) -> Vec<String> {
        let cached = self
            .parents_cache
            .get(concept_id)
            .map(|entry| entry.value().clone());
        if let Some(parents) = cached {
            tracing::trace!(concept_id, "Cache hit for parents");
            return parents;
        }

        let result = self
            .bounded("parents", concept_id, self.lookup.fetch_parents(concept_id))
            .await;
        match result {
            Ok(parents) => self
                .parents_cache
                .entry(concept_id.to_string())
                .or_insert(parents)
                .value()
                .clone(),
            Err(e) => {
                tracing::warn!(concept_id, error = %e, "Parents lookup failed");
                if !e.is_transient() {
                    self.parents_cache
                        .entry(concept_id.to_string())
                        .or_insert_with(Vec::new);
                }
                Vec::new()
            }
        }
    }

    async fn bounded<T>(
        &self,
        what: &str,
        concept_id: &str,
        lookup: impl Future<Output = Result<T, LookupError>>,
    ) -> Result<T, LookupError> {
        match tokio::time::timeout(self.lookup_timeout, lookup).await {
            Ok(result) => result,
            Err(_) => Err(LookupError::Timeout(format!(
                "{what} lookup for {concept_id} exceeded {:?}",
                self.lookup_timeout
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory hierarchy that records every lookup
    #[derive(Default)]
    struct FakeLookup {
        mappings: HashMap<String, Mapping>,
        parents: HashMap<String, Vec<String>>,
        failing_mappings: HashMap<String, LookupError>,
        failing_parents: HashMap<String, LookupError>,
        delay: Option<Duration>,
        mapping_calls: AtomicUsize,
        parents_calls: AtomicUsize,
        order: Mutex<Vec<String>>,
    }

    impl FakeLookup {
        fn with_mapping(mut self, id: &str, code: &str) -> Self {
            self.mappings
                .insert(id.to_string(), Mapping::new("ICPC-2", code));
            self
        }

        fn with_parents(mut self, id: &str, parents: &[&str]) -> Self {
            self.parents.insert(
                id.to_string(),
                parents.iter().map(|p| p.to_string()).collect(),
            );
            self
        }

        fn mapping_calls(&self) -> usize {
            self.mapping_calls.load(Ordering::SeqCst)
        }

        fn parents_calls(&self) -> usize {
            self.parents_calls.load(Ordering::SeqCst)
        }

        fn visit_order(&self) -> Vec<String> {
            self.order.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ConceptLookup for FakeLookup {
        async fn fetch_direct_mapping(
            &self,
            concept_id: &str,
        ) -> Result<Option<Mapping>, LookupError> {
            self.mapping_calls.fetch_add(1, Ordering::SeqCst);
            self.order.lock().unwrap().push(concept_id.to_string());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if let Some(error) = self.failing_mappings.get(concept_id) {
                return Err(error.clone());
            }
            Ok(self.mappings.get(concept_id).cloned())
        }

        async fn fetch_parents(&self, concept_id: &str) -> Result<Vec<String>, LookupError> {
            self.parents_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(error) = self.failing_parents.get(concept_id) {
                return Err(error.clone());
            }
            Ok(self.parents.get(concept_id).cloned().unwrap_or_default())
        }
    }

    fn status_error() -> LookupError {
        LookupError::Status {
            url: "http://fat.test/api/snomed/x".to_string(),
            status: 404,
        }
    }

    #[tokio::test]
    async fn test_direct_mapping_skips_parents() {
        let resolver = NearestMappingResolver::new(
            FakeLookup::default()
                .with_mapping("A", "T90")
                .with_parents("A", &["B"]),
        );

        let mapping = resolver.find_nearest_mapping("A").await.unwrap();

        assert_eq!(mapping.target_code, "T90");
        assert_eq!(resolver.lookup().parents_calls(), 0);
        assert_eq!(resolver.lookup().mapping_calls(), 1);
    }

    #[tokio::test]
    async fn test_no_mapping_no_parents() {
        let resolver = NearestMappingResolver::new(FakeLookup::default());

        assert_eq!(resolver.find_nearest_mapping("A").await, None);
        assert_eq!(resolver.lookup().parents_calls(), 1);
    }

    #[tokio::test]
    async fn test_cycle_terminates() {
        let resolver = NearestMappingResolver::new(
            FakeLookup::default()
                .with_parents("A", &["B"])
                .with_parents("B", &["A"]),
        );

        assert_eq!(resolver.find_nearest_mapping("A").await, None);
        assert_eq!(resolver.lookup().mapping_calls(), 2);
        assert_eq!(resolver.lookup().parents_calls(), 2);
    }

    #[tokio::test]
    async fn test_depth_first_in_provider_order() {
        // A -> [B, C], B -> [D], D -> mapped, C -> mapped
        let resolver = NearestMappingResolver::new(
            FakeLookup::default()
                .with_parents("A", &["B", "C"])
                .with_parents("B", &["D"])
                .with_mapping("C", "K86")
                .with_mapping("D", "T90"),
        );

        let resolved = resolver.resolve("A").await.unwrap();

        assert_eq!(resolved.mapping.target_code, "T90");
        assert_eq!(resolved.concept_id, "D");
        assert_eq!(resolved.depth, 2);
        assert_eq!(resolver.lookup().visit_order(), vec!["A", "B", "D"]);
    }

    #[tokio::test]
    async fn test_shared_visited_set_across_branches() {
        // Diamond: A -> [B, C], B -> [D], C -> [D]; nothing mapped
        let resolver = NearestMappingResolver::new(
            FakeLookup::default()
                .with_parents("A", &["B", "C"])
                .with_parents("B", &["D"])
                .with_parents("C", &["D"]),
        );

        assert_eq!(resolver.resolve("A").await, None);
        assert_eq!(resolver.lookup().visit_order(), vec!["A", "B", "D", "C"]);
        assert_eq!(resolver.lookup().mapping_calls(), 4);
    }

    #[tokio::test]
    async fn test_replay_hits_cache() {
        let resolver = NearestMappingResolver::new(
            FakeLookup::default()
                .with_parents("A", &["B"])
                .with_parents("B", &["C"])
                .with_mapping("C", "R96"),
        );

        let first = resolver.find_nearest_mapping("A").await;
        let mapping_calls = resolver.lookup().mapping_calls();
        let parents_calls = resolver.lookup().parents_calls();

        let second = resolver.find_nearest_mapping("A").await;

        assert_eq!(first, second);
        assert_eq!(first.unwrap().target_code, "R96");
        assert_eq!(resolver.lookup().mapping_calls(), mapping_calls);
        assert_eq!(resolver.lookup().parents_calls(), parents_calls);
        assert_eq!(
            resolver.cache_stats(),
            ResolverCacheStats {
                mapping_cache_size: 3,
                parents_cache_size: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_replay_of_empty_result_hits_cache() {
        let resolver = NearestMappingResolver::new(FakeLookup::default().with_parents("A", &["B"]));

        assert_eq!(resolver.find_nearest_mapping("A").await, None);
        assert_eq!(resolver.find_nearest_mapping("A").await, None);

        assert_eq!(resolver.lookup().mapping_calls(), 2);
        assert_eq!(resolver.lookup().parents_calls(), 2);
    }

    #[tokio::test]
    async fn test_clear_cache_forces_new_lookups() {
        let resolver = NearestMappingResolver::new(FakeLookup::default().with_mapping("A", "T90"));

        resolver.find_nearest_mapping("A").await;
        resolver.clear_cache();
        assert_eq!(resolver.cache_stats().mapping_cache_size, 0);

        resolver.find_nearest_mapping("A").await;
        assert_eq!(resolver.lookup().mapping_calls(), 2);
    }

    #[tokio::test]
    async fn test_failures_are_treated_as_empty() {
        let mut lookup = FakeLookup::default()
            .with_parents("A", &["B", "C"])
            .with_mapping("C", "L03");
        lookup.failing_mappings.insert("B".to_string(), status_error());
        lookup
            .failing_parents
            .insert("B".to_string(), LookupError::Transport("connection reset".to_string()));
        let resolver = NearestMappingResolver::new(lookup);

        let resolved = resolver.resolve("A").await.unwrap();

        assert_eq!(resolved.mapping.target_code, "L03");
        assert_eq!(resolved.concept_id, "C");
        assert_eq!(resolved.depth, 1);
    }

    #[tokio::test]
    async fn test_permanent_failures_cached_transient_failures_retried() {
        let mut lookup = FakeLookup::default();
        lookup.failing_mappings.insert("A".to_string(), status_error());
        lookup
            .failing_parents
            .insert("A".to_string(), LookupError::Transport("connection refused".to_string()));
        let resolver = NearestMappingResolver::new(lookup);

        assert_eq!(resolver.find_nearest_mapping("A").await, None);
        assert_eq!(resolver.find_nearest_mapping("A").await, None);

        // Status error cached, transport error retried
        assert_eq!(resolver.lookup().mapping_calls(), 1);
        assert_eq!(resolver.lookup().parents_calls(), 2);
    }

    #[tokio::test]
    async fn test_lookup_timeout_is_soft_failure() {
        let lookup = FakeLookup {
            delay: Some(Duration::from_millis(500)),
            ..Default::default()
        }
        .with_mapping("A", "T90");
        let resolver =
            NearestMappingResolver::new(lookup).with_lookup_timeout(Duration::from_millis(20));

        assert_eq!(resolver.find_nearest_mapping("A").await, None);
        // Timeouts are not cached
        assert_eq!(resolver.cache_stats().mapping_cache_size, 0);
        assert_eq!(resolver.lookup().parents_calls(), 1);
    }

    #[tokio::test]
    async fn test_blank_concept_id() {
        let resolver = NearestMappingResolver::new(FakeLookup::default());
        assert_eq!(resolver.resolve("  ").await, None);
        assert_eq!(resolver.lookup().mapping_calls(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_resolutions_share_caches() {
        let resolver = NearestMappingResolver::new(
            FakeLookup::default()
                .with_parents("A", &["C"])
                .with_parents("B", &["C"])
                .with_mapping("C", "K86"),
        );

        let (a, b) = tokio::join!(resolver.resolve("A"), resolver.resolve("B"));

        assert_eq!(a.unwrap().concept_id, "C");
        assert_eq!(b.unwrap().concept_id, "C");
        assert_eq!(resolver.cache_stats().mapping_cache_size, 3);
    }
}
