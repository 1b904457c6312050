//! Terminology access for icpcmap
//!
//! This crate connects the pure matching core to terminology sources:
//! - [`CodeRegistry`] implementations that produce candidate codes for a term,
//!   from a local ICPC-2 table ([`LocalRegistry`]) or a remote search endpoint
//!   ([`RemoteSearchRegistry`])
//! - [`ConceptLookup`] for direct concept mappings and concept parents, with an
//!   HTTP adapter for the FAT terminology API ([`HttpConceptLookup`])
//! - [`NearestMappingResolver`], which walks the concept hierarchy to the
//!   closest ancestor that has a mapping
//! - [`CodeSuggester`], which turns a keyword list into code suggestions
//!
//! Lookup failures never escape the registry and resolver entry points; they
//! are logged and reported as "no result".

pub mod client;
pub mod config;
pub mod error;
pub mod local;
pub mod lookup;
pub mod registry;
pub mod remote;
pub mod resolver;
pub mod suggest;

pub use client::TerminologyClient;
pub use config::{LocalRegistryConfig, SuggestConfig, TerminologyConfig};
pub use error::{LookupError, TerminologyError};
pub use local::{LocalRegistry, RegistryEntry};
pub use lookup::{ConceptLookup, HttpConceptLookup};
pub use registry::{CodeRegistry, DynCodeRegistry};
pub use remote::RemoteSearchRegistry;
pub use resolver::{NearestMappingResolver, ResolverCacheStats};
pub use suggest::{CodeSuggester, Suggestion, SuggestionSource};
