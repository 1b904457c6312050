use std::path::Path;

use anyhow::{Context, Result};
use icpcmap_core::{KeywordMatcher, MatchOptions};
use icpcmap_terminology::LocalRegistry;
use serde_json::json;

use crate::cli::{MatchArgs, OutputFormat};
use crate::config::{self, AppConfig};
use crate::output::{print_json, print_table};

pub fn load_registry(path: &Path, config: &AppConfig) -> Result<LocalRegistry> {
    LocalRegistry::load(path, config.registry.search.clone())
        .with_context(|| format!("Cannot load registry {}", path.display()))
}

pub fn run(args: &MatchArgs, config: &AppConfig, format: OutputFormat) -> Result<()> {
    let path = config::resolve_registry(args.registry.as_deref(), config)?;
    let registry = load_registry(&path, config)?;
    let matcher = KeywordMatcher::new(config.matcher.clone()).context("Invalid matcher config")?;

    let mut options = MatchOptions::new().with_preferred_prefixes(args.prefer.iter().cloned());
    if let Some(min_score) = args.min_score {
        options = options.with_min_score(min_score);
    }
    if let Some(max_results) = args.max_results {
        options = options.with_max_results(max_results);
    }

    let candidates = registry.search(&args.keyword);
    let ranked = matcher.match_scored(&args.keyword, &candidates, &options);

    match format {
        OutputFormat::Json => {
            let rows: Vec<_> = ranked
                .iter()
                .map(|scored| {
                    json!({
                        "code": scored.candidate.code,
                        "term": scored.candidate.term,
                        "score": scored.score,
                    })
                })
                .collect();
            print_json(&rows)?;
        }
        OutputFormat::Table => print_table(
            &["Code", "Term", "Score"],
            ranked.iter().map(|scored| {
                vec![
                    scored.candidate.code.clone(),
                    scored.candidate.term.clone(),
                    format!("{:.1}", scored.score),
                ]
            }),
            "No matching codes.",
        ),
    }
    Ok(())
}
