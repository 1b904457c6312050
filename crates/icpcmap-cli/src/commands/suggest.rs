use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use icpcmap_core::{KeywordMatcher, parse_doctor_codes, parse_keywords};
use icpcmap_terminology::{CodeSuggester, Suggestion};

use crate::cli::{OutputFormat, SuggestArgs};
use crate::commands::matching::load_registry;
use crate::config::{self, AppConfig};
use crate::output::{print_json, print_table};

fn read_reply(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read reply file {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Cannot read reply from stdin")?;
            Ok(buf)
        }
    }
}

pub async fn run(args: &SuggestArgs, config: &AppConfig, format: OutputFormat) -> Result<()> {
    let path = config::resolve_registry(args.registry.as_deref(), config)?;
    let registry = Arc::new(load_registry(&path, config)?);
    let matcher = KeywordMatcher::new(config.matcher.clone()).context("Invalid matcher config")?;

    let mut suggest_config = config.suggest.clone();
    if let Some(per_keyword) = args.per_keyword {
        suggest_config.per_keyword = per_keyword;
    }
    if !args.prefer.is_empty() {
        suggest_config.preferred_prefixes = args.prefer.clone();
    }
    let suggester =
        CodeSuggester::new(registry, matcher, suggest_config).context("Invalid suggest config")?;

    let reply = read_reply(args.reply.as_deref())?;
    let keywords = parse_keywords(&reply);
    let doctor_codes = args.codes.as_deref().map(parse_doctor_codes).unwrap_or_default();
    tracing::info!(
        keywords = keywords.len(),
        doctor_codes = doctor_codes.len(),
        "Suggesting codes"
    );

    let suggestions = suggester.suggest(&keywords, &doctor_codes).await;

    match format {
        OutputFormat::Json => print_json(&suggestions)?,
        OutputFormat::Table => print_table(
            &["Code", "Description", "Source", "Keyword"],
            suggestions.iter().map(table_row),
            "No codes suggested.",
        ),
    }
    Ok(())
}

fn table_row(suggestion: &Suggestion) -> Vec<String> {
    vec![
        suggestion.code.clone(),
        suggestion.description.clone(),
        suggestion.source.as_str().to_string(),
        suggestion.keyword.clone().unwrap_or_else(|| "-".to_string()),
    ]
}
