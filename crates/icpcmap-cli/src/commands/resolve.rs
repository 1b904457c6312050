use anyhow::{Context, Result};
use colored::Colorize;
use icpcmap_terminology::{HttpConceptLookup, NearestMappingResolver, TerminologyConfig};

use crate::cli::{OutputFormat, ResolveArgs};
use crate::output::{print_json, print_success};

pub async fn run(args: &ResolveArgs, config: &TerminologyConfig, format: OutputFormat) -> Result<()> {
    let lookup = HttpConceptLookup::new(config).context("Invalid terminology config")?;
    let resolver = NearestMappingResolver::new(lookup).with_lookup_timeout(config.lookup_timeout());

    let Some(resolved) = resolver.resolve(&args.concept_id).await else {
        anyhow::bail!(
            "No {} mapping found for concept {} or its ancestors",
            config.target_system,
            args.concept_id
        );
    };

    match format {
        OutputFormat::Json => print_json(&resolved)?,
        OutputFormat::Table => {
            let mapping = &resolved.mapping;
            print_success(&format!(
                "{} {}",
                mapping.target_code.bold(),
                mapping.display.as_deref().unwrap_or_default()
            ));
            println!("{}: {}", "System".cyan(), mapping.system);
            println!("{}: {}", "Concept".cyan(), resolved.concept_id);
            println!("{}: {}", "Depth".cyan(), resolved.depth);
        }
    }
    Ok(())
}
