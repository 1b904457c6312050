use anyhow::{Context, Result};
use icpcmap_terminology::{CodeRegistry, RemoteSearchRegistry, TerminologyConfig};

use crate::cli::{OutputFormat, SearchArgs};
use crate::output::{print_json, print_table};

pub async fn run(args: &SearchArgs, config: &TerminologyConfig, format: OutputFormat) -> Result<()> {
    let registry = RemoteSearchRegistry::new(config).context("Invalid terminology config")?;
    let candidates = registry.search_candidates(&args.term).await;

    match format {
        OutputFormat::Json => print_json(&candidates)?,
        OutputFormat::Table => print_table(
            &["Code", "Term"],
            candidates
                .iter()
                .map(|candidate| vec![candidate.code.clone(), candidate.term.clone()]),
            "No codes found.",
        ),
    }
    Ok(())
}
