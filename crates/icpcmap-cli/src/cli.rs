use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "icpcmap")]
#[command(about = "icpcmap CLI: match clinical keywords to ICPC-2 codes")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: <config dir>/icpcmap/config.toml)
    #[arg(short, long, global = true, env = "ICPCMAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Terminology server base URL (overrides config)
    #[arg(short, long, global = true, env = "ICPCMAP_SERVER")]
    pub server: Option<String>,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Log level filter, e.g. `debug` or `icpcmap_terminology=trace` (RUST_LOG wins)
    #[arg(long, global = true, env = "ICPCMAP_LOG")]
    pub log_level: Option<String>,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank local registry codes for one keyword
    Match(MatchArgs),
    /// Suggest codes for a keyword reply
    Suggest(SuggestArgs),
    /// Search codes on the terminology server
    Search(SearchArgs),
    /// Find the nearest ICPC-2 mapping of a SNOMED CT concept
    Resolve(ResolveArgs),
}

#[derive(clap::Args)]
pub struct MatchArgs {
    /// Keyword to match (e.g. "diabetes")
    pub keyword: String,
    /// Local ICPC-2 registry JSON file (overrides config)
    #[arg(long)]
    pub registry: Option<PathBuf>,
    /// Preferred code prefix, repeatable (e.g. --prefer T --prefer K)
    #[arg(long = "prefer")]
    pub prefer: Vec<String>,
    /// Drop matches scoring below this value
    #[arg(long)]
    pub min_score: Option<f64>,
    /// Maximum number of matches to show
    #[arg(long)]
    pub max_results: Option<usize>,
}

#[derive(clap::Args)]
pub struct SuggestArgs {
    /// Local ICPC-2 registry JSON file (overrides config)
    #[arg(long)]
    pub registry: Option<PathBuf>,
    /// Keyword reply file, JSON or list form (reads from stdin if omitted)
    #[arg(long)]
    pub reply: Option<PathBuf>,
    /// Codes entered by the doctor (e.g. "T90 K86")
    #[arg(long)]
    pub codes: Option<String>,
    /// Matches kept per keyword (overrides config)
    #[arg(long)]
    pub per_keyword: Option<usize>,
    /// Preferred code prefix, repeatable (overrides config)
    #[arg(long = "prefer")]
    pub prefer: Vec<String>,
}

#[derive(clap::Args)]
pub struct SearchArgs {
    /// Free-text search term
    pub term: String,
}

#[derive(clap::Args)]
pub struct ResolveArgs {
    /// SNOMED CT concept id (e.g. 44054006)
    pub concept_id: String,
}
