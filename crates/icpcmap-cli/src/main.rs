mod cli;
mod commands;
mod config;
mod observability;
mod output;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use observability::{DEFAULT_LOG_LEVEL, init_tracing_with_level};
use output::print_error;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut config = config::load(cli.config.as_deref())?;

    let level = cli
        .log_level
        .as_deref()
        .or(config.log_level.as_deref())
        .unwrap_or(DEFAULT_LOG_LEVEL);
    init_tracing_with_level(level);

    // --server / ICPCMAP_SERVER wins over the config file
    if let Some(server) = &cli.server {
        config.terminology.server_url = server.clone();
    }
    let format = cli.format.unwrap_or_default();

    match &cli.command {
        Commands::Match(args) => commands::matching::run(args, &config, format)?,
        Commands::Suggest(args) => commands::suggest::run(args, &config, format).await?,
        Commands::Search(args) => {
            commands::search::run(args, &config.terminology, format).await?;
        }
        Commands::Resolve(args) => {
            commands::resolve::run(args, &config.terminology, format).await?;
        }
    }

    Ok(())
}
