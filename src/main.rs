mod cli;
mod config;
mod duration;
mod error;
mod executor;
#[cfg(test)]
mod fake;
mod filter;
mod models;
mod output;
mod planner;
mod registry;
mod resolve;
mod sweep;

use std::process;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::Config;
use output::print_summary;
use registry::{GitLabClient, RegistryApi};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("regprune={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli)?;
    init_tracing(config.verbose);
    config.log_settings();

    let client = GitLabClient::new(
        &config.base_url,
        &config.project,
        config.token.as_deref(),
        config.insecure,
    )?;
    let api: Arc<dyn RegistryApi> = Arc::new(client);

    let report = sweep::run(api, &config).await?;
    print_summary(&report, config.dry_run);

    Ok(())
}
