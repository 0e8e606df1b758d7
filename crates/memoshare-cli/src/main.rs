//! memoshare CLI - share sheet for memos from the terminal
//!
//! Posts text, links, and images as a single memo and renders the usage
//! heatmap from the same shared configuration.

mod cli;
mod commands;
mod error;
#[cfg(test)]
mod tests;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::common::open_store;
use crate::commands::config::run_config;
use crate::commands::heatmap::run_heatmap;
use crate::commands::share::run_share;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("memoshare=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let store = open_store(cli.group_dir);

    match cli.command {
        Commands::Share { text, attachments } => run_share(store, &text, &attachments).await?,
        Commands::Heatmap { weeks, json } => run_heatmap(&store, weeks, json).await?,
        Commands::Config { command } => run_config(command, &store)?,
    }

    Ok(())
}
