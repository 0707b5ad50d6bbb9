mod cli;
mod commands;
mod output;
mod timing;

use anyhow::Result;
use clap::Parser as _;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    timing::init_tracing(cli.verbose, cli.timing);

    let config = cli.loader_config()?;

    match cli.command {
        Commands::Render { format } => commands::run_render(config, format).await,
        Commands::Users { json } => commands::run_users(config, json).await,
        Commands::Watch => commands::run_watch(config).await,
    }
}
