use std::time::Duration;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use people_business::LoaderConfig;

#[derive(Parser)]
#[command(name = "people")]
#[command(about = "Load and render the people board", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Users endpoint, overrides PEOPLE_USERS_URL
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Request timeout in milliseconds, overrides PEOPLE_TIMEOUT_MS
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: Option<u64>,

    /// Show timing/latency information
    #[arg(long, global = true)]
    pub timing: bool,

    /// Enable verbose debug output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Mount the page, run the startup load and print the result
    Render {
        /// Print the whole document or only the table body
        #[arg(long, value_enum, default_value_t = RenderFormat::Html)]
        format: RenderFormat,
    },
    /// Load users and print them
    Users {
        /// Print one JSON record per line instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Interactive board: reload, toggle image, toggle table, quit
    Watch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RenderFormat {
    Html,
    Text,
}

impl Cli {
    /// Environment configuration with the command line flags applied on top.
    pub fn loader_config(&self) -> Result<LoaderConfig> {
        self.apply_overrides(LoaderConfig::from_env()?)
    }

    fn apply_overrides(&self, mut config: LoaderConfig) -> Result<LoaderConfig> {
        if let Some(url) = &self.url {
            if url.trim().is_empty() {
                bail!("--url must not be empty");
            }
            config = config.with_users_url(url.clone());
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config = config.with_timeout(Duration::from_millis(timeout_ms));
        }
        Ok(config)
    }
}
