use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use crate::collector::api_football::DEFAULT_BASE_URL;

/// Betting edge and bankroll allocation service
#[derive(Parser, Debug, Clone)]
#[command(name = "betai", version, about)]
pub struct Config {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP API (`/edges`, `/allocate`, `/health`)
    Serve(ServeArgs),
    /// Download football data from API-Football into CSV files
    Collect(CollectArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// API listen address
    #[arg(long, env = "BETAI_ADDR", default_value = "0.0.0.0:8000")]
    pub addr: String,
}

#[derive(Args, Debug, Clone)]
pub struct CollectArgs {
    /// API-Football key (takes precedence over --api-key-file)
    #[arg(long, env = "API_FOOTBALL_KEY")]
    pub api_key: Option<String>,

    /// File holding the API-Football key
    #[arg(long, env = "API_FOOTBALL_KEY_FILE", default_value = "api_key.txt")]
    pub api_key_file: PathBuf,

    /// API-Football base URL
    #[arg(long, env = "API_FOOTBALL_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Directory the CSV files are written to
    #[arg(long, env = "COLLECT_OUTPUT_DIR", default_value = "data")]
    pub output_dir: PathBuf,

    /// Countries whose leagues are collected (comma separated)
    #[arg(
        long,
        value_delimiter = ',',
        default_values = ["England", "Spain", "Germany", "Italy", "France"]
    )]
    pub countries: Vec<String>,

    /// Seasons to collect (comma separated start years)
    #[arg(long, value_delimiter = ',', default_values_t = [2021, 2022, 2023])]
    pub seasons: Vec<i32>,

    /// Skip per-fixture statistics (one request per match)
    #[arg(long, default_value = "false")]
    pub skip_statistics: bool,

    /// Pause after every API request in milliseconds
    #[arg(long, env = "REQUEST_DELAY_MS", default_value = "500")]
    pub request_delay_ms: u64,

    /// Extra pause between statistics requests in milliseconds
    #[arg(long, env = "STATISTICS_DELAY_MS", default_value = "1000")]
    pub statistics_delay_ms: u64,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        match &self.command {
            Command::Serve(args) => {
                args.addr
                    .parse::<SocketAddr>()
                    .with_context(|| format!("Invalid listen address: {}", args.addr))?;
            }
            Command::Collect(args) => {
                url::Url::parse(&args.api_url)
                    .with_context(|| format!("Invalid API-Football URL: {}", args.api_url))?;
                if args.countries.iter().all(|c| c.trim().is_empty()) {
                    anyhow::bail!("at least one country is required");
                }
                if args.seasons.is_empty() {
                    anyhow::bail!("at least one season is required");
                }
            }
        }
        Ok(())
    }
}

impl CollectArgs {
    /// The key from `--api-key`, or else the trimmed contents of `--api-key-file`.
    pub fn resolve_api_key(&self) -> anyhow::Result<String> {
        if let Some(key) = &self.api_key {
            let key = key.trim();
            if key.is_empty() {
                anyhow::bail!("--api-key is empty");
            }
            return Ok(key.to_string());
        }
        let key = std::fs::read_to_string(&self.api_key_file)
            .with_context(|| format!("Failed to read API key file {:?}", self.api_key_file))?;
        let key = key.trim();
        if key.is_empty() {
            anyhow::bail!("API key file {:?} is empty", self.api_key_file);
        }
        Ok(key.to_string())
    }
}
