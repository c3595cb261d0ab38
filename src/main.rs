use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod api;
mod betting;
mod collector;
mod config;

use collector::{ApiFootball, Collector, CsvSink};
use config::{CollectArgs, Command, Config, ServeArgs};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    match config.command {
        Command::Serve(args) => serve(args).await,
        Command::Collect(args) => collect(args).await,
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    let app = api::router();
    let addr: SocketAddr = args.addr.parse()?;
    info!("API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}

async fn collect(args: CollectArgs) -> Result<()> {
    let api_key = args.resolve_api_key()?;
    let source = ApiFootball::new(
        &api_key,
        &args.api_url,
        Duration::from_millis(args.request_delay_ms),
    )?;
    let sink = CsvSink::new(&args.output_dir)?;
    info!("Writing CSV files to {:?}", sink.output_dir());

    let collector = Collector::new(
        Arc::new(source),
        sink,
        Duration::from_millis(args.statistics_delay_ms),
    );
    collector
        .run(&args.countries, &args.seasons, !args.skip_statistics)
        .await?;

    Ok(())
}
