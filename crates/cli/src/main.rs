//! BTC pricing - average spot price across public providers
//!
//! Main entry point for the command-line tool

mod cli;
mod output;
mod settings;

use std::sync::Arc;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use btc_price_feed::{PriceAggregator, ReqwestTransport, TracingSink};

use crate::cli::Args;
use crate::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize logging; stdout is reserved for the report
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let settings = Settings::load()?.apply_args(&args);
    debug!(?settings, "Loaded settings");

    info!("Starting BTC pricing v{}", env!("CARGO_PKG_VERSION"));

    let transport = ReqwestTransport::new(&settings.feed_config())?;
    let aggregator = PriceAggregator::with_sources(
        settings.sources(),
        Arc::new(transport),
        Arc::new(TracingSink),
    )
    .with_mode(settings.fetch_mode());

    let result = aggregator.run().await;
    let amounts = args.amounts();

    if args.json {
        println!("{}", output::render_json(&result, &amounts)?);
        if result.success_count() == 0 {
            anyhow::bail!("no provider returned a quote");
        }
    } else {
        print!("{}", output::render_text(&result, &amounts, args.quotes)?);
    }

    Ok(())
}
