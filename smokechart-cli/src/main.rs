//! smokechart command line
//!
//! Reads a JSON sample matrix (one array of samples per bucket) and prints
//! the chart's styled paths as JSON.

mod config;
mod error;

use clap::Parser;
use smokechart::chart::Smokechart;
use smokechart::core::parse_matrix;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

fn run(config: &Config) -> error::Result<String> {
    let chart_config = config.chart_config()?;
    let raw = parse_matrix(&config.read_input()?)?;
    let chart = Smokechart::new(&raw, chart_config)?;
    info!(
        buckets = chart.bucket_count(),
        quantile = config.quantile,
        "rendering smoke chart"
    );
    let scene = chart.scene(config.quantile)?;
    let json = if config.pretty {
        serde_json::to_string_pretty(&scene)?
    } else {
        serde_json::to_string(&scene)?
    };
    Ok(json)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smokechart=info,smokechart_cli=info".into()),
        )
        .init();

    let config = Config::parse();
    let json = run(&config)?;
    println!("{json}");
    Ok(())
}
