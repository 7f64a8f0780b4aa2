//! Climo Bot - Main Entry Point

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use climo_bot::BotError;
use climo_common::init_logging;
use climo_config::{Config, ConfigLoader};
use std::path::PathBuf;
use tracing::{error, info};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the briefing instead of posting it
    #[arg(long)]
    dry_run: bool,

    /// Skip the trend chart
    #[arg(long)]
    no_chart: bool,

    /// Report on this day instead of today (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Log level
    #[arg(short, long)]
    log_level: Option<String>,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if self.dry_run {
            config.publisher.dry_run = true;
        }
        if self.no_chart {
            config.analysis.chart_enabled = false;
        }
        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config =
        ConfigLoader::load(args.config.as_deref()).context("failed to load configuration")?;
    args.apply(&mut config);
    config.validate().context("invalid configuration")?;

    // Initialize logging
    let _guard = init_logging(&config.logging)
        .map_err(|e| BotError::Logging(e.to_string()))
        .context("failed to initialise logging")?;

    let today = args.date.unwrap_or_else(|| Local::now().date_naive());
    info!(
        "Starting Climo Bot for {} on {} ({}-year baseline)",
        config.location.name, today, config.analysis.lookback_years
    );

    match climo_bot::run(&config, today).await {
        Ok(report) => {
            info!(
                "Briefing {} published{}",
                report.post_id,
                if report.chart.is_some() { " with chart" } else { "" }
            );
            Ok(())
        }
        Err(e) => {
            if e.is_data_unavailable() {
                error!("No observation for {} yet: {}", today, e);
            } else {
                error!("Briefing failed: {}", e);
            }
            Err(e.into())
        }
    }
}
