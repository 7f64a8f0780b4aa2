//! Wiring of the concrete collaborators for a production run.

use crate::error::BotResult;
use crate::pipeline::{Pipeline, RunReport};
use crate::publisher::{ConsolePublisher, DiscordPublisher, Publisher};
use chrono::NaiveDate;
use climo_config::Config;
use climo_graphs::{MeteostatFetcher, TrendChartRenderer};
use climo_i18n::MessageCatalog;
use tracing::info;

/// Builds the publisher for this run. Discord credentials are checked here,
/// before any data is fetched.
pub async fn connect_publisher(config: &Config) -> BotResult<Box<dyn Publisher>> {
    if config.publisher.dry_run {
        info!("Dry run: the briefing is printed instead of posted");
        Ok(Box::new(ConsolePublisher::stdout()))
    } else {
        Ok(Box::new(DiscordPublisher::connect(&config.discord).await?))
    }
}

/// Runs one briefing for `today` with the configured services.
pub async fn run(config: &Config, today: NaiveDate) -> BotResult<RunReport> {
    let publisher = connect_publisher(config).await?;
    let fetcher = MeteostatFetcher::from_config(&config.meteostat)?;
    let renderer = TrendChartRenderer::from_config(&config.chart);
    let catalog = MessageCatalog::for_locale(&config.analysis.locale)?;
    info!("Using locale {}", catalog.locale());

    Pipeline::new(config, &catalog, &fetcher, &renderer, publisher.as_ref())
        .run(today)
        .await
}
