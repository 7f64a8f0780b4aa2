//! One briefing run: fetch, compare, optionally chart, compose, publish.

use crate::error::BotResult;
use crate::publisher::Publisher;
use chrono::{Datelike, NaiveDate};
use climo_common::{CalendarKey, ClimoError, ObservationSeries, PostId, Result};
use climo_config::Config;
use climo_graphs::{
    fetch_window, BaselineComparator, ChartLabels, ChartRenderer, Comparison,
    DayOfYearAggregator, MessageComposer, SeriesFetcher, TrendEstimator, YearSeries,
};
use climo_i18n::MessageCatalog;
use std::path::PathBuf;
use tracing::{info, instrument, warn};

/// What a run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// The day reported on.
    pub today: NaiveDate,
    /// Today against its baseline.
    pub comparison: Comparison,
    /// The published text.
    pub text: String,
    /// The attached chart, if one was rendered.
    pub chart: Option<PathBuf>,
    /// Identifier of the post.
    pub post_id: PostId,
}

/// The collaborators of a run, borrowed for its duration.
pub struct Pipeline<'a> {
    config: &'a Config,
    catalog: &'a MessageCatalog,
    fetcher: &'a dyn SeriesFetcher,
    renderer: &'a dyn ChartRenderer,
    publisher: &'a dyn Publisher,
}

impl<'a> Pipeline<'a> {
    /// Assembles a pipeline.
    pub fn new(
        config: &'a Config,
        catalog: &'a MessageCatalog,
        fetcher: &'a dyn SeriesFetcher,
        renderer: &'a dyn ChartRenderer,
        publisher: &'a dyn Publisher,
    ) -> Self {
        Self {
            config,
            catalog,
            fetcher,
            renderer,
            publisher,
        }
    }

    /// Runs the stages in order. A missing observation for `today` aborts
    /// before anything is published; a chart-stage failure is logged and
    /// the text goes out alone.
    #[instrument(skip(self), fields(location = %self.config.location.name))]
    pub async fn run(&self, today: NaiveDate) -> BotResult<RunReport> {
        let analysis = &self.config.analysis;
        let lookback = analysis.lookback_years;

        let (start, end) = fetch_window(today, lookback)?;
        let series = self
            .fetcher
            .fetch_daily_series(&self.config.location.point(), start, end, analysis.units)
            .await?;
        info!("Fetched {} records for {}..={}", series.len(), start, end);

        let table = DayOfYearAggregator::new().aggregate(&series);
        let comparison = BaselineComparator::new().compare(&series, &table, today, lookback)?;
        info!(
            high = comparison.snapshot.high,
            deviation = comparison.deviation,
            "Compared today against the {}-year baseline",
            lookback
        );

        let chart = if analysis.chart_enabled {
            match self.chart(&series, today) {
                Ok(path) => Some(path),
                Err(e) if e.is_chart_only() => {
                    warn!("Chart skipped, posting text only: {}", e);
                    None
                }
                Err(e) => return Err(e.into()),
            }
        } else {
            None
        };

        let text = MessageComposer::new(self.catalog, &self.config.location.name).compose(
            &comparison,
            lookback,
            analysis.units,
        )?;

        let post_id = self.publisher.publish(&text, chart.as_deref()).await?;
        info!("Published briefing {}", post_id);

        Ok(RunReport {
            today,
            comparison,
            text,
            chart,
            post_id,
        })
    }

    fn chart(&self, series: &ObservationSeries, today: NaiveDate) -> Result<PathBuf> {
        let key = CalendarKey::from_date(today);
        let last_year = today.year();
        let lookback = i32::try_from(self.config.analysis.lookback_years).unwrap_or(i32::MAX);
        let first_year = last_year.saturating_sub(lookback);

        let years = YearSeries::from_series(series, key);
        let curve = TrendEstimator::default().estimate(&years, first_year, last_year)?;
        let labels = ChartLabels::from_catalog(
            self.catalog,
            &self.config.location.name,
            key,
            first_year,
            last_year,
            self.config.analysis.units,
        )
        .map_err(label_error)?;

        let path = self.config.chart.output_path.clone();
        self.renderer.render(&years, &curve, &labels, &path)?;
        Ok(path)
    }
}

/// Label formatting failures count as chart failures.
fn label_error(err: ClimoError) -> ClimoError {
    ClimoError::graph_with_source("chart labels could not be formatted", err)
}
