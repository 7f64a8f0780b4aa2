//! Seams between the analysis pipeline and its external collaborators.

use crate::renderer::ChartLabels;
use crate::trend::{TrendCurve, YearSeries};
use async_trait::async_trait;
use chrono::NaiveDate;
use climo_common::{GeoPoint, ObservationSeries, Result, UnitSystem};
use std::path::Path;

/// Source of daily observations for a point.
#[async_trait]
pub trait SeriesFetcher: Send + Sync {
    /// Returns every available record in `[start, end]`, ordered by date, in
    /// the requested unit system. Days without data may be absent.
    async fn fetch_daily_series(
        &self,
        point: &GeoPoint,
        start: NaiveDate,
        end: NaiveDate,
        units: UnitSystem,
    ) -> Result<ObservationSeries>;
}

/// Draws the year-over-year trend chart to an image file.
pub trait ChartRenderer: Send + Sync {
    /// Writes the chart to `path`, replacing any existing file.
    fn render(
        &self,
        series: &YearSeries,
        curve: &TrendCurve,
        labels: &ChartLabels,
        path: &Path,
    ) -> Result<()>;
}
