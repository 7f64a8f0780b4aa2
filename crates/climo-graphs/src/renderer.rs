//! Plotters rendering of the year-over-year trend chart.

use crate::trend::{TrendCurve, YearSeries};
use crate::traits::ChartRenderer;
use crate::utils::finite_bounds;
use climo_common::{CalendarKey, ClimoError, Result, UnitSystem};
use climo_config::ChartConfig;
use climo_i18n::{FluentArgs, MessageCatalog, MessageId};
use plotters::prelude::*;
use std::path::Path;
use tracing::{debug, info, instrument};

const HISTORY_COLOR: RGBColor = RGBColor(31, 119, 180);
const CURRENT_COLOR: RGBColor = RGBColor(214, 39, 40);
const TREND_COLOR: RGBColor = RGBColor(255, 127, 14);

/// Localized text drawn on the chart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChartLabels {
    /// Caption above the plot.
    pub title: String,
    /// X axis description.
    pub x_axis: String,
    /// Y axis description.
    pub y_axis: String,
    /// Legend entry for earlier years.
    pub history: String,
    /// Legend entry for the highlighted year.
    pub current: String,
    /// Legend entry for the fitted curve.
    pub trend: String,
    /// Legend entry for the band.
    pub band: String,
}

impl ChartLabels {
    /// Formats every label from the catalog.
    pub fn from_catalog(
        catalog: &MessageCatalog,
        location: &str,
        key: CalendarKey,
        first_year: i32,
        last_year: i32,
        units: UnitSystem,
    ) -> Result<Self> {
        let mut title_args = FluentArgs::new();
        title_args.set("location", location);
        title_args.set("day", key.to_string());
        title_args.set("first", first_year.to_string());
        title_args.set("last", last_year.to_string());

        let mut unit_args = FluentArgs::new();
        unit_args.set("unit", units.temperature_suffix());

        let mut year_args = FluentArgs::new();
        year_args.set("year", last_year.to_string());

        Ok(Self {
            title: catalog.format(MessageId::ChartTitle, Some(&title_args))?,
            x_axis: catalog.format(MessageId::ChartAxisYear, None)?,
            y_axis: catalog.format(MessageId::ChartAxisHigh, Some(&unit_args))?,
            history: catalog.format(MessageId::ChartLegendHistory, None)?,
            current: catalog.format(MessageId::ChartLegendCurrent, Some(&year_args))?,
            trend: catalog.format(MessageId::ChartLegendTrend, None)?,
            band: catalog.format(MessageId::ChartLegendBand, None)?,
        })
    }
}

/// Axis ranges for the chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotBounds {
    /// Year axis.
    pub x: (f64, f64),
    /// Temperature axis.
    pub y: (f64, f64),
}

impl PlotBounds {
    /// Covers every point, the curve and the band, with a little padding.
    pub fn compute(series: &YearSeries, curve: &TrendCurve) -> Result<Self> {
        let x = finite_bounds(
            series
                .points()
                .iter()
                .map(|p| f64::from(p.year))
                .chain(curve.grid.iter().copied()),
        )
        .ok_or_else(|| ClimoError::graph("nothing to plot"))?;

        let y = finite_bounds(
            series
                .points()
                .iter()
                .map(|p| p.high)
                .chain(curve.upper().map(|(_, v)| v))
                .chain(curve.lower().map(|(_, v)| v)),
        )
        .ok_or_else(|| ClimoError::graph("no finite temperatures to plot"))?;

        let y_pad = ((y.1 - y.0) * 0.05).max(1.0);
        Ok(Self {
            x: (x.0 - 0.5, x.1 + 0.5),
            y: (y.0 - y_pad, y.1 + y_pad),
        })
    }
}

/// PNG renderer backed by the plotters bitmap backend.
#[derive(Debug, Clone, Copy)]
pub struct TrendChartRenderer {
    width: u32,
    height: u32,
}

impl TrendChartRenderer {
    /// Renderer producing `width` x `height` images.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Renderer sized from configuration.
    pub const fn from_config(config: &ChartConfig) -> Self {
        Self::new(config.width, config.height)
    }

    fn draw(
        &self,
        series: &YearSeries,
        curve: &TrendCurve,
        labels: &ChartLabels,
        target: &Path,
    ) -> Result<()> {
        let bounds = PlotBounds::compute(series, curve)?;

        let root = BitMapBackend::new(target, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(drawing("fill background"))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&labels.title, ("sans-serif", 28))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(bounds.x.0..bounds.x.1, bounds.y.0..bounds.y.1)
            .map_err(drawing("build chart"))?;

        chart
            .configure_mesh()
            .x_desc(labels.x_axis.as_str())
            .y_desc(labels.y_axis.as_str())
            .x_label_formatter(&|x| format!("{x:.0}"))
            .y_label_formatter(&|y| format!("{y:.0}"))
            .draw()
            .map_err(drawing("draw mesh"))?;

        // Band first so the markers and the line sit on top of it
        let band: Vec<(f64, f64)> = curve
            .upper()
            .chain(curve.lower().collect::<Vec<_>>().into_iter().rev())
            .collect();
        chart
            .draw_series(std::iter::once(Polygon::new(band, TREND_COLOR.mix(0.2))))
            .map_err(drawing("draw band"))?
            .label(labels.band.as_str())
            .legend(|(x, y)| {
                Rectangle::new([(x, y - 5), (x + 12, y + 5)], TREND_COLOR.mix(0.2).filled())
            });

        chart
            .draw_series(LineSeries::new(curve.line(), TREND_COLOR.stroke_width(2)))
            .map_err(drawing("draw trend"))?
            .label(labels.trend.as_str())
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 12, y)], TREND_COLOR.stroke_width(2)));

        chart
            .draw_series(
                series
                    .history()
                    .map(|p| Circle::new((f64::from(p.year), p.high), 4, HISTORY_COLOR.filled())),
            )
            .map_err(drawing("draw history"))?
            .label(labels.history.as_str())
            .legend(|(x, y)| Circle::new((x + 6, y), 4, HISTORY_COLOR.filled()));

        chart
            .draw_series(
                series
                    .most_recent()
                    .map(|p| Circle::new((f64::from(p.year), p.high), 8, CURRENT_COLOR.filled())),
            )
            .map_err(drawing("draw current year"))?
            .label(labels.current.as_str())
            .legend(|(x, y)| Circle::new((x + 6, y), 6, CURRENT_COLOR.filled()));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK)
            .draw()
            .map_err(drawing("draw legend"))?;

        root.present().map_err(drawing("write image"))?;
        Ok(())
    }
}

impl Default for TrendChartRenderer {
    fn default() -> Self {
        Self::new(1200, 800)
    }
}

impl ChartRenderer for TrendChartRenderer {
    /// Draws into a temporary file next to `path` and renames it into place
    /// once the backend has flushed; the temporary file is removed on any
    /// failure, so `path` is either the previous image or the complete new one.
    #[instrument(skip(self, series, curve, labels), fields(path = %path.display()))]
    fn render(
        &self,
        series: &YearSeries,
        curve: &TrendCurve,
        labels: &ChartLabels,
        path: &Path,
    ) -> Result<()> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let staging = tempfile::Builder::new()
            .prefix(".climo-chart-")
            .suffix(".png")
            .tempfile_in(dir)
            .map_err(|e| ClimoError::graph_with_source("cannot create temporary chart file", e))?;
        debug!("Drawing chart into {}", staging.path().display());

        self.draw(series, curve, labels, staging.path())?;

        staging
            .persist(path)
            .map_err(|e| ClimoError::graph_with_source("cannot move chart into place", e.error))?;

        info!("Chart written to {}", path.display());
        Ok(())
    }
}

fn drawing<E>(stage: &'static str) -> impl FnOnce(E) -> ClimoError
where
    E: std::error::Error + Send + Sync + 'static,
{
    move |e| ClimoError::graph_with_source(format!("failed to {stage}"), e)
}
