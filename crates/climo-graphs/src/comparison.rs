//! Today versus the day-of-year baseline.

use crate::aggregator::BaselineTable;
use chrono::NaiveDate;
use climo_common::{CalendarKey, ClimoError, ObservationSeries, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Sign of today's deviation from the mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    /// Above the mean.
    Hotter,
    /// Below the mean.
    Cooler,
    /// Exactly on the mean.
    Equal,
}

impl Classification {
    /// Classifies a deviation (today minus mean).
    pub fn from_deviation(deviation: f64) -> Self {
        if deviation > 0.0 {
            Self::Hotter
        } else if deviation < 0.0 {
            Self::Cooler
        } else {
            Self::Equal
        }
    }

    /// Whether the message should say "hotter". Equal reads as "cooler".
    pub const fn is_hotter(self) -> bool {
        matches!(self, Self::Hotter)
    }
}

/// The values the summary is built from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TodaySnapshot {
    /// The day being reported.
    pub date: NaiveDate,
    /// Today's observed high.
    pub high: f64,
    /// Mean high for today's calendar day over the window.
    pub baseline_mean: f64,
    /// Record high for today's calendar day over the window.
    pub baseline_max: f64,
    /// Number of years behind the baseline.
    pub sample_count: usize,
}

/// Result of comparing today against its baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Raw values.
    pub snapshot: TodaySnapshot,
    /// `high - baseline_mean`, signed.
    pub deviation: f64,
    /// Sign of the deviation.
    pub classification: Classification,
}

impl Comparison {
    /// Magnitude of the deviation.
    pub fn abs_deviation(&self) -> f64 {
        self.deviation.abs()
    }
}

/// Looks up today's record and its baseline bucket.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaselineComparator;

impl BaselineComparator {
    /// Creates a comparator.
    pub const fn new() -> Self {
        Self
    }

    /// Fails with `DataUnavailable` when today has no record, no high, or
    /// no baseline bucket. The baseline includes today itself.
    #[instrument(skip(self, series, table))]
    pub fn compare(
        &self,
        series: &ObservationSeries,
        table: &BaselineTable,
        today: NaiveDate,
        lookback_years: u32,
    ) -> Result<Comparison> {
        let high = series
            .get(today)
            .and_then(|record| record.high)
            .filter(|h| h.is_finite())
            .ok_or_else(|| ClimoError::date_unavailable(today, lookback_years))?;

        let stats = table.require(CalendarKey::from_date(today), lookback_years)?;
        let deviation = high - stats.mean;
        let classification = Classification::from_deviation(deviation);

        debug!(
            high,
            mean = stats.mean,
            max = stats.max,
            deviation,
            ?classification,
            "Compared today against baseline"
        );

        Ok(Comparison {
            snapshot: TodaySnapshot {
                date: today,
                high,
                baseline_mean: stats.mean,
                baseline_max: stats.max,
                sample_count: stats.count,
            },
            deviation,
            classification,
        })
    }
}
