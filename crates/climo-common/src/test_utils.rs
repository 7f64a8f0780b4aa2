//! Test utilities and shared fixtures for the Climo workspace.
//!
//! Enabled for downstream crates through the `testing` feature.

use crate::types::{CalendarKey, DailyObservation, ObservationSeries, UnitSystem};
use chrono::NaiveDate;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize logging for tests once per process.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(filter)
            .try_init();
    });
}

/// Shorthand for a valid calendar date.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Create a temporary directory for tests that automatically cleans up.
#[cfg(feature = "tempfile")]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Synthetic observation series.
pub mod series_fixtures {
    use super::*;
    use chrono::{Datelike, Duration};

    /// One record per day over `[start, end]`, high given by `high_for`.
    pub fn daily_series(
        start: NaiveDate,
        end: NaiveDate,
        units: UnitSystem,
        high_for: impl Fn(NaiveDate) -> Option<f64>,
    ) -> ObservationSeries {
        let days = (end - start).num_days();
        let records = (0..=days)
            .map(|offset| start + Duration::days(offset))
            .map(|d| DailyObservation {
                date: d,
                high: high_for(d),
                low: None,
                mean: None,
                precipitation: None,
            })
            .collect();
        ObservationSeries::new(units, records).expect("fixture dates are increasing")
    }

    /// One record per year on `key`, for every year in `years` that has it.
    pub fn yearly_series(
        key: CalendarKey,
        years: std::ops::RangeInclusive<i32>,
        units: UnitSystem,
        high_for: impl Fn(i32) -> f64,
    ) -> ObservationSeries {
        let records = years
            .filter_map(|year| key.in_year(year))
            .map(|d| DailyObservation::with_high(d, high_for(d.year())))
            .collect();
        ObservationSeries::new(units, records).expect("fixture dates are increasing")
    }

    /// A daily series with a seasonal cycle, a warming drift and deterministic
    /// year-to-year wiggle; realistic enough for end-to-end runs.
    pub fn seasonal_series(start: NaiveDate, end: NaiveDate) -> ObservationSeries {
        daily_series(start, end, UnitSystem::Imperial, |d| {
            let doy = f64::from(d.ordinal());
            let years = f64::from(d.year() - start.year());
            let seasonal = 62.0 - 22.0 * (2.0 * std::f64::consts::PI * (doy + 10.0) / 365.25).cos();
            let wiggle = 4.0 * (f64::from(d.year()) * 1.7 + doy * 0.3).sin();
            Some(seasonal + 0.05 * years + wiggle)
        })
    }
}

/// Property-test strategies.
#[cfg(feature = "proptest")]
pub mod strategies {
    use super::*;
    use proptest::prelude::*;

    /// A daily series over a random span of up to `max_years` years with
    /// highs in a plausible Fahrenheit range and occasional gaps.
    pub fn arb_series(max_years: i32) -> impl Strategy<Value = ObservationSeries> {
        (2000..2020i32, 1..=max_years.max(1))
            .prop_flat_map(|(first_year, span)| {
                let start = date(first_year, 1, 1);
                let end = date(first_year + span - 1, 12, 31);
                let days = usize::try_from((end - start).num_days() + 1).unwrap_or(0);
                (
                    Just(start),
                    prop::collection::vec(prop::option::weighted(0.95, -20.0f64..110.0), days),
                )
            })
            .prop_map(|(start, highs)| {
                let records = highs
                    .into_iter()
                    .enumerate()
                    .map(|(offset, high)| DailyObservation {
                        date: start + chrono::Duration::days(offset as i64),
                        high,
                        low: None,
                        mean: None,
                        precipitation: None,
                    })
                    .collect();
                ObservationSeries::new(UnitSystem::Imperial, records)
                    .expect("generated dates are increasing")
            })
    }
}
