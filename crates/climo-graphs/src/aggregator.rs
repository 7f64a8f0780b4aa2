//! Day-of-year aggregation: per-(month, day) mean and maximum of the daily
//! high across every year in a series.

use climo_common::{CalendarKey, ClimoError, ObservationSeries, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Aggregate of one calendar bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineStats {
    /// Arithmetic mean of the highs.
    pub mean: f64,
    /// Largest high.
    pub max: f64,
    /// Number of highs aggregated.
    pub count: usize,
}

/// Per-calendar-day baseline over the whole series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BaselineTable {
    entries: BTreeMap<CalendarKey, BaselineStats>,
}

impl BaselineTable {
    /// Stats for a bucket, if the series had any highs for it.
    pub fn get(&self, key: CalendarKey) -> Option<&BaselineStats> {
        self.entries.get(&key)
    }

    /// Stats for a bucket; a missing bucket is a data-availability error.
    pub fn require(&self, key: CalendarKey, lookback_years: u32) -> Result<&BaselineStats> {
        self.get(key)
            .ok_or_else(|| ClimoError::bucket_unavailable(key, lookback_years))
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no bucket has data.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Buckets in calendar order.
    pub fn iter(&self) -> impl Iterator<Item = (CalendarKey, &BaselineStats)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }
}

#[derive(Default)]
struct Accumulator {
    sum: f64,
    max: f64,
    count: usize,
}

impl Accumulator {
    fn push(&mut self, value: f64) {
        if self.count == 0 || value > self.max {
            self.max = value;
        }
        self.sum += value;
        self.count += 1;
    }

    fn finish(&self) -> BaselineStats {
        BaselineStats {
            mean: self.sum / self.count as f64,
            max: self.max,
            count: self.count,
        }
    }
}

/// Groups a series by calendar day.
#[derive(Debug, Clone, Copy, Default)]
pub struct DayOfYearAggregator;

impl DayOfYearAggregator {
    /// Creates an aggregator.
    pub const fn new() -> Self {
        Self
    }

    /// Builds the baseline table. Records without a high are skipped; a bucket
    /// whose highs are all missing gets no entry.
    #[instrument(skip_all, fields(records = series.len()))]
    pub fn aggregate(&self, series: &ObservationSeries) -> BaselineTable {
        let mut groups: BTreeMap<CalendarKey, Accumulator> = BTreeMap::new();
        for record in series {
            if let Some(high) = record.high.filter(|h| h.is_finite()) {
                groups.entry(record.key()).or_default().push(high);
            }
        }

        let entries: BTreeMap<_, _> = groups
            .into_iter()
            .map(|(key, acc)| (key, acc.finish()))
            .collect();
        debug!(buckets = entries.len(), "Baseline table built");
        BaselineTable { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use climo_common::{DailyObservation, UnitSystem};

    fn obs(y: i32, m: u32, d: u32, high: Option<f64>) -> DailyObservation {
        DailyObservation {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            high,
            low: None,
            mean: None,
            precipitation: None,
        }
    }

    fn key(m: u32, d: u32) -> CalendarKey {
        CalendarKey::new(m, d).unwrap()
    }

    #[test]
    fn test_mean_and_max_per_bucket() {
        let series = ObservationSeries::new(
            UnitSystem::Imperial,
            vec![
                obs(2020, 7, 4, Some(80.0)),
                obs(2020, 7, 5, Some(70.0)),
                obs(2021, 7, 4, Some(90.0)),
                obs(2021, 7, 5, Some(72.0)),
                obs(2022, 7, 4, Some(85.0)),
            ],
        )
        .unwrap();

        let table = DayOfYearAggregator::new().aggregate(&series);
        assert_eq!(table.len(), 2);

        let july4 = table.get(key(7, 4)).unwrap();
        assert!((july4.mean - 85.0).abs() < 1e-12);
        assert_eq!(july4.max, 90.0);
        assert_eq!(july4.count, 3);

        let july5 = table.get(key(7, 5)).unwrap();
        assert!((july5.mean - 71.0).abs() < 1e-12);
        assert_eq!(july5.max, 72.0);
    }

    #[test]
    fn test_singleton_and_negative_values() {
        let series = ObservationSeries::new(
            UnitSystem::Metric,
            vec![obs(2021, 1, 10, Some(-7.5)), obs(2022, 1, 11, Some(-3.0))],
        )
        .unwrap();

        let table = DayOfYearAggregator::new().aggregate(&series);
        let stats = table.get(key(1, 10)).unwrap();
        assert_eq!(stats.mean, -7.5);
        assert_eq!(stats.max, -7.5);
        assert_eq!(stats.count, 1);
    }

    #[test]
    fn test_missing_highs_are_skipped() {
        let series = ObservationSeries::new(
            UnitSystem::Imperial,
            vec![
                obs(2020, 3, 1, None),
                obs(2021, 3, 1, Some(50.0)),
                obs(2021, 3, 2, None),
            ],
        )
        .unwrap();

        let table = DayOfYearAggregator::new().aggregate(&series);
        assert_eq!(table.get(key(3, 1)).unwrap().count, 1);
        assert!(table.get(key(3, 2)).is_none());
        assert!(matches!(
            table.require(key(3, 2), 30),
            Err(ClimoError::DataUnavailable { .. })
        ));
    }

    #[test]
    fn test_empty_series_gives_empty_table_and_failing_lookups() {
        let table = DayOfYearAggregator::new().aggregate(&ObservationSeries::empty(UnitSystem::Imperial));
        assert!(table.is_empty());
        let err = table.require(key(1, 1), 30).unwrap_err();
        assert!(err.to_string().contains("01-01"));
    }

    #[test]
    fn test_leap_day_bucket_has_fewer_samples() {
        let series = climo_common::test_utils::series_fixtures::daily_series(
            NaiveDate::from_ymd_opt(2012, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            UnitSystem::Imperial,
            |_| Some(60.0),
        );
        let table = DayOfYearAggregator::new().aggregate(&series);
        assert_eq!(table.len(), 366);
        assert_eq!(table.get(key(2, 29)).unwrap().count, 3);
        assert_eq!(table.get(key(2, 28)).unwrap().count, 12);
    }
}
