//! End-to-end runs of the analysis stages over synthetic data.

use climo_common::test_utils::{
    assert_approx_eq, date, init_test_logging,
    series_fixtures::{seasonal_series, yearly_series},
};
use climo_common::{CalendarKey, ClimoError, GeoPoint, UnitSystem};
use climo_graphs::{
    fetch_window, BaselineComparator, DayOfYearAggregator, InMemoryFetcher, MessageComposer,
    SeriesFetcher, TrendEstimator, YearSeries,
};
use climo_i18n::MessageCatalog;

const LOOKBACK: u32 = 30;

fn nyc() -> GeoPoint {
    GeoPoint::new(40.7789, -73.9692, Some(3.0))
}

#[tokio::test]
async fn test_full_analysis_over_thirty_years() {
    init_test_logging();
    let today = date(2024, 7, 4);
    let fetcher = InMemoryFetcher::new(seasonal_series(date(1990, 1, 1), today));

    let (start, end) = fetch_window(today, LOOKBACK).unwrap();
    let series = fetcher
        .fetch_daily_series(&nyc(), start, end, UnitSystem::Imperial)
        .await
        .unwrap();
    assert_eq!(series.date_span(), Some((date(1994, 7, 4), today)));

    let table = DayOfYearAggregator::new().aggregate(&series);
    let comparison = BaselineComparator::new()
        .compare(&series, &table, today, LOOKBACK)
        .unwrap();
    assert_eq!(comparison.snapshot.sample_count, 31);
    assert!(comparison.snapshot.baseline_max >= comparison.snapshot.high);

    let key = CalendarKey::from_date(today);
    let years = YearSeries::from_series(&series, key);
    assert_eq!(years.len(), 31);
    let curve = TrendEstimator::default().estimate(&years, 1994, 2024).unwrap();
    assert_eq!(curve.grid.first(), Some(&1994.0));
    assert_eq!(curve.grid.last(), Some(&2024.0));

    let catalog = MessageCatalog::for_locale("en-US").unwrap();
    let text = MessageComposer::new(&catalog, "NYC")
        .compose(&comparison, LOOKBACK, UnitSystem::Imperial)
        .unwrap();
    assert!(text.starts_with("NYC: The high today is "));
    assert!(text.contains("than today's 30-year average.\n\nThe 30-year historical high for today is "));
    assert!(text.ends_with("°F."));
}

#[tokio::test]
async fn test_today_not_yet_published() {
    let today = date(2024, 7, 4);
    let fetcher = InMemoryFetcher::new(seasonal_series(date(1994, 1, 1), date(2024, 7, 3)));

    let (start, end) = fetch_window(today, LOOKBACK).unwrap();
    let series = fetcher
        .fetch_daily_series(&nyc(), start, end, UnitSystem::Imperial)
        .await
        .unwrap();
    let table = DayOfYearAggregator::new().aggregate(&series);

    let err = BaselineComparator::new()
        .compare(&series, &table, today, LOOKBACK)
        .unwrap_err();
    assert!(matches!(err, ClimoError::DataUnavailable { .. }));
    assert!(!err.is_chart_only());
}

#[test]
fn test_linear_trend_end_to_end() {
    let key = CalendarKey::new(8, 15).unwrap();
    let raw = yearly_series(key, 2014..=2024, UnitSystem::Imperial, |y| {
        50.0 + f64::from(y - 2014)
    });
    let years = YearSeries::from_series(&raw, key);
    let curve = TrendEstimator::default().estimate(&years, 2014, 2024).unwrap();

    assert_approx_eq(curve.fitted[0], 50.0, 0.25);
    assert_approx_eq(curve.fitted[curve.len() - 1], 60.0, 0.25);
}

#[test]
fn test_short_window_fails_only_the_chart() {
    let key = CalendarKey::new(7, 4).unwrap();
    let raw = yearly_series(key, 2021..=2024, UnitSystem::Imperial, |y| 70.0 + f64::from(y % 4));
    let table = DayOfYearAggregator::new().aggregate(&raw);

    assert!(BaselineComparator::new()
        .compare(&raw, &table, date(2024, 7, 4), 3)
        .is_ok());

    let err = TrendEstimator::default()
        .estimate(&YearSeries::from_series(&raw, key), 2021, 2024)
        .unwrap_err();
    assert!(err.is_chart_only());
}
