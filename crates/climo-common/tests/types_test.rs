//! Tests for the shared domain types in climo-common.
//!
//! This test suite covers:
//! - Calendar keys ordering and hashing as grouping keys
//! - Series invariants surviving conversion and concatenation
//! - Serialization of the types written to logs and config

use chrono::NaiveDate;
use climo_common::*;
use std::collections::{BTreeMap, HashMap};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_calendar_key_orders_by_month_then_day() {
    let mut buckets = BTreeMap::new();
    buckets.insert(CalendarKey::new(12, 1).unwrap(), "dec");
    buckets.insert(CalendarKey::new(1, 31).unwrap(), "jan");
    buckets.insert(CalendarKey::new(2, 29).unwrap(), "leap");

    let order: Vec<_> = buckets.values().copied().collect();
    assert_eq!(order, vec!["jan", "leap", "dec"]);
}

#[test]
fn test_calendar_key_ignores_year() {
    let mut counts: HashMap<CalendarKey, usize> = HashMap::new();
    for year in 2000..2010 {
        *counts.entry(CalendarKey::from_date(date(year, 7, 4))).or_default() += 1;
    }
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[&CalendarKey::new(7, 4).unwrap()], 10);
}

#[test]
fn test_unit_system_serialization() {
    assert_eq!(serde_json::to_string(&UnitSystem::Imperial).unwrap(), "\"imperial\"");
    let parsed: UnitSystem = serde_json::from_str("\"metric\"").unwrap();
    assert_eq!(parsed, UnitSystem::Metric);
    assert_eq!(UnitSystem::Imperial.temperature_suffix(), "F");
    assert_eq!(UnitSystem::Metric.temperature_suffix(), "C");
}

#[test]
fn test_series_keeps_missing_fields() {
    let series = ObservationSeries::new(
        UnitSystem::Metric,
        vec![
            DailyObservation {
                date: date(2023, 3, 1),
                high: None,
                low: Some(-1.0),
                mean: None,
                precipitation: Some(25.4),
            },
            DailyObservation::with_high(date(2023, 3, 2), 10.0),
        ],
    )
    .unwrap()
    .convert(UnitSystem::Imperial);

    let first = series.get(date(2023, 3, 1)).unwrap();
    assert_eq!(first.high, None);
    assert!((first.low.unwrap() - 30.2).abs() < 1e-9);
    assert!((first.precipitation.unwrap() - 1.0).abs() < 1e-9);
    assert_eq!(series.date_span(), Some((date(2023, 3, 1), date(2023, 3, 2))));
}

#[test]
fn test_for_key_spans_years() {
    let records = (2015..=2020)
        .flat_map(|y| {
            [
                DailyObservation::with_high(date(y, 5, 1), f64::from(y)),
                DailyObservation::with_high(date(y, 5, 2), 0.0),
            ]
        })
        .collect();
    let series = ObservationSeries::new(UnitSystem::Imperial, records).unwrap();

    let key = CalendarKey::new(5, 1).unwrap();
    let years: Vec<i32> = series.for_key(key).map(DailyObservation::year).collect();
    assert_eq!(years, (2015..=2020).collect::<Vec<_>>());
}

#[test]
fn test_empty_series() {
    let series = ObservationSeries::empty(UnitSystem::Metric);
    assert!(series.is_empty());
    assert_eq!(series.len(), 0);
    assert!(series.date_span().is_none());
}

#[test]
fn test_post_id_display() {
    assert_eq!(PostId("1234".to_string()).to_string(), "1234");
}
