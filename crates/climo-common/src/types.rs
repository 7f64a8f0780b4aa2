//! Domain types shared across the workspace: calendar buckets, unit systems,
//! daily observations and the series a fetcher hands to the pipeline.

use crate::error::{ClimoError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Leap year used to validate (month, day) pairs so that Feb 29 is accepted.
const REFERENCE_LEAP_YEAR: i32 = 2000;

/// A (month, day) bucket identifying a day of the year independent of year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CalendarKey {
    month: u32,
    day: u32,
}

impl CalendarKey {
    /// Creates a key, rejecting pairs that never occur (Feb 30, Apr 31, ...).
    pub fn new(month: u32, day: u32) -> Result<Self> {
        if NaiveDate::from_ymd_opt(REFERENCE_LEAP_YEAR, month, day).is_none() {
            return Err(ClimoError::validation_field(
                format!("{month:02}-{day:02} is not a valid calendar day"),
                "calendar_key",
            ));
        }
        Ok(Self { month, day })
    }

    /// The bucket a date falls into.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }

    /// Month, 1-based.
    pub const fn month(self) -> u32 {
        self.month
    }

    /// Day of month, 1-based.
    pub const fn day(self) -> u32 {
        self.day
    }

    /// Whether this is the Feb 29 bucket.
    pub const fn is_leap_day(self) -> bool {
        self.month == 2 && self.day == 29
    }

    /// The date this bucket falls on in `year`, if that year has it.
    pub fn in_year(self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
    }
}

impl fmt::Display for CalendarKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

/// Measurement system for temperatures and precipitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Degrees Celsius, millimetres.
    Metric,
    /// Degrees Fahrenheit, inches.
    #[default]
    Imperial,
}

impl UnitSystem {
    /// Suffix printed after the degree sign.
    pub const fn temperature_suffix(self) -> &'static str {
        match self {
            Self::Metric => "C",
            Self::Imperial => "F",
        }
    }

    /// Converts a temperature expressed in `from` into this system.
    pub fn convert_temperature(self, value: f64, from: Self) -> f64 {
        match (from, self) {
            (Self::Metric, Self::Imperial) => value * 9.0 / 5.0 + 32.0,
            (Self::Imperial, Self::Metric) => (value - 32.0) * 5.0 / 9.0,
            _ => value,
        }
    }

    /// Converts a precipitation depth expressed in `from` into this system.
    pub fn convert_precipitation(self, value: f64, from: Self) -> f64 {
        match (from, self) {
            (Self::Metric, Self::Imperial) => value / 25.4,
            (Self::Imperial, Self::Metric) => value * 25.4,
            _ => value,
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => f.write_str("metric"),
            Self::Imperial => f.write_str("imperial"),
        }
    }
}

impl FromStr for UnitSystem {
    type Err = ClimoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metric" | "si" => Ok(Self::Metric),
            "imperial" | "us" => Ok(Self::Imperial),
            other => Err(ClimoError::validation_field(
                format!("unknown unit system '{other}' (expected 'metric' or 'imperial')"),
                "units",
            )),
        }
    }
}

/// A fixed geographic point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Station elevation in metres, if known.
    pub elevation_m: Option<f64>,
}

impl GeoPoint {
    /// Creates a point.
    pub const fn new(latitude: f64, longitude: f64, elevation_m: Option<f64>) -> Self {
        Self {
            latitude,
            longitude,
            elevation_m,
        }
    }
}

/// One day of observations. Any field may be missing at the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyObservation {
    /// Observation date.
    pub date: NaiveDate,
    /// Daily maximum temperature.
    pub high: Option<f64>,
    /// Daily minimum temperature.
    pub low: Option<f64>,
    /// Daily mean temperature.
    pub mean: Option<f64>,
    /// Total precipitation.
    pub precipitation: Option<f64>,
}

impl DailyObservation {
    /// An observation carrying only the daily high.
    pub const fn with_high(date: NaiveDate, high: f64) -> Self {
        Self {
            date,
            high: Some(high),
            low: None,
            mean: None,
            precipitation: None,
        }
    }

    /// Calendar bucket of this record.
    pub fn key(&self) -> CalendarKey {
        CalendarKey::from_date(self.date)
    }

    /// Year of this record.
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    fn converted(&self, to: UnitSystem, from: UnitSystem) -> Self {
        let temp = |v: Option<f64>| v.map(|v| to.convert_temperature(v, from));
        Self {
            date: self.date,
            high: temp(self.high),
            low: temp(self.low),
            mean: temp(self.mean),
            precipitation: self
                .precipitation
                .map(|v| to.convert_precipitation(v, from)),
        }
    }
}

/// Daily records ordered by strictly increasing date, in one unit system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationSeries {
    units: UnitSystem,
    records: Vec<DailyObservation>,
}

impl ObservationSeries {
    /// Builds a series, rejecting unordered or duplicated dates.
    pub fn new(units: UnitSystem, records: Vec<DailyObservation>) -> Result<Self> {
        if let Some(pair) = records.windows(2).find(|w| w[0].date >= w[1].date) {
            let message = if pair[0].date == pair[1].date {
                format!("duplicate observation for {}", pair[1].date)
            } else {
                format!(
                    "observations out of order: {} precedes {}",
                    pair[0].date, pair[1].date
                )
            };
            return Err(ClimoError::validation_field(message, "date"));
        }
        Ok(Self { units, records })
    }

    /// An empty series.
    pub const fn empty(units: UnitSystem) -> Self {
        Self {
            units,
            records: Vec::new(),
        }
    }

    /// Unit system of every temperature and precipitation value.
    pub const fn units(&self) -> UnitSystem {
        self.units
    }

    /// Number of daily records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the series holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in date order.
    pub fn records(&self) -> &[DailyObservation] {
        &self.records
    }

    /// Iterates records in date order.
    pub fn iter(&self) -> std::slice::Iter<'_, DailyObservation> {
        self.records.iter()
    }

    /// Looks up the record for an exact date.
    pub fn get(&self, date: NaiveDate) -> Option<&DailyObservation> {
        self.records
            .binary_search_by_key(&date, |r| r.date)
            .ok()
            .map(|idx| &self.records[idx])
    }

    /// First and last dates, if any.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.records.first()?.date, self.records.last()?.date))
    }

    /// Records falling in the given calendar bucket, oldest first.
    pub fn for_key(&self, key: CalendarKey) -> impl Iterator<Item = &DailyObservation> + '_ {
        self.records.iter().filter(move |r| r.key() == key)
    }

    /// Re-expresses every value in `target` units.
    #[must_use]
    pub fn convert(self, target: UnitSystem) -> Self {
        if self.units == target {
            return self;
        }
        let from = self.units;
        Self {
            units: target,
            records: self
                .records
                .iter()
                .map(|r| r.converted(target, from))
                .collect(),
        }
    }

    /// Appends a later series, e.g. the next window of a chunked fetch.
    pub fn append(mut self, other: Self) -> Result<Self> {
        let other = other.convert(self.units);
        self.records.extend(other.records);
        Self::new(self.units, self.records)
    }
}

impl<'a> IntoIterator for &'a ObservationSeries {
    type Item = &'a DailyObservation;
    type IntoIter = std::slice::Iter<'a, DailyObservation>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Identifier returned by a publisher for a created post.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostId(pub String);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
