//! Daily observation sources: the Meteostat JSON API and an in-memory replay.

use crate::traits::SeriesFetcher;
use async_trait::async_trait;
use chrono::{Duration as DayCount, Months, NaiveDate};
use climo_common::{
    years_before, ClimoError, DailyObservation, GeoPoint, ObservationSeries, Result, UnitSystem,
};
use climo_config::MeteostatConfig;
use reqwest::{Client, Response};
use serde::Deserialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Longest span the daily endpoint serves in one request.
pub const MAX_WINDOW_YEARS: u32 = 10;

/// `[today - lookback_years, today]`, with Feb 29 falling back to Feb 28 when
/// the start year has no leap day.
pub fn fetch_window(today: NaiveDate, lookback_years: u32) -> Result<(NaiveDate, NaiveDate)> {
    let start = years_before(today, lookback_years).ok_or_else(|| {
        ClimoError::validation_field(
            format!("{lookback_years} years before {today} is out of range"),
            "analysis.lookback_years",
        )
    })?;
    Ok((start, today))
}

/// Splits `[start, end]` into consecutive inclusive windows of at most
/// `max_years` years.
pub fn request_windows(
    start: NaiveDate,
    end: NaiveDate,
    max_years: u32,
) -> Vec<(NaiveDate, NaiveDate)> {
    let mut windows = Vec::new();
    let mut cursor = start;
    while cursor <= end {
        let window_end = cursor
            .checked_add_months(Months::new(max_years.max(1) * 12))
            .and_then(|next| next.checked_sub_signed(DayCount::days(1)))
            .map_or(end, |last| last.min(end));
        windows.push((cursor, window_end));
        match window_end.succ_opt() {
            Some(next) => cursor = next,
            None => break,
        }
    }
    windows
}

#[derive(Debug, Deserialize)]
struct DailyResponse {
    #[serde(default)]
    data: Vec<DailyRow>,
}

#[derive(Debug, Deserialize)]
struct DailyRow {
    date: NaiveDate,
    tavg: Option<f64>,
    tmin: Option<f64>,
    tmax: Option<f64>,
    prcp: Option<f64>,
}

impl From<DailyRow> for DailyObservation {
    fn from(row: DailyRow) -> Self {
        Self {
            date: row.date,
            high: row.tmax,
            low: row.tmin,
            mean: row.tavg,
            precipitation: row.prcp,
        }
    }
}

/// Parses a daily response body. Values are in metric units.
fn parse_daily(body: &str) -> Result<ObservationSeries> {
    let response: DailyResponse = serde_json::from_str(body)
        .map_err(|e| ClimoError::data_source_with_source("Malformed daily response", e))?;
    ObservationSeries::new(
        UnitSystem::Metric,
        response.data.into_iter().map(DailyObservation::from).collect(),
    )
}

/// Client for the Meteostat point/daily endpoint.
#[derive(Debug, Clone)]
pub struct MeteostatFetcher {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl MeteostatFetcher {
    /// Builds the client; fails on an unparsable base URL.
    pub fn new(base_url: &str, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(&format!("{}/point/daily", base_url.trim_end_matches('/')))
            .map_err(|e| {
                ClimoError::config_field(format!("invalid Meteostat URL: {e}"), "meteostat.base_url")
            })?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClimoError::data_source_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
        })
    }

    /// Builds the client from configuration.
    pub fn from_config(config: &MeteostatConfig) -> Result<Self> {
        Self::new(
            &config.base_url,
            config.api_key.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    #[instrument(skip(self, point), fields(lat = point.latitude, lon = point.longitude))]
    async fn fetch_chunk(
        &self,
        point: &GeoPoint,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ObservationSeries> {
        let mut query = vec![
            ("lat", point.latitude.to_string()),
            ("lon", point.longitude.to_string()),
            ("start", start.to_string()),
            ("end", end.to_string()),
        ];
        if let Some(alt) = point.elevation_m {
            query.push(("alt", alt.round().to_string()));
        }

        debug!("Requesting {} from {} to {}", self.endpoint, start, end);
        let mut request = self
            .client
            .get(self.endpoint.clone())
            .header("x-rapidapi-key", &self.api_key)
            .query(&query);
        if let Some(host) = self.endpoint.host_str() {
            request = request.header("x-rapidapi-host", host);
        }
        let response = request.send().await?;

        let body = Self::check_status(response).await?.text().await?;
        parse_daily(&body)
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let detail = response.text().await.unwrap_or_default();
        warn!("Meteostat returned {}: {}", status, detail);
        Err(ClimoError::data_source_with_status(
            format!("Meteostat returned {status}"),
            status.as_u16(),
        ))
    }
}

#[async_trait]
impl SeriesFetcher for MeteostatFetcher {
    #[instrument(skip(self, point))]
    async fn fetch_daily_series(
        &self,
        point: &GeoPoint,
        start: NaiveDate,
        end: NaiveDate,
        units: UnitSystem,
    ) -> Result<ObservationSeries> {
        let mut series = ObservationSeries::empty(UnitSystem::Metric);
        for (from, to) in request_windows(start, end, MAX_WINDOW_YEARS) {
            let chunk = self.fetch_chunk(point, from, to).await?;
            series = series.append(chunk)?;
        }

        info!("Fetched {} daily records from {} to {}", series.len(), start, end);
        Ok(series.convert(units))
    }
}

/// Serves a preloaded series; used for replays and tests.
#[derive(Debug)]
pub struct InMemoryFetcher {
    series: ObservationSeries,
    calls: AtomicUsize,
}

impl InMemoryFetcher {
    /// Fetcher over `series`.
    pub const fn new(series: ObservationSeries) -> Self {
        Self {
            series,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of fetches served.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SeriesFetcher for InMemoryFetcher {
    async fn fetch_daily_series(
        &self,
        _point: &GeoPoint,
        start: NaiveDate,
        end: NaiveDate,
        units: UnitSystem,
    ) -> Result<ObservationSeries> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let records = self
            .series
            .iter()
            .filter(|r| r.date >= start && r.date <= end)
            .cloned()
            .collect();
        Ok(ObservationSeries::new(self.series.units(), records)?.convert(units))
    }
}
