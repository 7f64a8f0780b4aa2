//! Configuration schema definitions using serde.

use climo_common::{GeoPoint, LoggingConfig, UnitSystem};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for Climo Bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the observations are taken.
    pub location: LocationConfig,
    /// Baseline and trend settings.
    pub analysis: AnalysisConfig,
    /// Chart artifact settings.
    pub chart: ChartConfig,
    /// Meteostat API configuration.
    pub meteostat: MeteostatConfig,
    /// Discord posting configuration.
    pub discord: DiscordConfig,
    /// Publisher selection.
    pub publisher: PublisherConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// The fixed location the briefing is about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// Short display name used as the message prefix.
    pub name: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Elevation in metres.
    pub elevation_m: Option<f64>,
}

impl LocationConfig {
    /// The coordinates as a geographic point.
    pub const fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude, self.elevation_m)
    }
}

/// Baseline and trend settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Lookback window N in years.
    pub lookback_years: u32,
    /// Measurement system for fetched values and message units.
    pub units: UnitSystem,
    /// Whether to fit the trend and attach a chart.
    pub chart_enabled: bool,
    /// Locale of the composed message.
    pub locale: String,
}

/// Chart artifact settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Fixed output file, overwritten on every run.
    pub output_path: PathBuf,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

/// Meteostat API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeteostatConfig {
    /// API base URL.
    pub base_url: String,
    /// RapidAPI key.
    pub api_key: String,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
}

/// Discord posting configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// Bot token.
    pub token: String,
    /// Channel the briefing is posted to.
    pub channel_id: u64,
}

/// Publisher selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublisherConfig {
    /// Print instead of posting.
    pub dry_run: bool,
}
