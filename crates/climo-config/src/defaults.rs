//! Default values for every configuration section.

use crate::schema::*;
use climo_common::{LoggingConfig, UnitSystem};
use std::path::PathBuf;

/// Default lookback window in years.
pub const DEFAULT_LOOKBACK_YEARS: u32 = 30;

/// Default chart filename.
pub const DEFAULT_CHART_PATH: &str = "daily_high_trend.png";

/// Default Meteostat endpoint.
pub const DEFAULT_METEOSTAT_URL: &str = "https://meteostat.p.rapidapi.com";

impl Default for Config {
    fn default() -> Self {
        Self {
            location: LocationConfig::default(),
            analysis: AnalysisConfig::default(),
            chart: ChartConfig::default(),
            meteostat: MeteostatConfig::default(),
            discord: DiscordConfig::default(),
            publisher: PublisherConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        // Central Park, New York
        Self {
            name: "NYC".to_string(),
            latitude: 40.7789,
            longitude: -73.9692,
            elevation_m: Some(3.0),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            lookback_years: DEFAULT_LOOKBACK_YEARS,
            units: UnitSystem::Imperial,
            chart_enabled: true,
            locale: "en-US".to_string(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_CHART_PATH),
            width: 1200,
            height: 800,
        }
    }
}

impl Default for MeteostatConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_METEOSTAT_URL.to_string(),
            api_key: String::new(),
            timeout_seconds: 30,
        }
    }
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            channel_id: 0,
        }
    }
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self { dry_run: false }
    }
}
