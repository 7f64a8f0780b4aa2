//! Runtime validation of a loaded configuration.

use crate::schema::Config;
use climo_common::{ClimoError, Result};

/// Longest lookback the data source can plausibly serve.
pub const MAX_LOOKBACK_YEARS: u32 = 150;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration, reporting the first offending field.
    pub fn validate(config: &Config) -> Result<()> {
        let location = &config.location;
        if location.name.trim().is_empty() {
            return Err(ClimoError::config_field(
                "location name cannot be empty",
                "location.name",
            ));
        }
        if !(-90.0..=90.0).contains(&location.latitude) {
            return Err(ClimoError::config_field(
                format!("latitude {} is outside [-90, 90]", location.latitude),
                "location.latitude",
            ));
        }
        if !(-180.0..=180.0).contains(&location.longitude) {
            return Err(ClimoError::config_field(
                format!("longitude {} is outside [-180, 180]", location.longitude),
                "location.longitude",
            ));
        }

        let lookback = config.analysis.lookback_years;
        if !(1..=MAX_LOOKBACK_YEARS).contains(&lookback) {
            return Err(ClimoError::config_field(
                format!("lookback of {lookback} years is outside [1, {MAX_LOOKBACK_YEARS}]"),
                "analysis.lookback_years",
            ));
        }

        if config.analysis.chart_enabled {
            if config.chart.width == 0 || config.chart.height == 0 {
                return Err(ClimoError::config_field(
                    "chart dimensions must be non-zero",
                    "chart.width",
                ));
            }
            let is_png = config
                .chart
                .output_path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
            if !is_png {
                return Err(ClimoError::config_field(
                    format!(
                        "chart output '{}' must be a .png file",
                        config.chart.output_path.display()
                    ),
                    "chart.output_path",
                ));
            }
        }

        if config.meteostat.base_url.trim().is_empty() {
            return Err(ClimoError::config_field(
                "Meteostat base URL cannot be empty",
                "meteostat.base_url",
            ));
        }
        if config.meteostat.api_key.trim().is_empty() {
            return Err(ClimoError::config_field(
                "Meteostat API key cannot be empty",
                "meteostat.api_key",
            ));
        }
        if config.meteostat.timeout_seconds == 0 {
            return Err(ClimoError::config_field(
                "Meteostat timeout must be positive",
                "meteostat.timeout_seconds",
            ));
        }

        if !config.publisher.dry_run {
            if config.discord.token.trim().is_empty() {
                return Err(ClimoError::config_field(
                    "Discord token cannot be empty",
                    "discord.token",
                ));
            }
            if config.discord.channel_id == 0 {
                return Err(ClimoError::config_field(
                    "Discord channel id must be set",
                    "discord.channel_id",
                ));
            }
        }

        Ok(())
    }
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        ConfigValidator::validate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        let mut config = Config::default();
        config.meteostat.api_key = "key".to_string();
        config.discord.token = "token".to_string();
        config.discord.channel_id = 42;
        config
    }

    fn failing_field(config: &Config) -> String {
        match config.validate() {
            Err(ClimoError::Configuration {
                field: Some(field), ..
            }) => field,
            other => panic!("expected a configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_coordinates_are_range_checked() {
        let mut config = valid();
        config.location.latitude = 91.0;
        assert_eq!(failing_field(&config), "location.latitude");

        let mut config = valid();
        config.location.longitude = -180.5;
        assert_eq!(failing_field(&config), "location.longitude");
    }

    #[test]
    fn test_lookback_bounds() {
        let mut config = valid();
        config.analysis.lookback_years = 0;
        assert_eq!(failing_field(&config), "analysis.lookback_years");

        config.analysis.lookback_years = MAX_LOOKBACK_YEARS + 1;
        assert_eq!(failing_field(&config), "analysis.lookback_years");
    }

    #[test]
    fn test_chart_path_must_be_png_only_when_charting() {
        let mut config = valid();
        config.chart.output_path = "trend.jpg".into();
        assert_eq!(failing_field(&config), "chart.output_path");

        config.analysis.chart_enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_dry_run_skips_discord_credentials() {
        let mut config = valid();
        config.discord.token.clear();
        assert_eq!(failing_field(&config), "discord.token");

        config.publisher.dry_run = true;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_api_key() {
        let mut config = valid();
        config.meteostat.api_key = "  ".to_string();
        assert_eq!(failing_field(&config), "meteostat.api_key");
    }
}
