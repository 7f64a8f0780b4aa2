//! Configuration loading: YAML file discovery plus environment overrides.

use crate::schema::Config;
use climo_common::{ClimoError, Result as ClimoResult};
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_VAR: &str = "CLIMO_CONFIG_PATH";

/// Files probed in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILES: [&str; 2] = ["climo.yaml", "climo.yml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file '{path}': {source}")]
    IoError {
        /// File that could not be read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        /// Variable name
        var: String,
        /// Underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for ClimoError {
    fn from(err: ConfigError) -> Self {
        let field = match &err {
            ConfigError::EnvParseError { var, .. } => Some(var.clone()),
            _ => None,
        };
        ClimoError::Configuration {
            message: err.to_string(),
            field,
        }
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Resolves the configuration: explicit path, then `CLIMO_CONFIG_PATH`,
    /// then `climo.yaml`/`climo.yml`, then defaults; environment overrides
    /// are applied last.
    ///
    /// Validation is left to the caller so command-line overrides take part in it.
    pub fn load(explicit: Option<&Path>) -> ClimoResult<Config> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env::var(CONFIG_PATH_VAR).ok().map(PathBuf::from))
            .or_else(|| {
                DEFAULT_CONFIG_FILES
                    .iter()
                    .map(PathBuf::from)
                    .find(|candidate| candidate.exists())
            });

        let mut config = match path {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                Self::load_from_file(&path)?
            }
            None => {
                info!("No configuration file found, using defaults");
                Config::default()
            }
        };

        Self::apply_env_overrides(&mut config)?;
        Ok(config)
    }

    /// Parses a YAML file without applying overrides.
    pub fn load_from_file(path: &Path) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load_from_str(&content)
    }

    /// Parses YAML text; absent sections keep their defaults.
    pub fn load_from_str(content: &str) -> Result<Config, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply process environment overrides to configuration
    pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        Self::apply_overrides(config, |var| env::var(var).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_overrides(
        config: &mut Config,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        // Location
        if let Some(name) = lookup("CLIMO_LOCATION_NAME") {
            config.location.name = name;
        }
        if let Some(value) = lookup("CLIMO_LATITUDE") {
            config.location.latitude = parse_var("CLIMO_LATITUDE", &value)?;
        }
        if let Some(value) = lookup("CLIMO_LONGITUDE") {
            config.location.longitude = parse_var("CLIMO_LONGITUDE", &value)?;
        }
        if let Some(value) = lookup("CLIMO_ELEVATION") {
            config.location.elevation_m = Some(parse_var("CLIMO_ELEVATION", &value)?);
        }

        // Analysis
        if let Some(value) = lookup("CLIMO_LOOKBACK_YEARS") {
            config.analysis.lookback_years = parse_var("CLIMO_LOOKBACK_YEARS", &value)?;
        }
        if let Some(value) = lookup("CLIMO_UNITS") {
            config.analysis.units = parse_var("CLIMO_UNITS", &value)?;
        }
        if let Some(value) = lookup("CLIMO_CHART_ENABLED") {
            config.analysis.chart_enabled = parse_flag("CLIMO_CHART_ENABLED", &value)?;
        }
        if let Some(locale) = lookup("CLIMO_LOCALE") {
            config.analysis.locale = locale;
        }
        if let Some(path) = lookup("CLIMO_CHART_PATH") {
            config.chart.output_path = PathBuf::from(path);
        }

        // Meteostat
        if let Some(api_key) = lookup("METEOSTAT_API_KEY") {
            config.meteostat.api_key = api_key;
        }
        if let Some(url) = lookup("METEOSTAT_BASE_URL") {
            config.meteostat.base_url = url;
        }

        // Discord
        if let Some(token) = lookup("DISCORD_TOKEN") {
            config.discord.token = token;
        }
        if let Some(value) = lookup("DISCORD_CHANNEL_ID") {
            config.discord.channel_id = parse_var("DISCORD_CHANNEL_ID", &value)?;
        }
        if let Some(value) = lookup("CLIMO_DRY_RUN") {
            config.publisher.dry_run = parse_flag("CLIMO_DRY_RUN", &value)?;
        }

        // Logging
        if let Some(level) = lookup("CLIMO_LOG_LEVEL") {
            config.logging.level = level;
        }

        debug!("Environment overrides applied");
        Ok(())
    }
}

fn parse_var<T>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.trim().parse().map_err(|e| ConfigError::EnvParseError {
        var: var.to_string(),
        source: Box::new(e),
    })
}

fn parse_flag(var: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::EnvParseError {
            var: var.to_string(),
            source: format!("'{other}' is not a boolean").into(),
        }),
    }
}
