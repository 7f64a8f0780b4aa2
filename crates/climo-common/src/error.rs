//! Error types and utilities for Climo

use crate::types::CalendarKey;
use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for Climo operations
pub type Result<T> = std::result::Result<T, ClimoError>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for Climo operations
#[derive(Error, Debug)]
pub enum ClimoError {
    /// A required date or calendar bucket is missing from the fetched series
    #[error("Data unavailable: {message}")]
    DataUnavailable {
        /// Error message
        message: String,
        /// The missing date, when a single day is at fault
        date: Option<NaiveDate>,
        /// The calendar day concerned
        key: Option<CalendarKey>,
    },

    /// Too few yearly points to fit a trend
    #[error(
        "Insufficient data for {key}: trend fit needs at least {required} yearly points, found {found}"
    )]
    InsufficientData {
        /// The calendar day being fitted
        key: CalendarKey,
        /// Fewest points accepted
        required: usize,
        /// Points available
        found: usize,
    },

    /// Numeric fit failed (degenerate basis, singular system, non-finite values)
    #[error("Fit error: {message}")]
    Fit {
        /// Error message
        message: String,
    },

    /// The publisher rejected or failed the post
    #[error("Publication error: {message}")]
    Publication {
        /// Error message
        message: String,
        /// Underlying error
        #[source]
        source: Option<BoxedSource>,
    },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message
        message: String,
        /// Offending field
        field: Option<String>,
    },

    /// Publisher credentials were rejected
    #[error("Authentication error: {message}")]
    Authentication {
        /// Error message
        message: String,
        /// Underlying error
        #[source]
        source: Option<BoxedSource>,
    },

    /// Weather data source failures (HTTP, transport, decoding)
    #[error("Data source error: {message}")]
    DataSource {
        /// Error message
        message: String,
        /// HTTP status, if the server answered
        status_code: Option<u16>,
        /// Underlying error
        #[source]
        source: Option<BoxedSource>,
    },

    /// Chart drawing and encoding errors
    #[error("Graph error: {message}")]
    Graph {
        /// Error message
        message: String,
        /// Underlying error
        #[source]
        source: Option<BoxedSource>,
    },

    /// Message catalog errors
    #[error("Localization error: {message}")]
    Localization {
        /// Error message
        message: String,
        /// Locale being loaded
        locale: Option<String>,
    },

    /// Malformed domain input
    #[error("Validation error: {message}")]
    Validation {
        /// Error message
        message: String,
        /// Offending field
        field: Option<String>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClimoError {
    /// Missing date in the fetched series
    pub fn date_unavailable(date: NaiveDate, lookback_years: u32) -> Self {
        Self::DataUnavailable {
            message: format!(
                "no observed high for {date} in the {lookback_years}-year series (not yet published?)"
            ),
            date: Some(date),
            key: Some(CalendarKey::from_date(date)),
        }
    }

    /// Missing calendar bucket in the baseline table
    pub fn bucket_unavailable(key: CalendarKey, lookback_years: u32) -> Self {
        Self::DataUnavailable {
            message: format!("no {lookback_years}-year baseline for calendar day {key}"),
            date: None,
            key: Some(key),
        }
    }

    /// Create a new fit error
    pub fn fit(msg: impl Into<String>) -> Self {
        Self::Fit {
            message: msg.into(),
        }
    }

    /// Create a new publication error
    pub fn publication(msg: impl Into<String>) -> Self {
        Self::Publication {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new publication error with source
    pub fn publication_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Publication {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a new configuration error naming the offending field
    pub fn config_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Configuration {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new authentication error with source
    pub fn auth_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Authentication {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new data source error with an HTTP status
    pub fn data_source_with_status(msg: impl Into<String>, status: u16) -> Self {
        Self::DataSource {
            message: msg.into(),
            status_code: Some(status),
            source: None,
        }
    }

    /// Create a new data source error with source
    pub fn data_source_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::DataSource {
            message: msg.into(),
            status_code: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create a new graph error
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new graph error with source
    pub fn graph_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Graph {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new localization error with locale
    pub fn localization_with_locale(msg: impl Into<String>, locale: impl Into<String>) -> Self {
        Self::Localization {
            message: msg.into(),
            locale: Some(locale.into()),
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Errors confined to the chart stage; the text post can still go out.
    pub const fn is_chart_only(&self) -> bool {
        matches!(
            self,
            Self::InsufficientData { .. } | Self::Fit { .. } | Self::Graph { .. }
        )
    }
}

/// Convert from reqwest::Error to ClimoError
impl From<reqwest::Error> for ClimoError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::data_source_with_source("Request timeout", err)
        } else if err.is_connect() {
            Self::data_source_with_source("Connection failed", err)
        } else if err.is_decode() {
            Self::data_source_with_source("Malformed response body", err)
        } else if let Some(status) = err.status() {
            Self::DataSource {
                message: format!("HTTP error: {}", status.as_u16()),
                status_code: Some(status.as_u16()),
                source: Some(Box::new(err)),
            }
        } else {
            Self::data_source_with_source("Network request failed", err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{error::Error, io};

    #[test]
    fn test_data_unavailable_names_the_day() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 4).unwrap();
        let error = ClimoError::date_unavailable(date, 30);
        let message = error.to_string();
        assert!(message.starts_with("Data unavailable"));
        assert!(message.contains("2024-07-04"));
        assert!(message.contains("30-year"));

        let key = CalendarKey::new(2, 29).unwrap();
        let bucket = ClimoError::bucket_unavailable(key, 10);
        assert!(bucket.to_string().contains("02-29"));
    }

    #[test]
    fn test_insufficient_data_display() {
        let error = ClimoError::InsufficientData {
            key: CalendarKey::new(1, 15).unwrap(),
            required: 5,
            found: 3,
        };
        assert_eq!(
            error.to_string(),
            "Insufficient data for 01-15: trend fit needs at least 5 yearly points, found 3"
        );
    }

    #[test]
    fn test_chart_only_classification() {
        assert!(ClimoError::fit("singular").is_chart_only());
        assert!(ClimoError::graph("no font").is_chart_only());
        assert!(!ClimoError::publication("rejected").is_chart_only());
        assert!(!ClimoError::config("missing token").is_chart_only());
    }

    #[test]
    fn test_error_with_source() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let wrapped = ClimoError::publication_with_source("Upload failed", io_error);

        assert_eq!(wrapped.to_string(), "Publication error: Upload failed");
        assert!(wrapped.source().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: ClimoError = io_error.into();

        assert!(error.to_string().contains("I/O error"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_serde_error_conversion() {
        let serde_error = serde_json::from_str::<serde_json::Value>("{nope}").unwrap_err();
        let error: ClimoError = serde_error.into();
        assert!(error.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_config_field_display() {
        let error = ClimoError::config_field("latitude out of range", "location.latitude");
        assert_eq!(
            error.to_string(),
            "Configuration error: latitude out of range"
        );
        assert!(matches!(
            error,
            ClimoError::Configuration { field: Some(ref f), .. } if f == "location.latitude"
        ));
    }
}
