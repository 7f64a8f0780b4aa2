//! Application-wide error types using thiserror.

use climo_common::ClimoError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum BotError {
    /// Any stage of the briefing failed.
    #[error(transparent)]
    Climo(#[from] ClimoError),

    /// The tracing subscriber could not be installed.
    #[error("Logging setup failed: {0}")]
    Logging(String),
}

impl BotError {
    /// Whether the run failed because today's observation is not published
    /// yet; such runs are worth retrying later.
    pub const fn is_data_unavailable(&self) -> bool {
        matches!(self, Self::Climo(ClimoError::DataUnavailable { .. }))
    }
}

/// Result type for the bot application.
pub type BotResult<T> = Result<T, BotError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_climo_errors_convert_transparently() {
        let day = NaiveDate::from_ymd_opt(2024, 7, 4).unwrap();
        let err: BotError = ClimoError::date_unavailable(day, 30).into();
        assert!(err.is_data_unavailable());
        assert!(err.to_string().starts_with("Data unavailable: no observed high for 2024-07-04"));

        let err: BotError = ClimoError::publication("channel is gone").into();
        assert!(!err.is_data_unavailable());
        assert_eq!(err.to_string(), "Publication error: channel is gone");
    }
}
