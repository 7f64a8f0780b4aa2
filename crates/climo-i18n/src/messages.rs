//! Type-safe message identifiers and the catalog that formats them.

use crate::loader::FluentLoader;
use climo_common::{ClimoError, Result};
use fluent_bundle::{FluentArgs, FluentBundle, FluentResource};
use std::fmt;
use unic_langid::LanguageIdentifier;

/// Every message the application renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageId {
    /// First paragraph: today vs. the N-year mean.
    SummaryComparison,
    /// Second paragraph: the N-year record high.
    SummaryRecord,
    /// Chart caption.
    ChartTitle,
    /// X axis label.
    ChartAxisYear,
    /// Y axis label.
    ChartAxisHigh,
    /// Legend entry for earlier years.
    ChartLegendHistory,
    /// Legend entry for the highlighted year.
    ChartLegendCurrent,
    /// Legend entry for the fitted curve.
    ChartLegendTrend,
    /// Legend entry for the confidence band.
    ChartLegendBand,
}

impl MessageId {
    /// All identifiers, for completeness checks.
    pub const ALL: [Self; 9] = [
        Self::SummaryComparison,
        Self::SummaryRecord,
        Self::ChartTitle,
        Self::ChartAxisYear,
        Self::ChartAxisHigh,
        Self::ChartLegendHistory,
        Self::ChartLegendCurrent,
        Self::ChartLegendTrend,
        Self::ChartLegendBand,
    ];

    /// The Fluent message id.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SummaryComparison => "summary-comparison",
            Self::SummaryRecord => "summary-record",
            Self::ChartTitle => "chart-title",
            Self::ChartAxisYear => "chart-axis-year",
            Self::ChartAxisHigh => "chart-axis-high",
            Self::ChartLegendHistory => "chart-legend-history",
            Self::ChartLegendCurrent => "chart-legend-current",
            Self::ChartLegendTrend => "chart-legend-trend",
            Self::ChartLegendBand => "chart-legend-band",
        }
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formatted access to one locale's messages.
pub struct MessageCatalog {
    locale: LanguageIdentifier,
    bundle: FluentBundle<FluentResource>,
}

impl fmt::Debug for MessageCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageCatalog")
            .field("locale", &self.locale)
            .field("bundle", &"FluentBundle<FluentResource>")
            .finish()
    }
}

impl MessageCatalog {
    /// Catalog for the closest embedded locale to `requested`.
    pub fn for_locale(requested: &str) -> Result<Self> {
        let locale = FluentLoader::negotiate(requested);
        let bundle = FluentLoader::load_bundle(&locale)?;
        Ok(Self { locale, bundle })
    }

    /// The locale actually in use.
    pub const fn locale(&self) -> &LanguageIdentifier {
        &self.locale
    }

    /// Whether the catalog defines `id`.
    pub fn has(&self, id: MessageId) -> bool {
        self.bundle.has_message(id.as_str())
    }

    /// Formats a message; any missing argument or reference is an error
    /// rather than a silently garbled string.
    pub fn format(&self, id: MessageId, args: Option<&FluentArgs<'_>>) -> Result<String> {
        let pattern = self
            .bundle
            .get_message(id.as_str())
            .and_then(|message| message.value())
            .ok_or_else(|| self.error(format!("message '{id}' not found")))?;

        let mut errors = Vec::new();
        let formatted = self.bundle.format_pattern(pattern, args, &mut errors);
        if !errors.is_empty() {
            return Err(self.error(format!("formatting '{id}' failed: {errors:?}")));
        }
        Ok(formatted.into_owned())
    }

    fn error(&self, message: String) -> ClimoError {
        ClimoError::localization_with_locale(message, self.locale.to_string())
    }
}
