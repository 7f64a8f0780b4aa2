//! Composition of the two-paragraph daily briefing.

use crate::comparison::Comparison;
use climo_common::{format_tenths, Result, UnitSystem};
use climo_i18n::{FluentArgs, MessageCatalog, MessageId};

/// Builds the published text from a comparison.
#[derive(Debug)]
pub struct MessageComposer<'a> {
    catalog: &'a MessageCatalog,
    location: &'a str,
}

impl<'a> MessageComposer<'a> {
    /// Composer for a location, using the catalog's wording.
    pub const fn new(catalog: &'a MessageCatalog, location: &'a str) -> Self {
        Self { catalog, location }
    }

    /// Returns the comparison sentence and the record sentence separated by
    /// a blank line. Temperatures are shown to one decimal; the deviation is
    /// shown as a magnitude with its direction in words.
    pub fn compose(
        &self,
        comparison: &Comparison,
        lookback_years: u32,
        units: UnitSystem,
    ) -> Result<String> {
        let unit = units.temperature_suffix();
        let years = lookback_years.to_string();
        let direction = if comparison.classification.is_hotter() {
            "hotter"
        } else {
            "cooler"
        };

        let mut args = FluentArgs::new();
        args.set("location", self.location);
        args.set("today", format_tenths(comparison.snapshot.high));
        args.set("deviation", format_tenths(comparison.abs_deviation()));
        args.set("direction", direction);
        args.set("unit", unit);
        args.set("years", years.as_str());
        let headline = self.catalog.format(MessageId::SummaryComparison, Some(&args))?;

        let mut args = FluentArgs::new();
        args.set("years", years.as_str());
        args.set("record", format_tenths(comparison.snapshot.baseline_max));
        args.set("unit", unit);
        let record = self.catalog.format(MessageId::SummaryRecord, Some(&args))?;

        Ok(format!("{headline}\n\n{record}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::{Classification, TodaySnapshot};
    use climo_common::test_utils::date;

    fn comparison(high: f64, mean: f64, max: f64) -> Comparison {
        let deviation = high - mean;
        Comparison {
            snapshot: TodaySnapshot {
                date: date(2024, 7, 4),
                high,
                baseline_mean: mean,
                baseline_max: max,
                sample_count: 31,
            },
            deviation,
            classification: Classification::from_deviation(deviation),
        }
    }

    #[test]
    fn test_hotter_message() {
        let catalog = MessageCatalog::for_locale("en-US").unwrap();
        let text = MessageComposer::new(&catalog, "NYC")
            .compose(&comparison(80.0, 75.3, 95.2), 30, UnitSystem::Imperial)
            .unwrap();

        assert_eq!(
            text,
            "NYC: The high today is 80.0°F, which is 4.7°F hotter than today's 30-year average.\
             \n\nThe 30-year historical high for today is 95.2°F."
        );
    }

    #[test]
    fn test_cooler_message_uses_magnitude() {
        let catalog = MessageCatalog::for_locale("en-US").unwrap();
        let text = MessageComposer::new(&catalog, "NYC")
            .compose(&comparison(70.0, 75.0, 95.0), 30, UnitSystem::Imperial)
            .unwrap();

        assert!(text.contains("which is 5.0°F cooler than"));
        assert!(!text.contains("-5.0"));
    }

    #[test]
    fn test_exact_tie_rounds_to_even() {
        let catalog = MessageCatalog::for_locale("en-US").unwrap();
        let text = MessageComposer::new(&catalog, "NYC")
            .compose(&comparison(80.0, 77.75, 92.25), 30, UnitSystem::Imperial)
            .unwrap();

        assert!(text.contains("which is 2.2°F hotter than"));
        assert!(text.ends_with("historical high for today is 92.2°F."));
    }

    #[test]
    fn test_equal_reads_as_cooler() {
        let catalog = MessageCatalog::for_locale("en-US").unwrap();
        let text = MessageComposer::new(&catalog, "NYC")
            .compose(&comparison(75.0, 75.0, 90.0), 30, UnitSystem::Imperial)
            .unwrap();
        assert!(text.contains("0.0°F cooler"));
    }

    #[test]
    fn test_metric_suffix_and_two_paragraphs() {
        let catalog = MessageCatalog::for_locale("en-US").unwrap();
        let text = MessageComposer::new(&catalog, "Berlin")
            .compose(&comparison(24.25, 22.0, 31.0), 20, UnitSystem::Metric)
            .unwrap();

        let paragraphs: Vec<&str> = text.split("\n\n").collect();
        assert_eq!(paragraphs.len(), 2);
        assert!(paragraphs[0].starts_with("Berlin: The high today is 24."));
        assert!(paragraphs[0].contains("°C"));
        assert_eq!(paragraphs[1], "The 20-year historical high for today is 31.0°C.");
    }
}
