//! Integration tests for climo-i18n crate.

use climo_i18n::{FluentArgs, FluentLoader, MessageCatalog, MessageId};

fn summary_args(direction: &'static str) -> FluentArgs<'static> {
    let mut args = FluentArgs::new();
    args.set("location", "NYC");
    args.set("today", "80.0");
    args.set("deviation", "4.7");
    args.set("unit", "F");
    args.set("direction", direction);
    args.set("years", 30);
    args
}

#[test]
fn test_every_locale_defines_every_message() {
    for locale in FluentLoader::available_locales() {
        let catalog = MessageCatalog::for_locale(&locale.to_string()).unwrap();
        for id in MessageId::ALL {
            assert!(catalog.has(id), "{locale} is missing {id}");
        }
    }
}

#[test]
fn test_comparison_direction_selects_wording() {
    let catalog = MessageCatalog::for_locale("en-US").unwrap();

    let hotter = catalog
        .format(MessageId::SummaryComparison, Some(&summary_args("hotter")))
        .unwrap();
    assert_eq!(
        hotter,
        "NYC: The high today is 80.0°F, which is 4.7°F hotter than today's 30-year average."
    );

    let cooler = catalog
        .format(MessageId::SummaryComparison, Some(&summary_args("cooler")))
        .unwrap();
    assert!(cooler.contains("4.7°F cooler than today's 30-year average."));
}

#[test]
fn test_unknown_direction_falls_to_default_variant() {
    let catalog = MessageCatalog::for_locale("en-US").unwrap();
    let text = catalog
        .format(MessageId::SummaryComparison, Some(&summary_args("equal")))
        .unwrap();
    assert!(text.contains("cooler"));
}

#[test]
fn test_fallback_locale_is_english() {
    let catalog = MessageCatalog::for_locale("ja-JP").unwrap();
    assert_eq!(catalog.locale().to_string(), "en-US");
    assert_eq!(catalog.format(MessageId::ChartAxisYear, None).unwrap(), "Year");
}

#[test]
fn test_german_wording() {
    let catalog = MessageCatalog::for_locale("de-DE").unwrap();
    let text = catalog
        .format(MessageId::SummaryComparison, Some(&summary_args("hotter")))
        .unwrap();
    assert!(text.contains("wärmer"));
    assert!(text.contains("30-Jahres-Durchschnitt"));
}
