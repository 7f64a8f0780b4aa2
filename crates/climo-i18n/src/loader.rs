//! Fluent bundle loading from the resources embedded at compile time.

use climo_common::{ClimoError, Result};
use fluent_bundle::{FluentBundle, FluentResource};
use tracing::{debug, warn};
use unic_langid::{langid, LanguageIdentifier};

/// Locale used when the requested one has no resource.
pub const FALLBACK_LOCALE: LanguageIdentifier = langid!("en-US");

/// Embedded `.ftl` sources keyed by locale code.
const RESOURCES: &[(&str, &str)] = &[
    ("en-US", include_str!("../locales/en-US/climo.ftl")),
    ("de-DE", include_str!("../locales/de-DE/climo.ftl")),
];

/// Fluent bundle loader.
pub struct FluentLoader;

impl FluentLoader {
    /// Locales with an embedded resource.
    pub fn available_locales() -> Vec<LanguageIdentifier> {
        RESOURCES
            .iter()
            .filter_map(|(code, _)| code.parse().ok())
            .collect()
    }

    /// Picks the best embedded locale for `requested`: exact match, then
    /// same language, then the fallback.
    pub fn negotiate(requested: &str) -> LanguageIdentifier {
        let available = Self::available_locales();
        let Ok(wanted) = requested.parse::<LanguageIdentifier>() else {
            warn!("Unparsable locale '{}', using {}", requested, FALLBACK_LOCALE);
            return FALLBACK_LOCALE;
        };

        if let Some(exact) = available.iter().find(|l| **l == wanted) {
            return exact.clone();
        }
        if let Some(same_language) = available.iter().find(|l| l.language == wanted.language) {
            debug!("Locale {} resolved to {}", wanted, same_language);
            return same_language.clone();
        }

        warn!("No messages for locale {}, using {}", wanted, FALLBACK_LOCALE);
        FALLBACK_LOCALE
    }

    /// Builds a bundle for an embedded locale.
    pub fn load_bundle(locale: &LanguageIdentifier) -> Result<FluentBundle<FluentResource>> {
        let code = locale.to_string();
        let source = RESOURCES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, source)| *source)
            .ok_or_else(|| {
                ClimoError::localization_with_locale("no embedded resource", code.clone())
            })?;

        let resource = FluentResource::try_new(source.to_string()).map_err(|(_, errors)| {
            ClimoError::localization_with_locale(
                format!("failed to parse messages: {errors:?}"),
                code.clone(),
            )
        })?;

        let mut bundle = FluentBundle::new(vec![locale.clone()]);
        // Plain output; no Unicode isolation marks around placeables
        bundle.set_use_isolating(false);
        bundle.add_resource(resource).map_err(|errors| {
            ClimoError::localization_with_locale(format!("conflicting messages: {errors:?}"), code.clone())
        })?;

        debug!("Loaded message bundle for {}", code);
        Ok(bundle)
    }
}
