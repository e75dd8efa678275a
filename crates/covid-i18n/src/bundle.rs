//! Embedded Fluent resources and bundle construction.

use covid_common::{Language, ReportError, Result};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::FluentResource;
use std::fmt;
use tracing::{debug, error};
use unic_langid::LanguageIdentifier;

const IT_FTL: &str = include_str!("../locales/it.ftl");
const EN_FTL: &str = include_str!("../locales/en.ftl");

/// Fluent source embedded for `language`.
pub const fn resource_source(language: Language) -> &'static str {
    match language {
        Language::It => IT_FTL,
        Language::En => EN_FTL,
    }
}

/// A Fluent bundle for a single language, shareable across threads.
pub struct LocaleBundle {
    language: Language,
    bundle: FluentBundle<FluentResource>,
}

impl fmt::Debug for LocaleBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleBundle")
            .field("language", &self.language)
            .field("bundle", &"FluentBundle<FluentResource>")
            .finish()
    }
}

impl LocaleBundle {
    /// Bundle holding the embedded resource of `language`.
    pub fn embedded(language: Language) -> Result<Self> {
        Self::from_source(language, resource_source(language))
    }

    /// Bundle built from Fluent `source`, tagged as `language`.
    pub fn from_source(language: Language, source: &str) -> Result<Self> {
        let lang_id: LanguageIdentifier = language.code().parse().map_err(|e| {
            ReportError::localization_with_locale(
                format!("invalid language identifier: {e:?}"),
                language.code(),
            )
        })?;

        let resource = FluentResource::try_new(source.to_string()).map_err(|(_, errors)| {
            let messages: Vec<String> = errors.iter().map(|e| format!("{e:?}")).collect();
            error!(locale = %language, errors = ?messages, "Failed to parse Fluent resource");
            ReportError::localization_with_locale(
                format!("invalid Fluent resource: {}", messages.join("; ")),
                language.code(),
            )
        })?;

        let mut bundle = FluentBundle::new_concurrent(vec![lang_id]);
        // Labels end up inside HTML and JSON; no bidi isolation marks
        bundle.set_use_isolating(false);
        bundle.add_resource(resource).map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| format!("{e:?}")).collect();
            ReportError::localization_with_locale(
                format!("duplicate Fluent entries: {}", messages.join("; ")),
                language.code(),
            )
        })?;

        debug!(locale = %language, "Fluent bundle ready");
        Ok(Self { language, bundle })
    }

    /// Language of the bundle.
    pub const fn language(&self) -> Language {
        self.language
    }

    /// Whether the bundle defines a message with a value under `id`.
    pub fn has_message(&self, id: &str) -> bool {
        self.bundle
            .get_message(id)
            .is_some_and(|message| message.value().is_some())
    }

    /// Format message `id` with optional arguments.
    pub fn format(&self, id: &str, args: Option<&fluent_bundle::FluentArgs>) -> Result<String> {
        let pattern = self
            .bundle
            .get_message(id)
            .and_then(|message| message.value())
            .ok_or_else(|| {
                ReportError::localization_with_locale(
                    format!("unknown message '{id}'"),
                    self.language.code(),
                )
            })?;

        let mut errors = Vec::new();
        let formatted = self.bundle.format_pattern(pattern, args, &mut errors);
        if !errors.is_empty() {
            let messages: Vec<String> = errors.iter().map(|e| format!("{e:?}")).collect();
            return Err(ReportError::localization_with_locale(
                format!("cannot format '{id}': {}", messages.join("; ")),
                self.language.code(),
            ));
        }
        Ok(formatted.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_bundles_parse() {
        for language in Language::ALL {
            let bundle = LocaleBundle::embedded(language).unwrap();
            assert_eq!(bundle.language(), language);
            assert!(bundle.has_message("italy-mean"));
        }
    }

    #[test]
    fn test_invalid_source_is_a_localization_error() {
        let error = LocaleBundle::from_source(Language::En, "= no id").unwrap_err();
        assert!(matches!(error, ReportError::Localization { .. }));
    }

    #[test]
    fn test_missing_argument_is_reported() {
        let bundle = LocaleBundle::from_source(Language::En, "hello = Hi { $name }").unwrap();
        assert!(bundle.format("hello", None).is_err());
        assert!(bundle.format("bye", None).is_err());
    }
}
