//! Label catalogue used by the figures.

use crate::bundle::LocaleBundle;
use covid_common::{Language, Result};
use fluent_bundle::{FluentArgs, FluentValue};
use tracing::debug;

/// Prefix of the column label messages.
pub const COLUMN_PREFIX: &str = "col-";

/// Localized labels, titles and menu texts for one language.
#[derive(Debug)]
pub struct Labels {
    bundle: LocaleBundle,
}

impl Labels {
    /// Catalogue of the embedded resource for `language`.
    pub fn new(language: Language) -> Result<Self> {
        Ok(Self {
            bundle: LocaleBundle::embedded(language)?,
        })
    }

    /// Catalogue over an already built bundle.
    pub const fn from_bundle(bundle: LocaleBundle) -> Self {
        Self { bundle }
    }

    /// Language of the catalogue.
    pub const fn language(&self) -> Language {
        self.bundle.language()
    }

    /// Whether message `id` exists.
    pub fn has_message(&self, id: &str) -> bool {
        self.bundle.has_message(id)
    }

    /// Message `id` formatted with `args`. Unknown ids are an error.
    pub fn message(&self, id: &str, args: Option<&FluentArgs>) -> Result<String> {
        self.bundle.format(id, args)
    }

    /// Message `id` without arguments.
    pub fn text(&self, id: &str) -> Result<String> {
        self.message(id, None)
    }

    /// Message `id` with string arguments given as name/value pairs.
    pub fn fill(&self, id: &str, args: &[(&str, &str)]) -> Result<String> {
        let mut fluent_args = FluentArgs::new();
        for &(name, value) in args {
            fluent_args.set(name, FluentValue::from(value));
        }
        self.message(id, Some(&fluent_args))
    }

    /// Display label of a data column, or the column name itself when the
    /// catalogue has none.
    pub fn column(&self, name: &str) -> String {
        let id = format!("{COLUMN_PREFIX}{name}");
        match self.text(&id) {
            Ok(label) => label,
            Err(_) => {
                debug!(column = name, locale = %self.language(), "No label for column");
                name.to_string()
            }
        }
    }

    /// `items` joined as a natural-language list: "A", "A e B",
    /// "A, B e C".
    pub fn list(&self, items: &[String]) -> Result<String> {
        match items {
            [] => Ok(String::new()),
            [only] => Ok(only.clone()),
            [head @ .., last] => self.fill("list-pair", &[("head", &head.join(", ")), ("last", last)]),
        }
    }
}
