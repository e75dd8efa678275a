//! Common type definitions shared by the reporting crates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of input file whose format is being resolved from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileKind {
    /// A page configuration file (template name, variables, description).
    PageConfig,
    /// A description file rendered into the `mark_text` variable.
    Description,
    /// A dataset file.
    Dataset,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PageConfig => "page config",
            Self::Description => "description",
            Self::Dataset => "dataset",
        };
        f.write_str(name)
    }
}

/// Output language for labels, titles and menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Italian.
    #[default]
    It,
    /// English.
    En,
}

impl Language {
    /// All supported languages.
    pub const ALL: [Self; 2] = [Self::It, Self::En];

    /// The BCP 47 code of the language.
    pub const fn code(self) -> &'static str {
        match self {
            Self::It => "it",
            Self::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Language {
    type Err = crate::ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "it" | "it-it" | "italian" => Ok(Self::It),
            "en" | "en-us" | "en-gb" | "english" => Ok(Self::En),
            other => Err(crate::ReportError::validation_field(
                format!("unsupported language '{other}'"),
                "language",
            )),
        }
    }
}
