//! Page configs: which template to render, with what.

use crate::format::ConfigFormat;
use covid_common::{ReportError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Variable name the rendered description is passed under.
pub const MARK_TEXT: &str = "mark_text";

/// A page config file. Keys other than these are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    /// Template name, relative to the template directory.
    pub template: String,
    /// Markdown description, relative to the description directory.
    #[serde(default)]
    pub desc_file: Option<PathBuf>,
    /// Values handed to the template, with their YAML/JSON types.
    #[serde(default)]
    pub variables: BTreeMap<String, Value>,
}

impl PageConfig {
    /// Parse `text` in the given format.
    pub fn parse(text: &str, format: ConfigFormat) -> Result<Self> {
        Ok(match format {
            ConfigFormat::Json => serde_json::from_str(text)?,
            ConfigFormat::Yaml => serde_yaml::from_str(text)?,
        })
    }

    /// Read the page config at `path`, picking the format by extension.
    pub fn load(path: &Path) -> Result<Self> {
        let format = ConfigFormat::from_path(path)?;
        let text = fs::read_to_string(path).map_err(|e| ReportError::io_at(path, e))?;
        let page = Self::parse(&text, format)?;
        debug!(
            path = %path.display(),
            %format,
            template = %page.template,
            variables = page.variables.len(),
            "Page config loaded"
        );
        Ok(page)
    }
}
