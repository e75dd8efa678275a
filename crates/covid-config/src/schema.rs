//! Configuration schema definitions using serde.

use chrono::NaiveDate;
use covid_common::{Language, LogFormat, LoggingConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Main configuration structure for covid-report.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Directory layout.
    pub paths: PathsConfig,
    /// Dataset retrieval.
    pub data: DataConfig,
    /// Figure generation.
    pub figures: FiguresConfig,
    /// Web server.
    pub server: ServerConfig,
    /// Logging.
    pub logging: LoggingSettings,
}

/// Directory layout of templates, page configs and the generated site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding the page templates.
    pub templates_dir: PathBuf,
    /// Directory scanned for page configs (`*.yml`).
    pub config_dir: PathBuf,
    /// Directory description files are resolved against; `config_dir` when unset.
    pub desc_dir: Option<PathBuf>,
    /// Root of the static site (`assets/`, `figures/`).
    pub site_dir: PathBuf,
}

impl PathsConfig {
    /// Directory description files are resolved against.
    pub fn desc_dir(&self) -> &Path {
        self.desc_dir.as_deref().unwrap_or(&self.config_dir)
    }

    /// Directory served under `/assets`.
    pub fn assets_dir(&self) -> PathBuf {
        self.site_dir.join("assets")
    }
}

/// Where datasets are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// `<dir>/<dataset>.csv` files on disk.
    Local,
    /// HTTP downloads from the configured URLs.
    #[default]
    Remote,
}

impl std::str::FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "remote" => Ok(Self::Remote),
            other => Err(format!("unknown data source '{other}', expected local or remote")),
        }
    }
}

/// Dataset retrieval configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Source kind.
    pub source: SourceKind,
    /// Directory of local dataset files.
    pub dir: PathBuf,
    /// Download URL per dataset name.
    pub urls: BTreeMap<String, String>,
    /// HTTP timeout in seconds.
    pub timeout_seconds: u64,
}

/// Figure generation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiguresConfig {
    /// Output directory; `<site_dir>/figures` when unset.
    pub output_dir: Option<PathBuf>,
    /// Label language.
    pub language: Language,
    /// Cumulative case count marking the start of a group's epidemic.
    pub epidemic_threshold: f64,
    /// Reference date of the anchored-ratio figures.
    pub anchor_date: NaiveDate,
    /// Regions compared in the regional figures.
    pub focus_regions: Vec<String>,
    /// Lag in days of the shifted discharge series.
    pub discharge_lag_days: usize,
    /// Figures to generate; every figure when empty.
    pub enabled: Vec<String>,
    /// Watermark.
    pub branding: BrandingConfig,
}

/// Watermark shown on every figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandingConfig {
    /// Link text.
    pub text: String,
    /// Link target.
    pub url: String,
}

/// Web server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind.
    pub bind: String,
}

/// Logging configuration as written in the site file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Level or filter directive.
    pub level: String,
    /// Line format.
    pub format: LogFormat,
    /// Optional log file.
    pub file: Option<String>,
}

impl SiteConfig {
    /// Directory the figures are written to.
    pub fn figures_dir(&self) -> PathBuf {
        self.figures
            .output_dir
            .clone()
            .unwrap_or_else(|| self.paths.site_dir.join("figures"))
    }

    /// Logging configuration for `covid_common::init_logging`.
    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.logging.level.clone(),
            format: self.logging.format,
            file_path: self.logging.file.clone(),
            ..LoggingConfig::default()
        }
    }

    /// Whether the named figure is enabled.
    pub fn figure_enabled(&self, name: &str) -> bool {
        self.figures.enabled.is_empty() || self.figures.enabled.iter().any(|n| n == name)
    }
}
