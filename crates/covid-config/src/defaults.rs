//! Default values of the site configuration.

use crate::schema::*;
use chrono::NaiveDate;
use covid_common::{Language, LogFormat};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Cumulative case count marking the start of the epidemic.
pub const DEFAULT_EPIDEMIC_THRESHOLD: f64 = 100.0;

/// Lag of the shifted discharge series.
pub const DEFAULT_DISCHARGE_LAG_DAYS: usize = 14;

/// Download timeout.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Regional time series published by the Civil Protection Department.
pub const DPC_REGIONS_URL: &str = "https://raw.githubusercontent.com/pcm-dpc/COVID-19/master/dati-regioni/dpc-covid19-ita-regioni.csv";

/// Provincial time series published by the Civil Protection Department.
pub const DPC_PROVINCES_URL: &str = "https://raw.githubusercontent.com/pcm-dpc/COVID-19/master/dati-province/dpc-covid19-ita-province.csv";

/// First day every region has a report for.
pub fn default_anchor_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 2, 25).unwrap_or_default()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from("reports/templates"),
            config_dir: PathBuf::from("reports/config"),
            desc_dir: None,
            site_dir: PathBuf::from("site"),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        let mut urls = BTreeMap::new();
        urls.insert("dpc-regions".to_string(), DPC_REGIONS_URL.to_string());
        urls.insert("dpc-province".to_string(), DPC_PROVINCES_URL.to_string());

        Self {
            source: SourceKind::Remote,
            dir: PathBuf::from("data"),
            urls,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl Default for FiguresConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            language: Language::It,
            epidemic_threshold: DEFAULT_EPIDEMIC_THRESHOLD,
            anchor_date: default_anchor_date(),
            focus_regions: vec!["Lombardia".to_string(), "Veneto".to_string()],
            discharge_lag_days: DEFAULT_DISCHARGE_LAG_DAYS,
            enabled: Vec::new(),
            branding: BrandingConfig::default(),
        }
    }
}

impl Default for BrandingConfig {
    fn default() -> Self {
        Self {
            text: "by BuildNN".to_string(),
            url: "https://www.buildnn.com".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = SiteConfig::default();

        assert_eq!(config.paths.templates_dir, PathBuf::from("reports/templates"));
        assert_eq!(config.paths.desc_dir(), PathBuf::from("reports/config"));
        assert_eq!(config.data.source, SourceKind::Remote);
        assert_eq!(config.data.urls.len(), 2);
        assert!((config.figures.epidemic_threshold - 100.0).abs() < f64::EPSILON);
        assert_eq!(config.figures.anchor_date.to_string(), "2020-02-25");
        assert_eq!(config.server.bind, "127.0.0.1:5000");
        assert_eq!(config.figures_dir(), PathBuf::from("site/figures"));
    }

    #[test]
    fn test_every_figure_enabled_by_default() {
        let config = SiteConfig::default();
        assert!(config.figure_enabled("fig_b001"));
        assert!(config.figure_enabled("anything"));
    }
}
