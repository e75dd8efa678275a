//! Configuration validation logic.

use crate::schema::{SiteConfig, SourceKind};
use covid_common::{ReportError, Result};
use std::net::SocketAddr;
use url::Url;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration, reporting the first offending field.
    pub fn validate(config: &SiteConfig) -> Result<()> {
        Self::validate_paths(config)?;
        Self::validate_data(config)?;
        Self::validate_figures(config)?;
        Self::validate_server(config)?;
        Ok(())
    }

    fn validate_paths(config: &SiteConfig) -> Result<()> {
        let paths = &config.paths;
        for (field, path) in [
            ("paths.templates_dir", &paths.templates_dir),
            ("paths.config_dir", &paths.config_dir),
            ("paths.site_dir", &paths.site_dir),
        ] {
            if path.as_os_str().is_empty() {
                return Err(ReportError::validation_field("path must not be empty", field));
            }
        }
        Ok(())
    }

    fn validate_data(config: &SiteConfig) -> Result<()> {
        let data = &config.data;
        if data.timeout_seconds == 0 {
            return Err(ReportError::validation_field(
                "timeout must be at least one second",
                "data.timeout_seconds",
            ));
        }

        if data.source == SourceKind::Local && data.dir.as_os_str().is_empty() {
            return Err(ReportError::validation_field(
                "a local data source needs a directory",
                "data.dir",
            ));
        }

        for (name, raw) in &data.urls {
            let url = Url::parse(raw).map_err(|e| {
                ReportError::validation_field(
                    format!("invalid URL '{raw}' for dataset '{name}': {e}"),
                    "data.urls",
                )
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ReportError::validation_field(
                    format!("dataset '{name}' must use http or https"),
                    "data.urls",
                ));
            }
        }
        Ok(())
    }

    fn validate_figures(config: &SiteConfig) -> Result<()> {
        let figures = &config.figures;
        if !figures.epidemic_threshold.is_finite() || figures.epidemic_threshold <= 0.0 {
            return Err(ReportError::validation_field(
                "threshold must be a positive number",
                "figures.epidemic_threshold",
            ));
        }

        if figures.focus_regions.is_empty() {
            return Err(ReportError::validation_field(
                "at least one focus region is required",
                "figures.focus_regions",
            ));
        }

        if figures.focus_regions.iter().any(|r| r.trim().is_empty()) {
            return Err(ReportError::validation_field(
                "region names must not be empty",
                "figures.focus_regions",
            ));
        }

        if figures.branding.text.trim().is_empty() {
            return Err(ReportError::validation_field(
                "branding text must not be empty",
                "figures.branding.text",
            ));
        }

        if !figures.branding.url.is_empty() {
            Url::parse(&figures.branding.url).map_err(|e| {
                ReportError::validation_field(
                    format!("invalid branding URL: {e}"),
                    "figures.branding.url",
                )
            })?;
        }
        Ok(())
    }

    fn validate_server(config: &SiteConfig) -> Result<()> {
        config.server.bind.parse::<SocketAddr>().map_err(|e| {
            ReportError::validation_field(
                format!("invalid bind address '{}': {e}", config.server.bind),
                "server.bind",
            )
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(error: ReportError) -> Option<String> {
        match error {
            ReportError::Validation { field, .. } => field,
            _ => None,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(ConfigValidator::validate(&SiteConfig::default()).is_ok());
    }

    #[test]
    fn test_rejects_non_positive_threshold() {
        let mut config = SiteConfig::default();
        config.figures.epidemic_threshold = 0.0;
        let error = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(field_of(error).as_deref(), Some("figures.epidemic_threshold"));
    }

    #[test]
    fn test_rejects_bad_dataset_url() {
        let mut config = SiteConfig::default();
        config
            .data
            .urls
            .insert("dpc-regions".to_string(), "ftp://example.org/a.csv".to_string());
        let error = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(field_of(error).as_deref(), Some("data.urls"));
    }

    #[test]
    fn test_rejects_empty_focus_regions() {
        let mut config = SiteConfig::default();
        config.figures.focus_regions.clear();
        let error = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(field_of(error).as_deref(), Some("figures.focus_regions"));
    }

    #[test]
    fn test_rejects_bad_bind_address() {
        let mut config = SiteConfig::default();
        config.server.bind = "localhost".to_string();
        let error = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(field_of(error).as_deref(), Some("server.bind"));
    }
}
