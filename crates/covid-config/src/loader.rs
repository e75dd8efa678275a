//! Configuration loading utilities

use crate::schema::{SiteConfig, SourceKind};
use crate::validator::ConfigValidator;
use covid_common::{Language, LogFormat, ReportError, Result as ReportResult};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming the site configuration file.
pub const CONFIG_PATH_VAR: &str = "COVID_REPORT_CONFIG";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        /// Variable name
        var: String,
        /// Parse failure
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(String),
}

impl From<ConfigError> for ReportError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ValidationError(message) => Self::Validation {
                message,
                field: None,
            },
            other => Self::config_with_source(other.to_string(), other),
        }
    }
}

fn env_parse_error(
    var: &str,
    source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> ConfigError {
    ConfigError::EnvParseError {
        var: var.to_string(),
        source: source.into(),
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SiteConfig, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading site configuration");
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&content)?;

        Self::apply_env_overrides(&mut config)?;
        Self::validate(&config)?;

        info!(path = %path.display(), "Site configuration loaded");
        Ok(config)
    }

    /// Parse a YAML document. An empty document yields the defaults.
    pub fn parse(content: &str) -> Result<SiteConfig, ConfigError> {
        if content.trim().is_empty() {
            return Ok(SiteConfig::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load configuration from environment variables and files
    pub fn load() -> ReportResult<SiteConfig> {
        let config = match Self::locate() {
            Some(path) => Self::load_config(path)?,
            None => {
                debug!("No site configuration file found, using defaults");
                let mut config = SiteConfig::default();
                Self::apply_env_overrides(&mut config)?;
                Self::validate(&config)?;
                config
            }
        };

        Ok(config)
    }

    /// Load configuration from an explicit file, or search the usual places.
    pub fn load_from(path: Option<&Path>) -> ReportResult<SiteConfig> {
        match path {
            Some(path) => Ok(Self::load_config(path)?),
            None => Self::load(),
        }
    }

    /// Configuration file named by `COVID_REPORT_CONFIG`, else `report.yaml` or
    /// `report.yml` in the working directory.
    pub fn locate() -> Option<PathBuf> {
        if let Ok(path) = env::var(CONFIG_PATH_VAR) {
            return Some(PathBuf::from(path));
        }
        ["report.yaml", "report.yml"]
            .into_iter()
            .map(PathBuf::from)
            .find(|candidate| candidate.exists())
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(config: &mut SiteConfig) -> Result<(), ConfigError> {
        Self::apply_overrides_from(config, |var| env::var(var).ok())
    }

    /// Apply overrides read through `lookup` instead of the process environment.
    pub fn apply_overrides_from<F>(config: &mut SiteConfig, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Paths
        if let Some(dir) = lookup("COVID_TEMPLATES_DIR") {
            config.paths.templates_dir = PathBuf::from(dir);
        }

        if let Some(dir) = lookup("COVID_CONFIG_DIR") {
            config.paths.config_dir = PathBuf::from(dir);
        }

        if let Some(dir) = lookup("COVID_DESC_DIR") {
            config.paths.desc_dir = Some(PathBuf::from(dir));
        }

        if let Some(dir) = lookup("COVID_SITE_DIR") {
            config.paths.site_dir = PathBuf::from(dir);
        }

        // Data
        if let Some(dir) = lookup("COVID_DATA_DIR") {
            config.data.dir = PathBuf::from(dir);
        }

        if let Some(source) = lookup("COVID_DATA_SOURCE") {
            config.data.source = source
                .parse::<SourceKind>()
                .map_err(|e| env_parse_error("COVID_DATA_SOURCE", e))?;
        }

        // Figures
        if let Some(dir) = lookup("COVID_FIGURES_DIR") {
            config.figures.output_dir = Some(PathBuf::from(dir));
        }

        if let Some(language) = lookup("COVID_LANGUAGE") {
            config.figures.language = language
                .parse::<Language>()
                .map_err(|e| env_parse_error("COVID_LANGUAGE", e))?;
        }

        if let Some(threshold) = lookup("COVID_EPIDEMIC_THRESHOLD") {
            config.figures.epidemic_threshold = threshold
                .trim()
                .parse()
                .map_err(|e| env_parse_error("COVID_EPIDEMIC_THRESHOLD", e))?;
        }

        // Server and logging
        if let Some(bind) = lookup("COVID_BIND") {
            config.server.bind = bind;
        }

        if let Some(level) = lookup("COVID_LOG") {
            config.logging.level = level;
        }

        if let Some(format) = lookup("COVID_LOG_FORMAT") {
            config.logging.format = match format.trim().to_ascii_lowercase().as_str() {
                "pretty" => LogFormat::Pretty,
                "compact" => LogFormat::Compact,
                "json" => LogFormat::Json,
                other => {
                    return Err(env_parse_error(
                        "COVID_LOG_FORMAT",
                        format!("unknown log format '{other}'"),
                    ))
                }
            };
        }

        Ok(())
    }

    fn validate(config: &SiteConfig) -> Result<(), ConfigError> {
        ConfigValidator::validate(config).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}
