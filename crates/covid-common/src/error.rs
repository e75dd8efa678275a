//! Error types and utilities for covid-report

use crate::types::FileKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for covid-report operations
pub type Result<T> = std::result::Result<T, ReportError>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for covid-report operations
#[derive(Error, Debug)]
pub enum ReportError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network related errors (dataset downloads)
    #[error("Network error: {message}")]
    Network {
        message: String,
        status_code: Option<u16>,
        #[source]
        source: Option<BoxedSource>,
    },

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// CSV parsing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A file whose extension does not name a supported format
    #[error("Unsupported {kind} format '{extension}' ({})", path.display())]
    UnsupportedFormat {
        kind: FileKind,
        extension: String,
        path: PathBuf,
    },

    /// Dataset and frame errors (unknown columns, length mismatches, bad keys)
    #[error("Data error: {message}")]
    Data {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Template loading and rendering errors
    #[error("Template error: {message}")]
    Template {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Figure assembly and export errors
    #[error("Figure error: {message}")]
    Figure {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Internationalization and localization errors
    #[error("Localization error: {message}")]
    Localization {
        message: String,
        locale: Option<String>,
    },

    /// Validation errors for configuration or user input
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },
}

impl ReportError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Wrap an I/O error, naming the path it happened on
    pub fn io_at(path: &Path, err: std::io::Error) -> Self {
        Self::Io(std::io::Error::new(
            err.kind(),
            format!("{}: {err}", path.display()),
        ))
    }

    /// Create a new network error with source
    pub fn network_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            message: msg.into(),
            status_code: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create an unsupported-format error for a file of the given kind
    pub fn unsupported_format(
        kind: FileKind,
        extension: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self::UnsupportedFormat {
            kind,
            extension: extension.into(),
            path: path.into(),
        }
    }

    /// Create a new data error
    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new data error with source
    pub fn data_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Data {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new template error with source
    pub fn template_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Template {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new figure error
    pub fn figure(msg: impl Into<String>) -> Self {
        Self::Figure {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new figure error with source
    pub fn figure_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Figure {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new localization error with locale
    pub fn localization_with_locale(msg: impl Into<String>, locale: impl Into<String>) -> Self {
        Self::Localization {
            message: msg.into(),
            locale: Some(locale.into()),
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Whether this error reports an unsupported file format.
    pub const fn is_unsupported_format(&self) -> bool {
        matches!(self, Self::UnsupportedFormat { .. })
    }
}

// Error conversion implementations for external types

/// Convert from reqwest::Error to ReportError
impl From<reqwest::Error> for ReportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network_with_source("Request timeout", err)
        } else if err.is_connect() {
            Self::network_with_source("Connection failed", err)
        } else if err.is_status() {
            let status_code = err.status().map(|s| s.as_u16());
            Self::Network {
                message: format!("HTTP error: {}", status_code.unwrap_or(0)),
                status_code,
                source: Some(Box::new(err)),
            }
        } else {
            Self::network_with_source("Network request failed", err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{error::Error, io};

    #[test]
    fn test_error_creation() {
        let config_error = ReportError::config("config issue");
        assert!(config_error.to_string().contains("Configuration error"));
        assert!(config_error.to_string().contains("config issue"));

        let figure_error = ReportError::figure("dataset 'dpc-regions' is unavailable");
        assert_eq!(
            figure_error.to_string(),
            "Figure error: dataset 'dpc-regions' is unavailable"
        );

        let validation_error = ReportError::validation_field("Invalid input", "bind");
        assert!(validation_error.to_string().contains("Validation error"));
        assert!(validation_error.to_string().contains("Invalid input"));
        assert!(matches!(
            validation_error,
            ReportError::Validation { field: Some(ref field), .. } if field == "bind"
        ));

        let localization_error =
            ReportError::localization_with_locale("Translation missing", "it");
        assert!(localization_error.to_string().contains("Localization error"));
    }

    #[test]
    fn test_unsupported_format_display() {
        let error = ReportError::unsupported_format(FileKind::Description, "txt", "desc/a.txt");
        assert!(error.is_unsupported_format());
        assert_eq!(
            error.to_string(),
            "Unsupported description format 'txt' (desc/a.txt)"
        );

        let error = ReportError::unsupported_format(FileKind::PageConfig, "toml", "a.toml");
        assert!(error.to_string().contains("page config"));
    }

    #[test]
    fn test_error_with_source() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let wrapped_error = ReportError::config_with_source("Failed to read report.yaml", io_error);

        assert!(wrapped_error.to_string().contains("Failed to read report.yaml"));
        assert!(wrapped_error.source().is_some());

        let template_error = ReportError::template_with_source(
            "Template loading failed",
            io::Error::new(io::ErrorKind::PermissionDenied, "Access denied"),
        );
        assert!(template_error.to_string().contains("Template error"));
        assert!(template_error.source().is_some());

        let data_error = ReportError::data_with_source(
            "cannot parse dpc-regions",
            io::Error::new(io::ErrorKind::InvalidData, "bad row"),
        );
        assert!(data_error.source().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let report_error: ReportError = io_error.into();

        assert!(report_error.to_string().contains("I/O error"));
        assert!(report_error.source().is_some());
    }

    #[test]
    fn test_io_error_names_the_path() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "No such file");
        let report_error = ReportError::io_at(Path::new("config/a.yml"), io_error);

        assert_eq!(report_error.to_string(), "I/O error: config/a.yml: No such file");
        match report_error {
            ReportError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_serde_error_conversion() {
        let invalid_json = r#"{"invalid": json}"#;
        let serde_error = serde_json::from_str::<serde_json::Value>(invalid_json).unwrap_err();
        let report_error: ReportError = serde_error.into();
        assert!(report_error.to_string().contains("Serialization error"));

        let yaml_error = serde_yaml::from_str::<Vec<u32>>("a: [").unwrap_err();
        let report_error: ReportError = yaml_error.into();
        assert!(report_error.to_string().contains("YAML error"));
    }

    #[test]
    fn test_error_display_formatting() {
        let config_error = ReportError::config("missing field");
        assert_eq!(
            format!("{config_error}"),
            "Configuration error: missing field"
        );

        let data_error = ReportError::data("unknown column 'x'");
        assert_eq!(format!("{data_error}"), "Data error: unknown column 'x'");
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<String> {
            Ok("success".to_string())
        }

        fn returns_error() -> Result<String> {
            Err(ReportError::data("unknown column 'x'"))
        }

        assert_eq!(returns_result().unwrap(), "success");
        assert!(matches!(returns_error(), Err(ReportError::Data { .. })));
    }
}
