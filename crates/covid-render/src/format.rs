//! Input formats resolved from file extensions.

use covid_common::{file_extension, FileKind, ReportError, Result};
use std::fmt;
use std::path::Path;

/// Format of a page config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigFormat {
    /// `.json`
    Json,
    /// `.yml` or `.yaml`
    Yaml,
}

impl ConfigFormat {
    /// Format named by the extension of `path`, compared case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = file_extension(path);
        match extension.as_str() {
            "json" => Ok(Self::Json),
            "yml" | "yaml" => Ok(Self::Yaml),
            _ => Err(ReportError::unsupported_format(
                FileKind::PageConfig,
                extension,
                path,
            )),
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Yaml => f.write_str("yaml"),
        }
    }
}

/// Format of a description file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescFormat {
    /// `.md`
    Markdown,
}

impl DescFormat {
    /// Format named by the extension of `path`, compared case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = file_extension(path);
        match extension.as_str() {
            "md" => Ok(Self::Markdown),
            _ => Err(ReportError::unsupported_format(
                FileKind::Description,
                extension,
                path,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_formats() {
        assert_eq!(ConfigFormat::from_path(Path::new("a/b.yml")).unwrap(), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("b.YAML")).unwrap(), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("b.json")).unwrap(), ConfigFormat::Json);
    }

    #[test]
    fn test_unsupported_config_format() {
        let err = ConfigFormat::from_path(Path::new("pages/home.toml")).unwrap_err();
        assert!(err.is_unsupported_format());
        match err {
            ReportError::UnsupportedFormat {
                kind, extension, ..
            } => {
                assert_eq!(kind, FileKind::PageConfig);
                assert_eq!(extension, "toml");
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(ConfigFormat::from_path(Path::new("no_extension")).is_err());
    }

    #[test]
    fn test_desc_formats() {
        assert_eq!(DescFormat::from_path(Path::new("d.md")).unwrap(), DescFormat::Markdown);
        assert_eq!(DescFormat::from_path(Path::new("d.MD")).unwrap(), DescFormat::Markdown);

        let err = DescFormat::from_path(Path::new("d.txt")).unwrap_err();
        assert!(err.to_string().contains("description"));
        assert!(err.to_string().contains("txt"));
    }
}
