//! Integration tests for covid-common crate.

use std::path::Path;
use std::str::FromStr;

use covid_common::{
    file_extension, log_level_directive, truncate_string, FileKind, Language, ReportError,
};

#[test]
fn test_language_parsing() {
    assert_eq!(Language::from_str("it").unwrap(), Language::It);
    assert_eq!(Language::from_str("EN").unwrap(), Language::En);
    assert_eq!(Language::from_str("en-US").unwrap(), Language::En);
    assert!(Language::from_str("fr").is_err());
    assert_eq!(Language::default(), Language::It);
    assert_eq!(format!("{}", Language::En), "en");
}

#[test]
fn test_file_kind_display() {
    assert_eq!(FileKind::PageConfig.to_string(), "page config");
    assert_eq!(FileKind::Description.to_string(), "description");
}

#[test]
fn test_unsupported_format_carries_details() {
    let error = ReportError::unsupported_format(FileKind::Description, "txt", "a/b.txt");
    match error {
        ReportError::UnsupportedFormat {
            kind,
            extension,
            path,
        } => {
            assert_eq!(kind, FileKind::Description);
            assert_eq!(extension, "txt");
            assert_eq!(path, Path::new("a/b.txt"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_helpers() {
    assert_eq!(file_extension(Path::new("config/page.json")), "json");
    assert_eq!(log_level_directive("WARNING"), "warn");
    assert_eq!(truncate_string("abcdef", 5), "ab...");
}
