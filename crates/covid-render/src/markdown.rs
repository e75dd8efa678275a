//! Markdown descriptions rendered to HTML.

use crate::format::DescFormat;
use covid_common::{ReportError, Result};
use pulldown_cmark::{html, Options, Parser};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Render Markdown to HTML, with tables and strikethrough.
pub fn render_markdown(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, Parser::new_ext(text, options));
    out
}

/// Read and render the description at `path`. The extension is checked
/// before the file is opened.
pub fn load_description(path: &Path) -> Result<String> {
    match DescFormat::from_path(path)? {
        DescFormat::Markdown => {
            let text = fs::read_to_string(path).map_err(|e| ReportError::io_at(path, e))?;
            debug!(path = %path.display(), bytes = text.len(), "Description loaded");
            Ok(render_markdown(&text))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_markdown() {
        let html = render_markdown("# Titolo\n\nTesto *enfatico* e ~~barrato~~.\n");
        assert!(html.contains("<h1>Titolo</h1>"));
        assert!(html.contains("<em>enfatico</em>"));
        assert!(html.contains("<del>barrato</del>"));
    }

    #[test]
    fn test_render_table() {
        let html = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>2</td>"));
    }

    #[test]
    fn test_wrong_extension_is_not_read() {
        // The file does not exist: the format error comes first
        let err = load_description(Path::new("/nonexistent/notes.txt")).unwrap_err();
        assert!(err.is_unsupported_format());

        let err = load_description(Path::new("/nonexistent/notes.md")).unwrap_err();
        assert!(matches!(err, ReportError::Io(_)), "{err:?}");
    }
}
