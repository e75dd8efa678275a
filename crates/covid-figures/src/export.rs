//! Standalone HTML export.

use covid_common::{ReportError, Result};
use plotly::{Configuration, Plot};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Hide the plotly logo in the mode bar. Export pages load plotly.js from
/// the CDN.
pub fn finish(plot: &mut Plot) {
    plot.set_configuration(Configuration::new().display_logo(false));
}

/// Write `plot` as a standalone HTML page to `<dir>/<relative>`, creating
/// parent directories.
pub fn write_html(plot: &mut Plot, dir: &Path, relative: &str) -> Result<PathBuf> {
    finish(plot);
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            ReportError::figure_with_source(
                format!("cannot create figure directory {}", parent.display()),
                e,
            )
        })?;
    }

    let html = plot.to_html();
    fs::write(&path, &html).map_err(|e| {
        ReportError::figure_with_source(format!("cannot write figure {}", path.display()), e)
    })?;
    debug!(path = %path.display(), bytes = html.len(), "Figure written");
    Ok(path)
}
