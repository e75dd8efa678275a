//! Template rendering of page configs.

use crate::markdown::load_description;
use crate::page::{PageConfig, MARK_TEXT};
use covid_common::{file_extension, truncate_string, ReportError, Result};
use covid_config::SiteConfig;
use minijinja::{path_loader, AutoEscape, Environment, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Template extensions rendered with HTML auto-escaping.
pub const AUTO_ESCAPE_EXTENSIONS: [&str; 7] = ["html", "xml", "md", "js", "css", "json", "csv"];

fn auto_escape(name: &str) -> AutoEscape {
    if AUTO_ESCAPE_EXTENSIONS.contains(&file_extension(Path::new(name)).as_str()) {
        AutoEscape::Html
    } else {
        AutoEscape::None
    }
}

/// Renders page configs with templates from one directory and descriptions
/// from another.
#[derive(Debug)]
pub struct TemplateRenderer {
    env: Environment<'static>,
    templates_dir: PathBuf,
    desc_dir: PathBuf,
}

impl TemplateRenderer {
    /// Renderer over explicit template and description directories.
    pub fn new(templates_dir: impl Into<PathBuf>, desc_dir: impl Into<PathBuf>) -> Self {
        let templates_dir = templates_dir.into();
        let mut env = Environment::new();
        env.set_loader(path_loader(&templates_dir));
        env.set_auto_escape_callback(auto_escape);
        Self {
            env,
            templates_dir,
            desc_dir: desc_dir.into(),
        }
    }

    /// Renderer over the directories of the site configuration.
    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(&config.paths.templates_dir, config.paths.desc_dir())
    }

    /// Directory templates are loaded from.
    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }

    /// Directory descriptions are resolved against.
    pub fn desc_dir(&self) -> &Path {
        &self.desc_dir
    }

    /// Free variables of the named template.
    pub fn template_variables(&self, template: &str) -> Result<BTreeSet<String>> {
        let tmpl = self.env.get_template(template).map_err(|e| {
            ReportError::template_with_source(format!("cannot load template '{template}'"), e)
        })?;
        Ok(tmpl.undeclared_variables(false).into_iter().collect())
    }

    /// Render `page`. The description, if any, is rendered first and passed
    /// as `mark_text`, replacing a variable of that name.
    #[instrument(skip_all, fields(template = %page.template))]
    pub fn render(&self, page: &PageConfig) -> Result<String> {
        let mark_text = match &page.desc_file {
            Some(desc_file) => load_description(&self.desc_dir.join(desc_file))?,
            None => String::new(),
        };
        if !mark_text.is_empty() {
            debug!(preview = %truncate_string(&mark_text, 60), "Description rendered");
        }

        let declared = self.template_variables(&page.template)?;
        debug!(variables = ?declared, "Template variables");
        let missing: Vec<&String> = declared
            .iter()
            .filter(|name| name.as_str() != MARK_TEXT && !page.variables.contains_key(name.as_str()))
            .collect();
        if !missing.is_empty() {
            warn!(missing = ?missing, "Template variables not set by the page config");
        }

        let mut ctx: BTreeMap<&str, Value> = page
            .variables
            .iter()
            .map(|(name, value)| (name.as_str(), Value::from_serialize(value)))
            .collect();
        if ctx.contains_key(MARK_TEXT) {
            warn!("Page variable '{MARK_TEXT}' replaced by the rendered description");
        }
        ctx.insert(MARK_TEXT, Value::from_safe_string(mark_text));

        let tmpl = self.env.get_template(&page.template).map_err(|e| {
            ReportError::template_with_source(format!("cannot load template '{}'", page.template), e)
        })?;
        tmpl.render(&ctx).map_err(|e| {
            ReportError::template_with_source(
                format!("cannot render template '{}'", page.template),
                e,
            )
        })
    }

    /// Load the page config at `path` and render it.
    pub fn render_from_config_file(&self, path: &Path) -> Result<String> {
        self.render(&PageConfig::load(path)?)
    }
}

/// Write `rendered` to `output`, creating parent directories.
pub fn save_render(rendered: &str, output: &Path) -> Result<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ReportError::io_at(parent, e))?;
    }
    fs::write(output, rendered).map_err(|e| ReportError::io_at(output, e))?;
    info!(path = %output.display(), bytes = rendered.len(), "Page written");
    Ok(())
}
