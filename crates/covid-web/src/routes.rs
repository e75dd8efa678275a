//! Routes derived from the page config tree.

use covid_common::{ReportError, Result};
use covid_config::SiteConfig;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use url::Url;

/// Extension of the page configs that become routes.
pub const ROUTE_EXTENSION: &str = "yml";

/// Prefixes served from the site directory.
pub const RESERVED_PREFIXES: [&str; 2] = ["/assets", "/figures"];

/// Route path of a config at `relative` below the config directory: its
/// components joined by `/`, without the extension. Each component is
/// percent-encoded, since requests are matched on the encoded path.
pub fn route_for(relative: &Path) -> Option<String> {
    let stem = relative.with_extension("");
    let segments = stem
        .components()
        .map(|component| component.as_os_str().to_str())
        .collect::<Option<Vec<&str>>>()?;
    if segments.is_empty() {
        return None;
    }

    let mut url = Url::parse("http://localhost/").ok()?;
    url.path_segments_mut().ok()?.pop_if_empty().extend(segments);
    Some(url.path().to_string())
}

fn is_reserved(route: &str) -> bool {
    RESERVED_PREFIXES.iter().any(|prefix| {
        route == *prefix
            || route
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

/// Every page route and the config it renders, sorted by route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    routes: BTreeMap<String, PathBuf>,
}

impl RouteTable {
    /// Walk `config_dir` and register every `.yml` file.
    pub fn scan(config_dir: &Path) -> Result<Self> {
        let mut table = Self::default();
        table.walk(config_dir, config_dir)?;
        info!(
            dir = %config_dir.display(),
            routes = table.routes.len(),
            "Route table built"
        );
        Ok(table)
    }

    /// Route table of the site's page config directory.
    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        Self::scan(&config.paths.config_dir)
    }

    fn walk(&mut self, root: &Path, dir: &Path) -> Result<()> {
        let entries = fs::read_dir(dir).map_err(|e| {
            ReportError::config_with_source(
                format!("cannot list page configs in {}", dir.display()),
                e,
            )
        })?;
        let mut paths: Vec<PathBuf> = entries
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<_>>()?;
        paths.sort();

        for path in paths {
            if path.is_dir() {
                self.walk(root, &path)?;
            } else if path.extension().is_some_and(|ext| ext == ROUTE_EXTENSION) {
                self.register(root, path);
            }
        }
        Ok(())
    }

    fn register(&mut self, root: &Path, path: PathBuf) {
        let Some(route) = path.strip_prefix(root).ok().and_then(route_for) else {
            warn!(path = %path.display(), "Page config name is not valid UTF-8, skipped");
            return;
        };
        if route.contains([':', '*']) {
            warn!(%route, path = %path.display(), "Route contains path parameters, skipped");
            return;
        }
        if is_reserved(&route) {
            warn!(%route, path = %path.display(), "Route shadows a static directory, skipped");
            return;
        }
        debug!(%route, path = %path.display(), "Route registered");
        self.routes.insert(route, path);
    }

    /// Config rendered by `route`.
    pub fn get(&self, route: &str) -> Option<&Path> {
        self.routes.get(route).map(PathBuf::as_path)
    }

    /// Routes and their configs, sorted by route.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.routes
            .iter()
            .map(|(route, path)| (route.as_str(), path.as_path()))
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether no config was found.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
