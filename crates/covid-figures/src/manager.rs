//! Figure manager for orchestrating a full generation run.

use crate::catalogue::catalogue;
use crate::context::{FigureContext, FigureSettings, RawDatasets};
use crate::export::write_html;
use crate::traits::Figure;
use covid_common::{format_elapsed, Language, ReportError, Result};
use covid_config::SiteConfig;
use covid_data::{DataLoader, DatasetKey};
use covid_i18n::Labels;
use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, instrument};

/// Outcome of a generation run.
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Files written, in build order.
    pub written: Vec<PathBuf>,
    /// Figures that failed, with the error.
    pub failed: Vec<(String, ReportError)>,
}

impl GenerationReport {
    /// Whether every selected figure was written.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// The report, or an error naming the failed figures.
    pub fn into_result(self) -> Result<Self> {
        if self.is_complete() {
            return Ok(self);
        }
        let names: Vec<&str> = self.failed.iter().map(|(name, _)| name.as_str()).collect();
        Err(ReportError::figure(format!(
            "{} of {} figures failed: {}",
            self.failed.len(),
            self.failed.len() + self.written.len(),
            names.join(", ")
        )))
    }
}

/// Loads the datasets, builds the selected figures and writes them.
pub struct FigureManager {
    loader: DataLoader,
    settings: FigureSettings,
    language: Language,
    output_dir: PathBuf,
    enabled: Vec<String>,
}

impl FigureManager {
    /// Manager over the data source selected by `config`.
    pub fn new(config: &SiteConfig) -> Result<Self> {
        Ok(Self::with_loader(config, DataLoader::from_config(&config.data)?))
    }

    /// Manager over an explicit loader.
    pub fn with_loader(config: &SiteConfig, loader: DataLoader) -> Self {
        Self {
            loader,
            settings: FigureSettings::from(&config.figures),
            language: config.figures.language,
            output_dir: config.figures_dir(),
            enabled: config.figures.enabled.clone(),
        }
    }

    /// Directory the figures are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Figures to build. A non-empty `only` names them explicitly and
    /// overrides the enabled list; unknown names are rejected.
    pub fn select(&self, only: &[String]) -> Result<Vec<Box<dyn Figure>>> {
        let figures = catalogue();
        if only.is_empty() {
            return Ok(figures
                .into_iter()
                .filter(|f| self.enabled.is_empty() || self.enabled.iter().any(|n| n == f.name()))
                .collect());
        }

        if let Some(unknown) = only
            .iter()
            .find(|name| !figures.iter().any(|f| f.name() == name.as_str()))
        {
            return Err(ReportError::validation_field(
                format!("unknown figure '{unknown}'"),
                "figures",
            ));
        }
        Ok(figures
            .into_iter()
            .filter(|f| only.iter().any(|n| n == f.name()))
            .collect())
    }

    /// Load the datasets the given figures read, once each. Datasets that
    /// fail to load are returned with their error instead.
    #[instrument(skip_all, fields(figures = figures.len()))]
    pub async fn load(
        &self,
        figures: &[Box<dyn Figure>],
    ) -> (RawDatasets, BTreeMap<DatasetKey, ReportError>) {
        let needed: BTreeSet<DatasetKey> = figures
            .iter()
            .flat_map(|f| f.requires().iter().copied())
            .collect();
        let wants = |key| needed.contains(&key);

        let (regions, provinces, population, icu_beds) = tokio::join!(
            fetch(wants(DatasetKey::DpcRegions), self.loader.regions()),
            fetch(wants(DatasetKey::DpcProvinces), self.loader.provinces()),
            fetch(wants(DatasetKey::IstatPopulationRegions), self.loader.population()),
            fetch(wants(DatasetKey::SalutegovIcuBeds), self.loader.icu_beds()),
        );

        let mut failed = BTreeMap::new();
        let raw = RawDatasets {
            regions: settle(DatasetKey::DpcRegions, regions, &mut failed),
            provinces: settle(DatasetKey::DpcProvinces, provinces, &mut failed),
            population: settle(DatasetKey::IstatPopulationRegions, population, &mut failed),
            icu_beds: settle(DatasetKey::SalutegovIcuBeds, icu_beds, &mut failed),
        };
        (raw, failed)
    }

    /// Build and write the selected figures. A failing figure is logged and
    /// the run goes on with the next one.
    #[instrument(skip(self), fields(output_dir = %self.output_dir.display()))]
    pub async fn generate(&self, only: &[String]) -> Result<GenerationReport> {
        let started = Instant::now();
        let figures = self.select(only)?;
        if figures.is_empty() {
            info!("No figures selected");
            return Ok(GenerationReport::default());
        }

        let (raw, unavailable) = self.load(&figures).await;
        let ctx = FigureContext::prepare(raw, self.settings.clone(), Labels::new(self.language)?)?;

        let mut report = GenerationReport::default();
        for figure in &figures {
            let missing = figure
                .requires()
                .iter()
                .find(|key| unavailable.contains_key(key));
            let built = match missing {
                Some(key) => Err(ReportError::figure(format!("dataset '{key}' is unavailable"))),
                None => build_one(figure.as_ref(), &ctx, &self.output_dir),
            };
            match built {
                Ok(path) => {
                    info!(figure = figure.name(), path = %path.display(), "Figure generated");
                    report.written.push(path);
                }
                Err(e) => {
                    error!(figure = figure.name(), error = %e, "Figure generation failed");
                    report.failed.push((figure.name().to_string(), e));
                }
            }
        }

        info!(
            written = report.written.len(),
            failed = report.failed.len(),
            elapsed = %format_elapsed(started.elapsed()),
            "Figure generation finished"
        );
        Ok(report)
    }
}

async fn fetch<T>(wanted: bool, load: impl Future<Output = Result<T>>) -> Option<Result<T>> {
    if wanted {
        Some(load.await)
    } else {
        None
    }
}

fn settle<T>(
    key: DatasetKey,
    loaded: Option<Result<T>>,
    failed: &mut BTreeMap<DatasetKey, ReportError>,
) -> Option<T> {
    match loaded? {
        Ok(value) => Some(value),
        Err(e) => {
            error!(dataset = %key, error = %e, "Dataset could not be loaded");
            failed.insert(key, e);
            None
        }
    }
}

fn build_one(figure: &dyn Figure, ctx: &FigureContext, output_dir: &Path) -> Result<PathBuf> {
    let mut plot = figure.build(ctx)?;
    write_html(&mut plot, output_dir, figure.output_path())
}
