//! Prepared datasets and settings shared by every figure of a run.

use chrono::NaiveDate;
use covid_common::{ReportError, Result};
use covid_config::{BrandingConfig, FiguresConfig};
use covid_data::columns::{REGION, TOT_N_CASES};
use covid_data::{
    anchor_regions, epidemic_age_column, prep_italy, prep_provinces, prep_regions, with_icu_beds,
    with_population, with_tests_per_managed_case, AnchorReport, DatasetKey, Frame,
};
use covid_i18n::Labels;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Figure parameters taken from the `figures` configuration section.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureSettings {
    /// Cumulative case count that starts a group's epidemic.
    pub epidemic_threshold: f64,
    /// Date the anchored ratios are normalized on.
    pub anchor_date: NaiveDate,
    /// Regions compared by the regional figures.
    pub focus_regions: Vec<String>,
    /// Shift of the lagged discharge series.
    pub discharge_lag_days: usize,
    /// Watermark text and link.
    pub branding: BrandingConfig,
}

impl From<&FiguresConfig> for FigureSettings {
    fn from(config: &FiguresConfig) -> Self {
        Self {
            epidemic_threshold: config.epidemic_threshold,
            anchor_date: config.anchor_date,
            focus_regions: config.focus_regions.clone(),
            discharge_lag_days: config.discharge_lag_days,
            branding: config.branding.clone(),
        }
    }
}

/// Datasets as parsed, before any derivation. Absent entries were not
/// needed by the selected figures.
#[derive(Debug, Clone, Default)]
pub struct RawDatasets {
    /// Regional time series.
    pub regions: Option<Frame>,
    /// Provincial time series.
    pub provinces: Option<Frame>,
    /// Population by region code.
    pub population: Option<BTreeMap<String, f64>>,
    /// Intensive care beds by region code.
    pub icu_beds: Option<BTreeMap<String, f64>>,
}

/// Derived frames plus the settings and labels the figures draw with.
#[derive(Debug)]
pub struct FigureContext {
    settings: FigureSettings,
    labels: Labels,
    regions: Option<Frame>,
    italy: Option<Frame>,
    italy_start: Option<NaiveDate>,
    provinces: Option<Frame>,
    province_starts: BTreeMap<String, Option<NaiveDate>>,
    anchor_report: AnchorReport,
}

impl FigureContext {
    /// Run every derivation the available datasets allow.
    pub fn prepare(raw: RawDatasets, settings: FigureSettings, labels: Labels) -> Result<Self> {
        let threshold = settings.epidemic_threshold;
        let mut ctx = Self {
            settings,
            labels,
            regions: None,
            italy: None,
            italy_start: None,
            provinces: None,
            province_starts: BTreeMap::new(),
            anchor_report: AnchorReport::default(),
        };

        if let Some(raw_regions) = raw.regions {
            let mut regions = prep_regions(&raw_regions)?;
            epidemic_age_column(&mut regions, REGION, TOT_N_CASES, threshold)?;
            ctx.anchor_report = anchor_regions(&mut regions, ctx.settings.anchor_date)?;
            if let Some(population) = &raw.population {
                with_population(&mut regions, population)?;
            }
            if let Some(beds) = &raw.icu_beds {
                with_icu_beds(&mut regions, beds)?;
            }
            with_tests_per_managed_case(&mut regions)?;

            let (italy, start) =
                prep_italy(&regions, threshold, ctx.settings.discharge_lag_days)?;
            ctx.italy = Some(italy);
            ctx.italy_start = start;
            ctx.regions = Some(regions);
        }

        if let Some(raw_provinces) = raw.provinces {
            let (provinces, starts) = prep_provinces(&raw_provinces, threshold)?;
            let crossed = starts.values().filter(|s| s.is_some()).count();
            debug!(provinces = starts.len(), crossed, "Provincial epidemic starts");
            ctx.provinces = Some(provinces);
            ctx.province_starts = starts;
        }

        info!(
            regions = ctx.regions.as_ref().map_or(0, Frame::len),
            provinces = ctx.provinces.as_ref().map_or(0, Frame::len),
            anchor_skips = ctx.anchor_report.skipped.len(),
            "Figure data prepared"
        );
        Ok(ctx)
    }

    /// Figure settings.
    pub const fn settings(&self) -> &FigureSettings {
        &self.settings
    }

    /// Label catalogue.
    pub const fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Prepared regional frame.
    pub fn regions(&self) -> Result<&Frame> {
        self.regions
            .as_ref()
            .ok_or_else(|| not_loaded(DatasetKey::DpcRegions))
    }

    /// National series summed over the regions.
    pub fn italy(&self) -> Result<&Frame> {
        self.italy
            .as_ref()
            .ok_or_else(|| not_loaded(DatasetKey::DpcRegions))
    }

    /// National epidemic start, if the threshold was ever reached.
    pub const fn italy_start(&self) -> Option<NaiveDate> {
        self.italy_start
    }

    /// Prepared provincial frame.
    pub fn provinces(&self) -> Result<&Frame> {
        self.provinces
            .as_ref()
            .ok_or_else(|| not_loaded(DatasetKey::DpcProvinces))
    }

    /// Epidemic start of every province.
    pub const fn province_starts(&self) -> &BTreeMap<String, Option<NaiveDate>> {
        &self.province_starts
    }

    /// Groups and columns the anchored ratios skipped.
    pub const fn anchor_report(&self) -> &AnchorReport {
        &self.anchor_report
    }
}

fn not_loaded(key: DatasetKey) -> ReportError {
    ReportError::figure(format!("dataset '{key}' was not loaded for this run"))
}
