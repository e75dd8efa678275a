//! Fetch-and-parse front end over a [`DatasetSource`].

use crate::frame::Frame;
use crate::parse;
use crate::source::{source_from_config, DatasetKey, DatasetSource};
use covid_common::{format_elapsed, Result};
use covid_config::DataConfig;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{info, instrument};

/// Loads datasets by key and parses them.
pub struct DataLoader {
    source: Box<dyn DatasetSource>,
}

impl DataLoader {
    /// Loader over an explicit source.
    pub fn new(source: Box<dyn DatasetSource>) -> Self {
        Self { source }
    }

    /// Loader over the source selected by configuration.
    pub fn from_config(config: &DataConfig) -> Result<Self> {
        Ok(Self::new(source_from_config(config)?))
    }

    /// Raw text of a dataset.
    #[instrument(skip(self), fields(dataset = %key))]
    pub async fn fetch_text(&self, key: DatasetKey) -> Result<String> {
        let started = Instant::now();
        let text = self.source.fetch(key).await?;
        info!(
            location = %self.source.describe(key),
            bytes = text.len(),
            elapsed = %format_elapsed(started.elapsed()),
            "Dataset fetched"
        );
        Ok(text)
    }

    /// Regional time series.
    pub async fn regions(&self) -> Result<Frame> {
        parse::parse_regions(&self.fetch_text(DatasetKey::DpcRegions).await?)
    }

    /// Provincial time series.
    pub async fn provinces(&self) -> Result<Frame> {
        parse::parse_provinces(&self.fetch_text(DatasetKey::DpcProvinces).await?)
    }

    /// Population by region code.
    pub async fn population(&self) -> Result<BTreeMap<String, f64>> {
        parse::parse_population(&self.fetch_text(DatasetKey::IstatPopulationRegions).await?)
    }

    /// Intensive care beds by region code.
    pub async fn icu_beds(&self) -> Result<BTreeMap<String, f64>> {
        parse::parse_icu_beds(&self.fetch_text(DatasetKey::SalutegovIcuBeds).await?)
    }
}
