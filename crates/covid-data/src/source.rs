//! Dataset names and the sources that serve them.

use async_trait::async_trait;
use covid_common::{ReportError, Result};
use covid_config::{DataConfig, SourceKind};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// The datasets the figures are built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DatasetKey {
    /// Regional time series.
    DpcRegions,
    /// Provincial time series.
    DpcProvinces,
    /// Resident population by region.
    IstatPopulationRegions,
    /// Intensive care beds by region.
    SalutegovIcuBeds,
}

impl DatasetKey {
    /// Every dataset.
    pub const ALL: [Self; 4] = [
        Self::DpcRegions,
        Self::DpcProvinces,
        Self::IstatPopulationRegions,
        Self::SalutegovIcuBeds,
    ];

    /// Name used in configuration and file names.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DpcRegions => "dpc-regions",
            Self::DpcProvinces => "dpc-province",
            Self::IstatPopulationRegions => "istat-population-regions",
            Self::SalutegovIcuBeds => "salutegov-icu-beds",
        }
    }

    /// Local file name, `<name>.csv`.
    pub fn file_name(self) -> String {
        format!("{}.csv", self.as_str())
    }
}

impl fmt::Display for DatasetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetKey {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s.trim())
            .ok_or_else(|| ReportError::data(format!("unknown dataset '{s}'")))
    }
}

/// Something that returns the raw CSV text of a dataset.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Fetch the text of `key`.
    async fn fetch(&self, key: DatasetKey) -> Result<String>;

    /// Human readable location, for logs.
    fn describe(&self, key: DatasetKey) -> String;
}

/// Reads `<dir>/<name>.csv`.
#[derive(Debug, Clone)]
pub struct LocalSource {
    dir: PathBuf,
}

impl LocalSource {
    /// Source rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: DatasetKey) -> PathBuf {
        self.dir.join(key.file_name())
    }
}

#[async_trait]
impl DatasetSource for LocalSource {
    async fn fetch(&self, key: DatasetKey) -> Result<String> {
        let path = self.path(key);
        debug!(dataset = %key, path = %path.display(), "Reading dataset");
        tokio::fs::read_to_string(&path).await.map_err(|e| {
            ReportError::data_with_source(
                format!("cannot read dataset '{key}' from {}", path.display()),
                e,
            )
        })
    }

    fn describe(&self, key: DatasetKey) -> String {
        self.path(key).display().to_string()
    }
}

/// Downloads datasets over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    urls: BTreeMap<String, String>,
}

impl HttpSource {
    /// Source using `urls` keyed by dataset name.
    pub fn new(urls: BTreeMap<String, String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("covid-report/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, urls })
    }

    fn url(&self, key: DatasetKey) -> Result<&str> {
        self.urls
            .get(key.as_str())
            .map(String::as_str)
            .ok_or_else(|| ReportError::config(format!("no URL configured for dataset '{key}'")))
    }
}

#[async_trait]
impl DatasetSource for HttpSource {
    async fn fetch(&self, key: DatasetKey) -> Result<String> {
        let url = self.url(key)?;
        info!(dataset = %key, url, "Downloading dataset");
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    fn describe(&self, key: DatasetKey) -> String {
        self.urls
            .get(key.as_str())
            .cloned()
            .unwrap_or_else(|| format!("<no URL for {key}>"))
    }
}

/// Source selected by the data configuration.
pub fn source_from_config(config: &DataConfig) -> Result<Box<dyn DatasetSource>> {
    Ok(match config.source {
        SourceKind::Local => Box::new(LocalSource::new(&config.dir)),
        SourceKind::Remote => Box::new(HttpSource::new(
            config.urls.clone(),
            Duration::from_secs(config.timeout_seconds),
        )?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use covid_common::test_utils::{create_temp_dir, write_file};

    #[test]
    fn test_dataset_key_names() {
        for key in DatasetKey::ALL {
            assert_eq!(key.as_str().parse::<DatasetKey>().unwrap(), key);
        }
        assert_eq!(DatasetKey::DpcProvinces.file_name(), "dpc-province.csv");
        assert!("owid".parse::<DatasetKey>().is_err());
    }

    #[tokio::test]
    async fn test_local_source_reads_file() {
        let dir = create_temp_dir();
        write_file(dir.path(), "dpc-regions.csv", "data\n");

        let source = LocalSource::new(dir.path());
        assert_eq!(source.fetch(DatasetKey::DpcRegions).await.unwrap(), "data\n");

        let error = source.fetch(DatasetKey::SalutegovIcuBeds).await.unwrap_err();
        assert!(matches!(error, ReportError::Data { .. }));
    }

    #[test]
    fn test_http_source_needs_a_url() {
        let source = HttpSource::new(BTreeMap::new(), Duration::from_secs(1)).unwrap();
        let error = tokio_test::block_on(source.fetch(DatasetKey::IstatPopulationRegions)).unwrap_err();
        assert!(matches!(error, ReportError::Config { .. }));
    }
}
