//! CSV text to frames and lookup tables.

use crate::columns::*;
use crate::frame::Frame;
use crate::record::{IcuBedsRecord, PopulationRecord, ProvinceRecord, RegionRecord};
use covid_common::Result;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use tracing::debug;

fn read_records<T: DeserializeOwned>(text: &str) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());
    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record?);
    }
    Ok(records)
}

/// Parse the regional dataset.
pub fn parse_regions(text: &str) -> Result<Frame> {
    let records: Vec<RegionRecord> = read_records(text)?;
    debug!(rows = records.len(), "Parsed regional records");

    let numeric: [(&str, fn(&RegionRecord) -> Option<f64>); 11] = [
        (N_HOSPITALIZED, |r| r.n_hospitalized),
        (N_INTENSIVE_CARE, |r| r.n_intensive_care),
        (TOT_N_HOSPITALIZED, |r| r.tot_n_hospitalized),
        (N_HOME_QUARANTINE, |r| r.n_home_quarantine),
        (TOTALE_POSITIVI, |r| r.totale_positivi),
        (VARIAZIONE_TOTALE_POSITIVI, |r| r.variazione_totale_positivi),
        (NUOVI_POSITIVI, |r| r.nuovi_positivi),
        (N_DISCHARGED_RECOVERED, |r| r.n_discharged_recovered),
        (N_DECEASED, |r| r.n_deceased),
        (TOT_N_CASES, |r| r.tot_n_cases),
        (N_TESTED, |r| r.n_tested),
    ];

    let mut frame = Frame::new(records.iter().map(|r| r.time).collect())
        .with_labels(COUNTRY, records.iter().map(|r| r.country.clone()).collect())?
        .with_labels(REGION_CODE, records.iter().map(|r| r.region_code.clone()).collect())?
        .with_labels(REGION, records.iter().map(|r| r.region.clone()).collect())?;
    for (name, field) in numeric {
        frame.set_values(name, records.iter().map(field).collect())?;
    }
    Ok(frame)
}

/// Parse the provincial dataset.
pub fn parse_provinces(text: &str) -> Result<Frame> {
    let records: Vec<ProvinceRecord> = read_records(text)?;
    debug!(rows = records.len(), "Parsed provincial records");

    Frame::new(records.iter().map(|r| r.time).collect())
        .with_labels(COUNTRY, records.iter().map(|r| r.country.clone()).collect())?
        .with_labels(REGION_CODE, records.iter().map(|r| r.region_code.clone()).collect())?
        .with_labels(REGION, records.iter().map(|r| r.region.clone()).collect())?
        .with_labels(PROVINCE_CODE, records.iter().map(|r| r.province_code.clone()).collect())?
        .with_labels(PROVINCE, records.iter().map(|r| r.province.clone()).collect())?
        .with_labels(
            PROVINCE_ABBREVIATION,
            records.iter().map(|r| r.province_abbreviation.clone()).collect(),
        )?
        .with_values(TOT_N_CASES, records.iter().map(|r| r.tot_n_cases).collect())
}

/// Parse the population table, keyed by region code.
pub fn parse_population(text: &str) -> Result<BTreeMap<String, f64>> {
    let records: Vec<PopulationRecord> = read_records(text)?;
    Ok(records
        .into_iter()
        .map(|r| (r.region_code, r.population))
        .collect())
}

/// Parse the intensive care capacity table, keyed by region code.
pub fn parse_icu_beds(text: &str) -> Result<BTreeMap<String, f64>> {
    let records: Vec<IcuBedsRecord> = read_records(text)?;
    Ok(records.into_iter().map(|r| (r.region_code, r.icu_beds)).collect())
}
