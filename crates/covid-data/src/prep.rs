//! Dataset preparation: placeholder removal and derived columns.

use crate::columns::*;
use crate::derive::{self, AnchorReport};
use crate::frame::{Aggregation, Frame};
use crate::transform::{self, KPI_DECIMALS};
use chrono::NaiveDate;
use covid_common::Result;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Prefix of the rows holding cases not yet attributed to a place.
pub const PLACEHOLDER_PREFIX: &str = "In fase di";

/// Columns normalized by the anchored-ratio figures.
pub const ANCHORED_COLUMNS: [&str; 3] = [TOT_N_HOSPITALIZED, N_INTENSIVE_CARE, N_TESTED];

/// Decimals kept by the saturation share.
pub const SATURATION_DECIMALS: u32 = 4;

/// A ratio column of the KPI catalogue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KpiSpec {
    /// Output column.
    pub name: &'static str,
    /// Numerator column.
    pub numerator: &'static str,
    /// Denominator column.
    pub denominator: &'static str,
    /// Scale applied before rounding.
    pub multiplier: f64,
}

const fn kpi(
    name: &'static str,
    numerator: &'static str,
    denominator: &'static str,
    multiplier: f64,
) -> KpiSpec {
    KpiSpec {
        name,
        numerator,
        denominator,
        multiplier,
    }
}

/// Ratios derived for every region once population is joined.
pub const KPI_CATALOGUE: [KpiSpec; 9] = [
    kpi(TEST_PTHAB, N_TESTED, POPULATION, 1000.0),
    kpi(TEST_PDISCH, N_TESTED, N_DISCHARGED_RECOVERED, 1.0),
    kpi(TEST_PICU, N_TESTED, N_INTENSIVE_CARE, 1.0),
    kpi(TEST_PDEC, N_TESTED, N_DECEASED, 1.0),
    kpi(TEST_PHOSP, N_TESTED, N_HOSPITALIZED, 1.0),
    kpi(MORTALITY, N_DECEASED, TOT_N_CASES, 1.0),
    kpi(DEATHS_PTHAB, N_DECEASED, POPULATION, 1000.0),
    kpi(DEATHS_PHHAB, N_DECEASED, POPULATION, 10000.0),
    kpi(POS_PTHAB, TOTALE_POSITIVI, POPULATION, 1000.0),
];

/// Columns summed into the national series.
const NATIONAL_COLUMNS: [&str; 12] = [
    N_HOSPITALIZED,
    N_INTENSIVE_CARE,
    TOT_N_HOSPITALIZED,
    N_HOME_QUARANTINE,
    TOTALE_POSITIVI,
    VARIAZIONE_TOTALE_POSITIVI,
    NUOVI_POSITIVI,
    N_DISCHARGED_RECOVERED,
    N_DECEASED,
    TOT_N_CASES,
    N_TESTED,
    BEING_TESTED,
];

fn is_placeholder(name: &str) -> bool {
    name.starts_with(PLACEHOLDER_PREFIX)
}

/// Drop placeholder rows, sort by time and derive the daily series and
/// `active` per region.
pub fn prep_regions(raw: &Frame) -> Result<Frame> {
    let mut frame = raw
        .filter_labels(REGION, |region| !is_placeholder(region))?
        .sort_by_time();
    debug!(
        dropped = raw.len() - frame.len(),
        rows = frame.len(),
        "Placeholder regional rows removed"
    );

    derive::difference_column(
        &mut frame,
        TOT_N_CASES,
        &[N_DISCHARGED_RECOVERED, N_DECEASED],
        ACTIVE,
    )?;
    derive::decumulate_column(&mut frame, REGION, N_TESTED, BEING_TESTED, Some(0.0))?;
    derive::clip_negative(&mut frame, BEING_TESTED)?;
    derive::decumulate_column(&mut frame, REGION, N_DECEASED, NEW_DECEASED, Some(0.0))?;
    derive::decumulate_column(
        &mut frame,
        REGION,
        N_DISCHARGED_RECOVERED,
        NEW_DISCHARGED,
        Some(0.0),
    )?;
    Ok(frame)
}

/// National series summed over the prepared regions, with daily series,
/// epidemic age and the lagged discharge series. Returns the national
/// epidemic start alongside.
pub fn prep_italy(
    regions: &Frame,
    threshold: f64,
    discharge_lag_days: usize,
) -> Result<(Frame, Option<NaiveDate>)> {
    let mut italy = regions.aggregate_by_time(&NATIONAL_COLUMNS, Aggregation::Sum)?;

    derive::decumulate_series(&mut italy, N_DECEASED, NEW_DECEASED, Some(0.0))?;
    derive::decumulate_series(&mut italy, N_DISCHARGED_RECOVERED, NEW_DISCHARGED, Some(0.0))?;
    derive::difference_column(
        &mut italy,
        TOT_N_CASES,
        &[N_DISCHARGED_RECOVERED, N_DECEASED],
        ACTIVE,
    )?;
    let start = derive::epidemic_age_series(&mut italy, TOT_N_CASES, threshold)?;

    let lagged = transform::lag(italy.values(NEW_DISCHARGED)?, discharge_lag_days, Some(0.0));
    italy.set_values(SECOND_DISCH_TOTEST, lagged)?;

    info!(rows = italy.len(), epidemic_start = ?start, "National series prepared");
    Ok((italy, start))
}

/// Drop placeholder provinces and write each province's epidemic age.
pub fn prep_provinces(
    raw: &Frame,
    threshold: f64,
) -> Result<(Frame, BTreeMap<String, Option<NaiveDate>>)> {
    let mut frame = raw
        .filter_labels(PROVINCE, |province| !is_placeholder(province))?
        .sort_by_time();
    let starts = derive::epidemic_age_column(&mut frame, PROVINCE, TOT_N_CASES, threshold)?;
    Ok((frame, starts))
}

/// Join population by region code and derive the KPI catalogue.
pub fn with_population(frame: &mut Frame, population: &BTreeMap<String, f64>) -> Result<()> {
    frame.join_values(REGION_CODE, population, POPULATION)?;
    for kpi in KPI_CATALOGUE {
        derive::ratio_column(
            frame,
            kpi.numerator,
            kpi.denominator,
            kpi.name,
            kpi.multiplier,
            KPI_DECIMALS,
        )?;
    }
    Ok(())
}

/// Join intensive care beds by region code and derive their saturation.
pub fn with_icu_beds(frame: &mut Frame, beds: &BTreeMap<String, f64>) -> Result<()> {
    frame.join_values(REGION_CODE, beds, ICU_BEDS)?;
    derive::ratio_column(
        frame,
        N_INTENSIVE_CARE,
        ICU_BEDS,
        ICU_SATURATION,
        1.0,
        SATURATION_DECIMALS,
    )
}

/// `tests_per_managed_case = being_tested / (nuovi_positivi + new_discharged)`.
pub fn with_tests_per_managed_case(frame: &mut Frame) -> Result<()> {
    let ratios = frame
        .values(BEING_TESTED)?
        .iter()
        .zip(frame.values(NUOVI_POSITIVI)?)
        .zip(frame.values(NEW_DISCHARGED)?)
        .map(|((&tests, &positives), &discharged)| {
            let managed = positives.zip(discharged).map(|(p, d)| p + d);
            transform::kpi_ratio(tests, managed, 1.0)
        })
        .collect();
    frame.set_values(TESTS_PER_MANAGED_CASE, ratios)
}

/// Anchored ratios of [`ANCHORED_COLUMNS`] per region.
pub fn anchor_regions(frame: &mut Frame, anchor: NaiveDate) -> Result<AnchorReport> {
    let report = derive::anchor_columns(frame, REGION, &ANCHORED_COLUMNS, anchor)?;
    if !report.skipped.is_empty() {
        info!(
            skipped = report.skipped.len(),
            written = report.written.len(),
            %anchor,
            "Anchored ratios computed with skipped groups"
        );
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_regions;
    use covid_common::test_utils::dataset_fixtures;

    #[test]
    fn test_placeholder_rows_removed() {
        let raw = parse_regions(dataset_fixtures::regions_csv()).unwrap();
        let regions = prep_regions(&raw).unwrap();
        assert_eq!(regions.len(), 21);
        assert!(regions
            .labels(REGION)
            .unwrap()
            .iter()
            .all(|r| !r.starts_with(PLACEHOLDER_PREFIX)));
    }

    #[test]
    fn test_kpi_catalogue_names_are_unique() {
        let mut names: Vec<&str> = KPI_CATALOGUE.iter().map(|k| k.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), KPI_CATALOGUE.len());
    }
}
