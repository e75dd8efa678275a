//! Column names shared by the parsers, the preparation steps and the figures.

/// Country code.
pub const COUNTRY: &str = "country";
/// Region code.
pub const REGION_CODE: &str = "region_code";
/// Region name.
pub const REGION: &str = "region";
/// Province code.
pub const PROVINCE_CODE: &str = "province_code";
/// Province name.
pub const PROVINCE: &str = "province";
/// Province abbreviation.
pub const PROVINCE_ABBREVIATION: &str = "province_abbreviation";

/// Hospitalized with symptoms.
pub const N_HOSPITALIZED: &str = "n_hospitalized";
/// In intensive care.
pub const N_INTENSIVE_CARE: &str = "n_intensive_care";
/// Total hospitalized.
pub const TOT_N_HOSPITALIZED: &str = "tot_n_hospitalized";
/// Home isolation.
pub const N_HOME_QUARANTINE: &str = "n_home_quarantine";
/// Currently positive.
pub const TOTALE_POSITIVI: &str = "totale_positivi";
/// Change of currently positive.
pub const VARIAZIONE_TOTALE_POSITIVI: &str = "variazione_totale_positivi";
/// New positives.
pub const NUOVI_POSITIVI: &str = "nuovi_positivi";
/// Cumulative discharged or recovered.
pub const N_DISCHARGED_RECOVERED: &str = "n_discharged_recovered";
/// Cumulative deaths.
pub const N_DECEASED: &str = "n_deceased";
/// Cumulative cases.
pub const TOT_N_CASES: &str = "tot_n_cases";
/// Cumulative tests.
pub const N_TESTED: &str = "n_tested";

/// Every numeric column of the regional dataset.
pub const REGION_VALUE_COLUMNS: [&str; 11] = [
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
];

// Derived
/// Daily tests, negatives clipped to zero.
pub const BEING_TESTED: &str = "being_tested";
/// Daily deaths.
pub const NEW_DECEASED: &str = "new_deceased";
/// Daily discharged or recovered.
pub const NEW_DISCHARGED: &str = "new_discharged";
/// Cases neither discharged nor deceased.
pub const ACTIVE: &str = "active";
/// Daily discharged shifted by the discharge lag.
pub const SECOND_DISCH_TOTEST: &str = "second_disch_totest";
/// Resident population.
pub const POPULATION: &str = "population";
/// Intensive care beds.
pub const ICU_BEDS: &str = "icu_beds";
/// Share of intensive care beds in use.
pub const ICU_SATURATION: &str = "icu_saturation";
/// Daily tests per newly positive or discharged case.
pub const TESTS_PER_MANAGED_CASE: &str = "tests_per_managed_case";

/// Tests per thousand residents.
pub const TEST_PTHAB: &str = "test_pthab";
/// Tests per discharged.
pub const TEST_PDISCH: &str = "test_pdisch";
/// Tests per intensive care patient.
pub const TEST_PICU: &str = "test_picu";
/// Tests per death.
pub const TEST_PDEC: &str = "test_pdec";
/// Tests per hospitalized.
pub const TEST_PHOSP: &str = "test_phosp";
/// Deaths per case.
pub const MORTALITY: &str = "mortality";
/// Deaths per thousand residents.
pub const DEATHS_PTHAB: &str = "deaths_pthab";
/// Deaths per ten thousand residents.
pub const DEATHS_PHHAB: &str = "deaths_phhab";
/// Currently positive per thousand residents.
pub const POS_PTHAB: &str = "pos_pthab";
