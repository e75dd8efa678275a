//! Test utilities and shared test helpers for covid-report.
//!
//! This module provides common testing utilities, fixtures, and helper functions
//! that can be used across all crates in the workspace for unit and integration testing.

use chrono::NaiveDate;
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt()
            .with_test_writer()
            .with_env_filter(filter)
            .try_init();
    });
}

/// Test fixture for a calendar date.
pub fn mock_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Create a temporary directory for tests that automatically cleans up.
#[cfg(feature = "tempfile")]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Write `contents` to `dir/relative`, creating parent directories.
pub fn write_file(dir: &std::path::Path, relative: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    std::fs::write(&path, contents).expect("Failed to write fixture file");
    path
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Dataset fixtures shaped like the DPC, ISTAT and health-ministry files.
///
/// Regions cover 2020-02-24 to 2020-03-01:
/// - Lombardia crosses 100 cases on 2020-02-25 (the anchor date);
/// - Veneto crosses on 2020-02-27 and has zero ICU patients on the anchor date;
/// - Molise never reaches 100 cases;
/// - a placeholder "In fase di definizione" row on 2020-03-01.
pub mod dataset_fixtures {
    /// Region-level DPC CSV.
    pub fn regions_csv() -> &'static str {
        concat!(
            "data,stato,codice_regione,denominazione_regione,lat,long,ricoverati_con_sintomi,terapia_intensiva,totale_ospedalizzati,isolamento_domiciliare,totale_positivi,variazione_totale_positivi,nuovi_positivi,dimessi_guariti,deceduti,totale_casi,tamponi,note\n",
            "2020-02-24T18:00:00,ITA,3,Lombardia,45.46679409,9.190347404,40,10,50,38,88,0,90,0,2,90,1000,\n",
            "2020-02-24T18:00:00,ITA,5,Veneto,45.43490485,12.33845213,10,0,10,20,30,0,30,0,0,30,500,\n",
            "2020-02-24T18:00:00,ITA,14,Molise,41.55774754,14.65916051,0,0,0,0,0,0,0,0,0,0,0,\n",
            "2020-02-25T18:00:00,ITA,3,Lombardia,45.46679409,9.190347404,50,20,70,36,106,18,20,0,4,110,1500,\n",
            "2020-02-25T18:00:00,ITA,5,Veneto,45.43490485,12.33845213,15,0,15,44,59,29,30,0,1,60,900,\n",
            "2020-02-25T18:00:00,ITA,14,Molise,41.55774754,14.65916051,0,0,0,0,0,0,0,0,0,0,5,\n",
            "2020-02-26T18:00:00,ITA,3,Lombardia,45.46679409,9.190347404,60,25,85,49,134,28,40,10,6,150,2100,\n",
            "2020-02-26T18:00:00,ITA,5,Veneto,45.43490485,12.33845213,20,2,22,72,94,35,35,0,1,95,1400,\n",
            "2020-02-26T18:00:00,ITA,14,Molise,41.55774754,14.65916051,1,0,1,0,1,1,1,0,0,1,10,\n",
            "2020-02-27T18:00:00,ITA,3,Lombardia,45.46679409,9.190347404,80,30,110,66,176,42,50,15,9,200,2000,\n",
            "2020-02-27T18:00:00,ITA,5,Veneto,45.43490485,12.33845213,25,4,29,64,93,-1,5,5,2,100,2000,\n",
            "2020-02-27T18:00:00,ITA,14,Molise,41.55774754,14.65916051,1,0,1,0,1,0,0,0,0,1,12,\n",
            "2020-02-28T18:00:00,ITA,3,Lombardia,45.46679409,9.190347404,100,40,140,83,223,47,60,25,12,260,3000,\n",
            "2020-02-28T18:00:00,ITA,5,Veneto,45.43490485,12.33845213,30,6,36,96,132,39,40,5,3,140,2700,\n",
            "2020-02-28T18:00:00,ITA,14,Molise,41.55774754,14.65916051,1,0,1,1,2,1,1,0,0,2,20,\n",
            "2020-02-29T18:00:00,ITA,3,Lombardia,45.46679409,9.190347404,120,50,170,104,274,51,70,40,16,330,3800,\n",
            "2020-02-29T18:00:00,ITA,5,Veneto,45.43490485,12.33845213,35,8,43,134,177,45,50,10,3,190,3500,\n",
            "2020-02-29T18:00:00,ITA,14,Molise,41.55774754,14.65916051,2,0,2,1,3,1,1,0,0,3,25,\n",
            "2020-03-01T17:00:00,ITA,3,Lombardia,45.46679409,9.190347404,140,60,200,140,340,66,80,50,20,410,4700,\n",
            "2020-03-01T17:00:00,ITA,5,Veneto,45.43490485,12.33845213,40,10,50,181,231,54,60,15,4,250,4400,\n",
            "2020-03-01T17:00:00,ITA,14,Molise,41.55774754,14.65916051,2,0,2,3,5,2,2,0,0,5,30,\n",
            "2020-03-01T17:00:00,ITA,99,In fase di definizione/aggiornamento,,,0,0,0,0,0,0,0,0,0,7,0,\n",
        )
    }

    /// Province-level DPC CSV.
    ///
    /// Bergamo crosses 100 cases on 2020-02-25 and Milano on 2020-02-26;
    /// Padova never does.
    pub fn provinces_csv() -> &'static str {
        concat!(
            "data,stato,codice_regione,denominazione_regione,codice_provincia,denominazione_provincia,sigla_provincia,lat,long,totale_casi,note\n",
            "2020-02-24T18:00:00,ITA,3,Lombardia,16,Bergamo,BG,45.69441368,9.668424528,20,\n",
            "2020-02-24T18:00:00,ITA,3,Lombardia,15,Milano,MI,45.46679409,9.190347404,5,\n",
            "2020-02-24T18:00:00,ITA,3,Lombardia,979,In fase di definizione/aggiornamento,,,,10,\n",
            "2020-02-24T18:00:00,ITA,5,Veneto,28,Padova,PD,45.40692987,11.87608718,10,\n",
            "2020-02-25T18:00:00,ITA,3,Lombardia,16,Bergamo,BG,45.69441368,9.668424528,110,\n",
            "2020-02-25T18:00:00,ITA,3,Lombardia,15,Milano,MI,45.46679409,9.190347404,40,\n",
            "2020-02-25T18:00:00,ITA,3,Lombardia,979,In fase di definizione/aggiornamento,,,,12,\n",
            "2020-02-25T18:00:00,ITA,5,Veneto,28,Padova,PD,45.40692987,11.87608718,30,\n",
            "2020-02-26T18:00:00,ITA,3,Lombardia,16,Bergamo,BG,45.69441368,9.668424528,180,\n",
            "2020-02-26T18:00:00,ITA,3,Lombardia,15,Milano,MI,45.46679409,9.190347404,120,\n",
            "2020-02-26T18:00:00,ITA,3,Lombardia,979,In fase di definizione/aggiornamento,,,,15,\n",
            "2020-02-26T18:00:00,ITA,5,Veneto,28,Padova,PD,45.40692987,11.87608718,60,\n",
            "2020-02-27T18:00:00,ITA,3,Lombardia,16,Bergamo,BG,45.69441368,9.668424528,300,\n",
            "2020-02-27T18:00:00,ITA,3,Lombardia,15,Milano,MI,45.46679409,9.190347404,150,\n",
            "2020-02-27T18:00:00,ITA,3,Lombardia,979,In fase di definizione/aggiornamento,,,,0,\n",
            "2020-02-27T18:00:00,ITA,5,Veneto,28,Padova,PD,45.40692987,11.87608718,90,\n",
        )
    }

    /// Resident population by region.
    pub fn population_csv() -> &'static str {
        concat!(
            "region_code,region,population\n",
            "3,Lombardia,10060574\n",
            "5,Veneto,4905854\n",
            "14,Molise,305617\n",
        )
    }

    /// Intensive care beds by region.
    pub fn icu_beds_csv() -> &'static str {
        concat!("region_code,icu_beds\n", "3,861\n", "5,494\n", "14,30\n")
    }
}

/// Configuration-related test utilities.
pub mod config_fixtures {
    /// A minimal site configuration as YAML string.
    pub fn minimal_config_yaml() -> &'static str {
        r#"
paths:
  templates_dir: "reports/templates"
  config_dir: "reports/config"
"#
    }

    /// A full site configuration as YAML string.
    pub fn full_config_yaml() -> &'static str {
        concat!(
            "paths:\n",
            "  templates_dir: \"reports/templates\"\n",
            "  config_dir: \"reports/config\"\n",
            "  desc_dir: \"reports/descriptions\"\n",
            "  site_dir: \"site\"\n",
            "\n",
            "data:\n",
            "  source: local\n",
            "  dir: \"data\"\n",
            "  timeout_seconds: 10\n",
            "\n",
            "figures:\n",
            "  output_dir: \"site/figures\"\n",
            "  language: en\n",
            "  epidemic_threshold: 50\n",
            "  anchor_date: \"2020-03-01\"\n",
            "  focus_regions: [\"Lombardia\", \"Veneto\", \"Emilia-Romagna\"]\n",
            "  discharge_lag_days: 7\n",
            "  enabled: [\"fig_b001\", \"fig_c001\"]\n",
            "  branding:\n",
            "    text: \"by BuildNN\"\n",
            "    url: \"https://www.buildnn.com\"\n",
            "\n",
            "server:\n",
            "  bind: \"0.0.0.0:8080\"\n",
            "\n",
            "logging:\n",
            "  level: debug\n",
            "  format: json\n",
        )
    }
}

/// Property-based testing utilities using proptest.
#[cfg(feature = "proptest")]
pub mod property_testing {
    use proptest::prelude::*;

    /// Strategy for cumulative-looking integer series, corrections included.
    pub fn cumulative_series_strategy() -> impl Strategy<Value = Vec<i64>> {
        prop::collection::vec(-1_000_000i64..1_000_000i64, 1..60)
    }

    /// Strategy for a monotone cumulative count series of floats.
    pub fn monotone_counts_strategy() -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(0u32..500u32, 1..40).prop_map(|steps| {
            steps
                .into_iter()
                .scan(0.0, |total, step| {
                    *total += f64::from(step);
                    Some(*total)
                })
                .collect()
        })
    }

    /// Strategy for (numerator, denominator, positive scale) triples.
    pub fn ratio_inputs_strategy() -> impl Strategy<Value = (f64, f64, f64)> {
        (0.0f64..1_000_000.0, 1.0f64..1_000_000.0, 0.5f64..1_000.0)
    }
}
