//! Integration tests for covid-data crate.

use covid_common::test_utils::{
    assert_approx_eq, create_temp_dir, dataset_fixtures, init_test_logging, mock_date, write_file,
};
use covid_data::columns::*;
use covid_data::{
    anchor_regions, anchored_name, parse_icu_beds, parse_population, parse_provinces,
    parse_regions, prep_italy, prep_provinces, prep_regions, with_icu_beds, with_population,
    with_tests_per_managed_case, AnchorSkipReason, DataLoader, DatasetKey, Frame, LocalSource,
    EPIDEMIC_AGE,
};

fn region_rows(frame: &Frame, region: &str) -> Vec<usize> {
    frame
        .groups(REGION)
        .unwrap()
        .into_iter()
        .find(|g| g.key == region)
        .map(|g| g.rows)
        .unwrap()
}

fn column(frame: &Frame, name: &str, rows: &[usize]) -> Vec<Option<f64>> {
    frame.gather(name, rows).unwrap()
}

fn defined(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().copied().map(Some).collect()
}

fn regions() -> Frame {
    prep_regions(&parse_regions(dataset_fixtures::regions_csv()).unwrap()).unwrap()
}

#[test]
fn test_region_daily_series() {
    let frame = regions();
    let lombardia = region_rows(&frame, "Lombardia");

    assert_eq!(
        column(&frame, BEING_TESTED, &lombardia),
        defined(&[0.0, 500.0, 600.0, 0.0, 1000.0, 800.0, 900.0])
    );
    assert_eq!(
        column(&frame, NEW_DECEASED, &lombardia),
        defined(&[0.0, 2.0, 2.0, 3.0, 3.0, 4.0, 4.0])
    );
    assert_eq!(
        column(&frame, NEW_DISCHARGED, &lombardia),
        defined(&[0.0, 0.0, 10.0, 5.0, 10.0, 15.0, 10.0])
    );
    assert_eq!(column(&frame, ACTIVE, &lombardia)[6], Some(340.0));
}

#[test]
fn test_region_anchoring_reports_skips() {
    init_test_logging();
    let mut frame = regions();
    let report = anchor_regions(&mut frame, mock_date(2020, 2, 25)).unwrap();

    assert_eq!(report.written.len(), 3);
    assert!(report.was_skipped("Veneto", N_INTENSIVE_CARE));
    assert!(report.was_skipped("Molise", N_INTENSIVE_CARE));
    assert!(report.was_skipped("Molise", TOT_N_HOSPITALIZED));
    assert!(!report.was_skipped("Lombardia", N_INTENSIVE_CARE));
    assert!(report
        .skipped
        .iter()
        .all(|s| s.reason == AnchorSkipReason::ZeroAnchor));

    let lombardia = region_rows(&frame, "Lombardia");
    let icu = column(&frame, &anchored_name(N_INTENSIVE_CARE), &lombardia);
    assert_eq!(icu[0], Some(0.5));
    assert_eq!(icu[1], Some(1.0));
    assert_eq!(icu[6], Some(3.0));

    let veneto = region_rows(&frame, "Veneto");
    assert!(column(&frame, &anchored_name(N_INTENSIVE_CARE), &veneto)
        .iter()
        .all(Option::is_none));
}

#[test]
fn test_population_kpis() {
    let mut frame = regions();
    let population = parse_population(dataset_fixtures::population_csv()).unwrap();
    with_population(&mut frame, &population).unwrap();

    let lombardia = region_rows(&frame, "Lombardia");
    // 4700 tests over 10060574 residents
    assert_eq!(column(&frame, TEST_PTHAB, &lombardia)[6], Some(0.47));
    // 20 deaths over 410 cases
    assert_eq!(column(&frame, MORTALITY, &lombardia)[6], Some(0.05));
    assert_eq!(column(&frame, TEST_PDISCH, &lombardia)[0], None);

    let molise = region_rows(&frame, "Molise");
    assert_eq!(column(&frame, MORTALITY, &molise)[0], None);
}

#[test]
fn test_icu_saturation_and_managed_cases() {
    let mut frame = regions();
    let beds = parse_icu_beds(dataset_fixtures::icu_beds_csv()).unwrap();
    with_icu_beds(&mut frame, &beds).unwrap();
    with_tests_per_managed_case(&mut frame).unwrap();

    let lombardia = region_rows(&frame, "Lombardia");
    // 60 of 861 beds
    assert_approx_eq(column(&frame, ICU_SATURATION, &lombardia)[6].unwrap(), 0.0697, 1e-12);
    // 900 tests over 80 new positives and 10 discharged
    assert_eq!(column(&frame, TESTS_PER_MANAGED_CASE, &lombardia)[6], Some(10.0));
}

#[test]
fn test_national_series() {
    // 120 national cases on the first day, 170 on the second
    let (italy, start) = prep_italy(&regions(), 150.0, 2).unwrap();

    assert_eq!(italy.len(), 7);
    assert_eq!(italy.values(TOT_N_CASES).unwrap()[0], Some(120.0));
    assert_eq!(start, Some(mock_date(2020, 2, 25)));
    assert_eq!(italy.values(EPIDEMIC_AGE).unwrap()[0], Some(-1.0));
    assert_eq!(
        italy.values(NEW_DISCHARGED).unwrap(),
        defined(&[0.0, 0.0, 10.0, 10.0, 10.0, 20.0, 15.0]).as_slice()
    );
    assert_eq!(
        italy.values(SECOND_DISCH_TOTEST).unwrap(),
        defined(&[0.0, 0.0, 0.0, 0.0, 10.0, 10.0, 10.0]).as_slice()
    );
}

#[test]
fn test_province_ages() {
    let (frame, starts) =
        prep_provinces(&parse_provinces(dataset_fixtures::provinces_csv()).unwrap(), 100.0)
            .unwrap();

    assert_eq!(frame.len(), 12);
    assert_eq!(starts["Bergamo"], Some(mock_date(2020, 2, 25)));
    assert_eq!(starts["Milano"], Some(mock_date(2020, 2, 26)));
    assert_eq!(starts["Padova"], None);

    let milano = frame
        .groups(PROVINCE)
        .unwrap()
        .into_iter()
        .find(|g| g.key == "Milano")
        .unwrap();
    assert_eq!(
        frame.gather(EPIDEMIC_AGE, &milano.rows).unwrap(),
        defined(&[-2.0, -1.0, 0.0, 1.0])
    );
}

#[tokio::test]
async fn test_loader_reads_local_files() {
    let dir = create_temp_dir();
    write_file(
        dir.path(),
        &DatasetKey::DpcRegions.file_name(),
        dataset_fixtures::regions_csv(),
    );
    write_file(
        dir.path(),
        &DatasetKey::IstatPopulationRegions.file_name(),
        dataset_fixtures::population_csv(),
    );

    let loader = DataLoader::new(Box::new(LocalSource::new(dir.path())));
    assert_eq!(loader.regions().await.unwrap().len(), 22);
    assert_eq!(loader.population().await.unwrap().len(), 3);
    assert!(loader.provinces().await.is_err());
}
