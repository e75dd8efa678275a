//! Integration tests for covid-figures crate.
//!
//! These tests build the figures from the dataset fixtures, through the
//! manager and directly from a prepared context.

use covid_common::test_utils::{create_temp_dir, dataset_fixtures, init_test_logging, write_file};
use covid_common::Language;
use covid_config::{FiguresConfig, SiteConfig};
use covid_data::{
    parse_icu_beds, parse_population, parse_provinces, parse_regions, DataLoader, DatasetKey,
    LocalSource,
};
use covid_figures::anchored::AnchoredRatio;
use covid_figures::composition::ActiveComposition;
use covid_figures::testing::{TestsVsHospitals, HOSPITAL_LOAD};
use covid_figures::{catalogue, Figure, FigureContext, FigureManager, FigureSettings, RawDatasets};
use covid_i18n::Labels;
use serde_json::Value;
use std::path::Path;

fn write_datasets(dir: &Path, keys: &[DatasetKey]) {
    for key in keys {
        let contents = match key {
            DatasetKey::DpcRegions => dataset_fixtures::regions_csv(),
            DatasetKey::DpcProvinces => dataset_fixtures::provinces_csv(),
            DatasetKey::IstatPopulationRegions => dataset_fixtures::population_csv(),
            DatasetKey::SalutegovIcuBeds => dataset_fixtures::icu_beds_csv(),
        };
        write_file(dir, &key.file_name(), contents);
    }
}

fn manager(data_dir: &Path, output_dir: &Path) -> FigureManager {
    let mut config = SiteConfig::default();
    config.figures.output_dir = Some(output_dir.to_path_buf());
    config.figures.language = Language::En;
    let loader = DataLoader::new(Box::new(LocalSource::new(data_dir)));
    FigureManager::with_loader(&config, loader)
}

fn context() -> FigureContext {
    let raw = RawDatasets {
        regions: Some(parse_regions(dataset_fixtures::regions_csv()).unwrap()),
        provinces: Some(parse_provinces(dataset_fixtures::provinces_csv()).unwrap()),
        population: Some(parse_population(dataset_fixtures::population_csv()).unwrap()),
        icu_beds: Some(parse_icu_beds(dataset_fixtures::icu_beds_csv()).unwrap()),
    };
    FigureContext::prepare(
        raw,
        FigureSettings::from(&FiguresConfig::default()),
        Labels::new(Language::En).unwrap(),
    )
    .unwrap()
}

fn as_json(figure: &dyn Figure, ctx: &FigureContext) -> Value {
    serde_json::from_str(&figure.build(ctx).unwrap().to_json()).unwrap()
}

#[tokio::test]
async fn test_generate_every_figure() {
    init_test_logging();
    let data = create_temp_dir();
    let site = create_temp_dir();
    write_datasets(data.path(), &DatasetKey::ALL);

    let report = manager(data.path(), site.path()).generate(&[]).await.unwrap();

    assert!(report.is_complete(), "failed: {:?}", report.failed);
    assert_eq!(report.written.len(), catalogue().len());
    for figure in catalogue() {
        let path = site.path().join(figure.output_path());
        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("<html"), "{}", path.display());
    }
}

#[tokio::test]
async fn test_only_required_datasets_are_loaded() {
    let data = create_temp_dir();
    let site = create_temp_dir();
    write_datasets(data.path(), &[DatasetKey::DpcProvinces]);

    let only = vec!["fig_010000".to_string(), "fig_010001".to_string()];
    let report = manager(data.path(), site.path())
        .generate(&only)
        .await
        .unwrap()
        .into_result()
        .unwrap();

    assert_eq!(report.written.len(), 2);
    assert!(site.path().join("fig_010001.html").exists());
}

#[tokio::test]
async fn test_missing_dataset_fails_only_its_figures() {
    let data = create_temp_dir();
    let site = create_temp_dir();
    write_datasets(data.path(), &[DatasetKey::DpcProvinces]);

    let report = manager(data.path(), site.path())
        .generate(&["fig_010000".to_string(), "fig_b001".to_string()])
        .await
        .unwrap();
    assert_eq!(report.written.len(), 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "fig_b001");
    assert!(report.into_result().is_err());
}

#[test]
fn test_select_rejects_unknown_figures() {
    let dir = create_temp_dir();
    let manager = manager(dir.path(), dir.path());

    assert_eq!(manager.select(&[]).unwrap().len(), catalogue().len());
    let picked = manager.select(&["fig_c004".to_string()]).unwrap();
    assert_eq!(picked.len(), 1);
    assert_eq!(picked[0].name(), "fig_c004");
    assert!(manager.select(&["fig_x".to_string()]).is_err());
}

#[test]
fn test_anchored_figure_traces() {
    let ctx = context();
    let json = as_json(&AnchoredRatio::hospitalized(), &ctx);

    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|trace| trace["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Lombardia", "Veneto"]);

    // Lombardia has 70 hospitalized on the 2020-02-25 anchor
    let lombardia = &json["data"][0];
    assert_eq!(lombardia["x"][1], "2020-02-25");
    assert_eq!(lombardia["y"][1], 1.0);

    let title = json["layout"]["title"]["text"].as_str().unwrap();
    assert!(title.contains("Hospitalized COVID-19 patients"));
    assert!(title.contains("Lombardia and Veneto"));
}

#[test]
fn test_composition_shares_stay_below_one() {
    let ctx = context();
    let json = as_json(&ActiveComposition::shares(), &ctx);
    let traces = json["data"].as_array().unwrap();

    // Three stacked components for each of the two focus regions
    assert_eq!(traces.len(), 6);
    assert_eq!(traces[3]["xaxis"], "x2");
    for trace in traces {
        for share in trace["y"].as_array().unwrap().iter().filter_map(Value::as_f64) {
            assert!((0.0..=1.0).contains(&share), "{share}");
        }
    }
    assert_eq!(json["layout"]["yaxis"]["tickformat"], ".1%");
}

#[test]
fn test_tests_vs_hospitals_facets() {
    let ctx = context();
    let json = as_json(&TestsVsHospitals, &ctx);
    let traces = json["data"].as_array().unwrap();

    // Four stacked areas and one tests bar for each of the two focus regions
    let per_facet = HOSPITAL_LOAD.len() + 1;
    assert_eq!(traces.len(), 2 * per_facet);
    for (facet, axis) in [(0, "x"), (1, "x2")] {
        let facet_traces = &traces[facet * per_facet..(facet + 1) * per_facet];
        for area in &facet_traces[..HOSPITAL_LOAD.len()] {
            assert_eq!(area["stackgroup"], format!("facet{facet}"));
            assert_eq!(area["xaxis"], axis);
        }
        let bar = &facet_traces[HOSPITAL_LOAD.len()];
        assert_eq!(bar["type"], "bar");
        assert_eq!(bar["xaxis"], axis);
        assert_eq!(bar["showlegend"], facet == 0);
    }
    assert_eq!(traces[0]["name"], "Hospitalized (excluding ICU)");
    assert_eq!(json["layout"]["yaxis"]["tickformat"], "d");
}

#[test]
fn test_saturation_snapshot_is_sorted() {
    let ctx = context();
    let figure = covid_figures::find("fig_010004").unwrap();
    let json = as_json(figure.as_ref(), &ctx);

    // 2020-03-01: Lombardia 60/861, Veneto 10/494, Molise 0/30
    assert_eq!(
        json["data"][0]["x"],
        serde_json::json!(["Lombardia", "Veneto", "Molise"])
    );
    assert!(json["layout"]["title"]["text"]
        .as_str()
        .unwrap()
        .contains("2020-03-01"));
}
