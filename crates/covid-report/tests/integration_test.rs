//! Integration tests for covid-report crate.
//!
//! These tests drive the `render` and `routes` commands through the parsed
//! command line, with a site configuration in a temporary directory.

use clap::Parser;
use covid_common::test_utils::{create_temp_dir, init_test_logging, write_file};
use covid_report::{render_page, run, Cli, Command};
use std::fs;
use std::path::Path;

fn site_file(root: &Path) -> String {
    let yaml = format!(
        "paths:\n  templates_dir: \"{0}/templates\"\n  config_dir: \"{0}/config\"\n  site_dir: \"{0}/site\"\n",
        root.display()
    );
    write_file(root, "report.yaml", &yaml).display().to_string()
}

fn cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("covid-report").chain(args.iter().copied())).unwrap()
}

#[tokio::test]
async fn test_render_command() {
    init_test_logging();
    let dir = create_temp_dir();
    let site = site_file(dir.path());
    write_file(dir.path(), "templates/a.html", "{{x}}{{mark_text}}");
    let page = write_file(dir.path(), "config/a.yml", "template: a.html\nvariables:\n  x: 1\n");
    let output = dir.path().join("site/a.html");

    let cli = cli(&[
        "--config",
        &site,
        "render",
        page.to_str().unwrap(),
        output.to_str().unwrap(),
    ]);
    let config = cli.site_config().unwrap();
    run(&cli, &config).await.unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), "1");
}

#[test]
fn test_render_rejects_text_description_before_writing() {
    let dir = create_temp_dir();
    let site = site_file(dir.path());
    write_file(dir.path(), "templates/a.html", "{{x}}{{mark_text}}");
    write_file(dir.path(), "config/a.txt", "not markdown");
    let page = write_file(
        dir.path(),
        "config/a.yml",
        "template: a.html\ndesc_file: a.txt\nvariables:\n  x: 1\n",
    );
    let output = dir.path().join("out/a.html");

    let cli = cli(&[
        "--config",
        &site,
        "render",
        page.to_str().unwrap(),
        output.to_str().unwrap(),
    ]);
    let config = cli.site_config().unwrap();
    let Command::Render(args) = &cli.command else {
        panic!("expected the render command");
    };

    let err = render_page(&config, args).unwrap_err();
    let report_error = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<covid_common::ReportError>())
        .unwrap();
    assert!(report_error.is_unsupported_format());
    assert!(!output.exists());
}

#[test]
fn test_template_dir_override() {
    let dir = create_temp_dir();
    let site = site_file(dir.path());
    write_file(dir.path(), "other/a.html", "other {{ x }}");
    let page = write_file(dir.path(), "config/a.json", r#"{"template": "a.html", "variables": {"x": 2}}"#);
    let output = dir.path().join("site/a.html");
    let template_dir = dir.path().join("other");

    let cli = cli(&[
        "--config",
        &site,
        "render",
        page.to_str().unwrap(),
        output.to_str().unwrap(),
        "--template-dir",
        template_dir.to_str().unwrap(),
    ]);
    let config = cli.site_config().unwrap();
    assert_eq!(config.paths.templates_dir, template_dir);

    let Command::Render(args) = &cli.command else {
        panic!("expected the render command");
    };
    render_page(&config, args).unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), "other 2");
}

#[tokio::test]
async fn test_routes_command() {
    let dir = create_temp_dir();
    let site = site_file(dir.path());
    write_file(dir.path(), "config/home.yml", "template: a.html\n");

    let cli = cli(&["--config", &site, "routes"]);
    let config = cli.site_config().unwrap();
    run(&cli, &config).await.unwrap();
}
