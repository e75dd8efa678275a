//! Command line interface.

use clap::{Args, Parser, Subcommand};
use covid_common::{log_level_directive, LoggingConfig, Result};
use covid_config::{ConfigLoader, ConfigValidator, SiteConfig, SourceKind};
use std::path::PathBuf;

/// Italian COVID-19 report pages and figures
#[derive(Parser, Debug)]
#[command(name = "covid-report", author, version, about, long_about = None)]
pub struct Cli {
    /// Site configuration file (default: $COVID_REPORT_CONFIG, report.yaml, report.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level: DEBUG, INFO, WARNING, ERROR or FATAL
    #[arg(short, long, global = true)]
    pub log: Option<String>,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render one page config to an HTML file
    Render(RenderArgs),
    /// Build the figures and write them as HTML
    Figures(FiguresArgs),
    /// Serve the rendered pages and the figures
    Serve(ServeArgs),
    /// Print the page routes and their configs
    Routes,
}

/// Arguments of `render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Page config (.yml, .yaml or .json)
    pub configfile: PathBuf,
    /// Output file
    pub output: PathBuf,
    /// Template directory, instead of paths.templates_dir
    #[arg(long)]
    pub template_dir: Option<PathBuf>,
    /// Description directory, instead of paths.desc_dir
    #[arg(long)]
    pub desc_dir: Option<PathBuf>,
}

/// Arguments of `figures`.
#[derive(Args, Debug)]
pub struct FiguresArgs {
    /// Output directory, instead of figures.output_dir
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
    /// Read the datasets from this directory instead of downloading them
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// Build only the named figure; repeatable
    #[arg(long = "only", value_name = "NAME")]
    pub only: Vec<String>,
    /// List the figures and exit
    #[arg(long)]
    pub list: bool,
}

/// Arguments of `serve`.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Listen address, instead of server.bind
    #[arg(long)]
    pub bind: Option<String>,
}

impl Cli {
    /// Site configuration with the command line overrides applied and
    /// validated.
    pub fn site_config(&self) -> Result<SiteConfig> {
        let mut config = ConfigLoader::load_from(self.config.as_deref())?;
        match &self.command {
            Command::Render(args) => {
                if let Some(dir) = &args.template_dir {
                    config.paths.templates_dir.clone_from(dir);
                }
                if let Some(dir) = &args.desc_dir {
                    config.paths.desc_dir = Some(dir.clone());
                }
            }
            Command::Figures(args) => {
                if let Some(dir) = &args.out_dir {
                    config.figures.output_dir = Some(dir.clone());
                }
                if let Some(dir) = &args.data_dir {
                    config.data.source = SourceKind::Local;
                    config.data.dir.clone_from(dir);
                }
            }
            Command::Serve(args) => {
                if let Some(bind) = &args.bind {
                    config.server.bind.clone_from(bind);
                }
            }
            Command::Routes => {}
        }
        ConfigValidator::validate(&config)?;
        Ok(config)
    }

    /// Logging setup: `--log` wins over the configured level.
    pub fn logging_config(&self, config: &SiteConfig) -> LoggingConfig {
        let mut logging = config.logging_config();
        if let Some(level) = &self.log {
            logging.level = log_level_directive(level).to_string();
        }
        logging
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render() {
        let cli = Cli::try_parse_from([
            "covid-report",
            "render",
            "pages/home.yml",
            "site/index.html",
            "--template-dir",
            "tpl",
            "--log",
            "warning",
        ])
        .unwrap();

        assert_eq!(cli.log.as_deref(), Some("warning"));
        match cli.command {
            Command::Render(args) => {
                assert_eq!(args.configfile, PathBuf::from("pages/home.yml"));
                assert_eq!(args.output, PathBuf::from("site/index.html"));
                assert_eq!(args.template_dir, Some(PathBuf::from("tpl")));
                assert!(args.desc_dir.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_figures() {
        let cli = Cli::try_parse_from([
            "covid-report",
            "figures",
            "--only",
            "fig_b001",
            "--only",
            "fig_c001",
        ])
        .unwrap();
        match cli.command {
            Command::Figures(args) => assert_eq!(args.only, vec!["fig_b001", "fig_c001"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_render_needs_two_paths() {
        assert!(Cli::try_parse_from(["covid-report", "render", "a.yml"]).is_err());
    }

    #[test]
    fn test_log_flag_overrides_level() {
        let cli = Cli::try_parse_from(["covid-report", "--log", "FATAL", "routes"]).unwrap();
        let logging = cli.logging_config(&SiteConfig::default());
        assert_eq!(logging.level, "error");

        let cli = Cli::try_parse_from(["covid-report", "routes"]).unwrap();
        assert_eq!(cli.logging_config(&SiteConfig::default()).level, "info");
    }
}
