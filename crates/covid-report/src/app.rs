//! Subcommand implementations.

use crate::cli::{Cli, Command, FiguresArgs, RenderArgs};
use anyhow::{Context, Result};
use covid_config::SiteConfig;
use covid_figures::{catalogue, FigureManager};
use covid_render::{save_render, TemplateRenderer};
use covid_web::RouteTable;
use std::path::PathBuf;
use tracing::info;

/// Run the parsed command against the loaded configuration.
pub async fn run(cli: &Cli, config: &SiteConfig) -> Result<()> {
    match &cli.command {
        Command::Render(args) => {
            render_page(config, args)?;
        }
        Command::Figures(args) => generate_figures(config, args).await?,
        Command::Serve(_) => covid_web::serve(config).await?,
        Command::Routes => print_routes(config)?,
    }
    Ok(())
}

/// Render one page config. Nothing is written unless rendering succeeds.
pub fn render_page(config: &SiteConfig, args: &RenderArgs) -> Result<PathBuf> {
    let renderer = TemplateRenderer::from_config(config);
    let rendered = renderer
        .render_from_config_file(&args.configfile)
        .with_context(|| format!("cannot render {}", args.configfile.display()))?;
    save_render(&rendered, &args.output)?;
    Ok(args.output.clone())
}

async fn generate_figures(config: &SiteConfig, args: &FiguresArgs) -> Result<()> {
    if args.list {
        for figure in catalogue() {
            println!("{:<16}{:<32}{}", figure.name(), figure.output_path(), figure.description());
        }
        return Ok(());
    }

    let manager = FigureManager::new(config)?;
    let report = manager.generate(&args.only).await?.into_result()?;
    info!(
        written = report.written.len(),
        dir = %manager.output_dir().display(),
        "Figures written"
    );
    Ok(())
}

fn print_routes(config: &SiteConfig) -> Result<()> {
    let table = RouteTable::from_config(config)?;
    for (route, path) in table.iter() {
        println!("{route}\t{}", path.display());
    }
    Ok(())
}
