use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use daxgen::config::Config;
use daxgen::error::DaxError;
use daxgen::pipeline;
use daxgen::wrap::TemplateConfigGenerator;

/// Convert a persisted workflow graph into a planner job document.
#[derive(Parser)]
#[command(name = "daxgen")]
#[command(version, about, long_about = None)]
struct Cli {
    /// File with the persisted workflow (json, gexf, gml, graphml)
    file: PathBuf,

    /// Name of the output file (DAX XML, or JSON when it ends in .json)
    #[arg(short, long, default_value = "graph.dax")]
    output: PathBuf,

    /// Call tasks using a wrapper
    #[arg(short, long)]
    wrap: bool,

    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Wrapper executable used with --wrap
    #[arg(long, env = "DAXGEN_WRAPPER")]
    wrapper: Option<String>,

    /// Site given to file locations that do not name one
    #[arg(long, env = "DAXGEN_DEFAULT_SITE")]
    default_site: Option<String>,

    /// Directory receiving generated wrapper configurations
    #[arg(long, default_value = ".")]
    config_dir: PathBuf,

    /// Document name, when the graph has none
    #[arg(long)]
    name: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("daxgen=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<DaxError>() {
                Some(dax) => eprintln!("error: {}", dax.report()),
                None => eprintln!("error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(wrapper) = cli.wrapper {
        config.wrapper = wrapper;
    }
    if let Some(site) = cli.default_site {
        config.default_site = site;
    }
    if let Some(name) = cli.name {
        config.document_name = name;
    }

    let mut generator = if cli.wrap {
        Some(TemplateConfigGenerator::new(&cli.config_dir)?)
    } else {
        None
    };

    let doc = pipeline::convert_file(
        &cli.file,
        &cli.output,
        &config,
        generator.as_mut().map(|g| g as &mut dyn daxgen::wrap::ConfigGenerator),
    )?;

    tracing::info!(
        files = doc.files.len(),
        jobs = doc.jobs.len(),
        dependencies = doc.dependencies.len(),
        output = %cli.output.display(),
        "conversion finished"
    );
    Ok(())
}
