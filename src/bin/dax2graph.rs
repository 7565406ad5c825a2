use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use daxgen::config::Config;
use daxgen::error::DaxError;
use daxgen::pipeline;

/// Convert a planner job document back into a node-link workflow graph.
#[derive(Parser)]
#[command(name = "dax2graph")]
#[command(version, about, long_about = None)]
struct Cli {
    /// File with the job document (DAX XML, or JSON when it ends in .json)
    filename: PathBuf,

    /// Output filename
    #[arg(short, long, default_value = "plan.json")]
    output: PathBuf,

    /// Site given to file locations that do not name one
    #[arg(long, env = "DAXGEN_DEFAULT_SITE")]
    default_site: Option<String>,
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
    let mut config = Config::default();
    if let Some(site) = cli.default_site {
        config.default_site = site;
    }
    let graph = pipeline::document_to_node_link(&cli.filename, &cli.output, &config)?;
    tracing::info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        output = %cli.output.display(),
        "reconstruction finished"
    );
    Ok(())
}
