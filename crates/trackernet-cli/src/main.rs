//! Trackernet CLI - London Underground simulation.
//!
//! Single binary that provides:
//! - `trackernet run` - drive the simulation against the live feed
//! - `trackernet network` - print the loaded line networks and exit

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use abm_core::Vec3;
use trackernet_core::{
    feed::parse_csv, runtime, HttpCsvSource, NetworkTopology, TrackernetConfig, TrackernetModel,
};

#[derive(Parser)]
#[command(name = "trackernet")]
#[command(about = "London Underground simulation", version)]
struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation
    Run {
        /// Stop after this many steps instead of running forever
        #[arg(long)]
        steps: Option<u64>,
    },

    /// Print the loaded line networks
    Network,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    fmt().with_env_filter(filter).with_target(false).init();

    let config = TrackernetConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Run { steps } => run_simulation(config, steps).await,
        Commands::Network => print_network(config),
    }
}

/// Equirectangular projection into metres, good enough at London's extent.
fn project(lon: f64, lat: f64) -> Vec3 {
    const METRES_PER_DEGREE: f64 = 111_320.0;
    const LONDON_LAT: f64 = 51.5074;
    Vec3::new(
        lon * METRES_PER_DEGREE * LONDON_LAT.to_radians().cos(),
        lat * METRES_PER_DEGREE,
        0.0,
    )
}

fn build_model(config: TrackernetConfig) -> Result<TrackernetModel> {
    let stations_text = std::fs::read_to_string(&config.stations_file)
        .with_context(|| format!("reading stations {}", config.stations_file.display()))?;
    let network_text = std::fs::read_to_string(&config.network_file)
        .with_context(|| format!("reading network {}", config.network_file.display()))?;
    let topology: NetworkTopology = serde_json::from_str(&network_text)
        .with_context(|| format!("parsing network {}", config.network_file.display()))?;

    let mut model = TrackernetModel::new(config);
    model.setup(&parse_csv(&stations_text), &topology, project);
    Ok(model)
}

async fn run_simulation(config: TrackernetConfig, steps: Option<u64>) -> Result<()> {
    tracing::info!(feed = %config.feed_url, "starting simulation");
    let source = Arc::new(HttpCsvSource::new(config.feed_url.clone()));
    let model = build_model(config)?;
    runtime::run(model, source, steps).await
}

fn print_network(config: TrackernetConfig) -> Result<()> {
    let model = build_model(config)?;
    for (name, graph) in model.core().networks() {
        println!(
            "{name}: {} stations, {} links",
            graph.vertex_count(),
            graph.edge_count()
        );
        for edge in graph.edges() {
            let from = agent_name(&model, edge.attrs.get("from_agent"));
            let to = agent_name(&model, edge.attrs.get("to_agent"));
            let direction = edge
                .attrs
                .get("direction")
                .and_then(|v| v.as_i64())
                .unwrap_or(-1);
            let runlink = edge
                .attrs
                .get("runlink")
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0);
            println!("  dir {direction}  {from} -> {to}  {runlink}s");
        }
    }
    Ok(())
}

fn agent_name(model: &TrackernetModel, attr: Option<&abm_graph::AttrValue>) -> String {
    attr.and_then(|v| v.as_id())
        .and_then(|id| model.core().agent(abm_core::AgentId(id)))
        .map(|a| a.name.clone())
        .unwrap_or_else(|| "?".to_string())
}
