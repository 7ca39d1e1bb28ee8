use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use vcluster_sizer::{
    Config, NameFilter, OutputFormat, SnapshotInventory, compute_cluster_summary, render,
};

/// Command-line arguments for the virtualization cluster sizer.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON configuration file providing defaults for the options below.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Inventory snapshot (JSON) to read hosts and VMs from.
    #[arg(long)]
    inventory: Option<PathBuf>,

    /// Name of the cluster to size.
    #[arg(long)]
    cluster: Option<String>,

    /// Only consider these VMs (repeatable or comma separated).
    #[arg(long, value_delimiter = ',')]
    include: Vec<String>,

    /// Ignore these VMs (repeatable or comma separated). Wins over --include.
    #[arg(long, value_delimiter = ',')]
    exclude: Vec<String>,

    /// Report format.
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Log level used when RUST_LOG is not set (e.g. warn, info, debug).
    #[arg(long)]
    log_level: Option<String>,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(a: Args) -> Result<()> {
    let cfg = match &a.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };

    init_logging(a.log_level.as_deref().unwrap_or(&cfg.log_level));

    let inventory_path = a
        .inventory
        .or(cfg.inventory)
        .ok_or_else(|| anyhow!("--inventory is required"))?;
    let cluster = a
        .cluster
        .or(cfg.cluster)
        .ok_or_else(|| anyhow!("--cluster is required"))?;
    let format = a.format.unwrap_or(cfg.format);
    let filter = NameFilter::new(
        cfg.include.into_iter().chain(a.include),
        cfg.exclude.into_iter().chain(a.exclude),
    );
    debug!(?filter, ?format, "resolved options");

    let inventory = SnapshotInventory::load(&inventory_path)
        .with_context(|| format!("loading inventory {}", inventory_path.display()))?;
    let summary = compute_cluster_summary(&inventory, &cluster, &filter)
        .with_context(|| format!("sizing cluster {cluster}"))?;

    println!("{}", render(&summary, format)?);
    Ok(())
}

fn main() {
    let a = Args::parse();

    if let Err(e) = run(a) {
        eprintln!("Error: {:#}", e);
        std::process::exit(2);
    }
}
