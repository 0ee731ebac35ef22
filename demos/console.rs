use std::{path::PathBuf, time::Instant};

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use voronoi_sweep::{calculate, Options};

/// Computes the Voronoi diagram of the sites in INPUT and writes it to OUTPUT.
#[derive(Parser)]
struct Cli {
    /// Whitespace-separated coordinates, read in `x y` pairs.
    input: PathBuf,

    output: PathBuf,

    /// Glue the half-edges into full edges before writing.
    #[arg(long)]
    optimize: bool,

    /// Check every vertex against its three sites.
    #[arg(long)]
    check_vertices: bool,
}

pub fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Cli::parse();
    let sites = voronoi_sweep_util::read_sites_from_path(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;

    let options = Options::default()
        .with_optimize(args.optimize)
        .with_check_vertices(args.check_vertices);
    let start = Instant::now();
    let diagram = calculate(&sites, &options)?;
    let elapsed = start.elapsed();

    voronoi_sweep_util::write_diagram_to_path(&args.output, &diagram)
        .with_context(|| format!("writing {}", args.output.display()))?;

    println!(
        "{} sites, {} edges, {} vertices in {elapsed:?}",
        sites.len(),
        diagram.edges().len(),
        diagram.vertices().len()
    );
    Ok(())
}
