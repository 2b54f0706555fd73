//! CLI entry point for linematch.

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use linematch::config::Config;
use linematch::index::{LineIndexSet, VertexIndex};
use linematch::matcher::{match_features, match_features_parallel, RunStats};
use linematch::output::write_geojson;
use linematch::parser::{check_crs, read_blue_lines, read_red_features};
use linematch::types::SearchPolicy;

/// Road network conflation tool.
///
/// Matches every feature of an attributed (red) line dataset onto the
/// reference (blue) network and writes the red attributes with the matched
/// blue geometry (green).
#[derive(Parser, Debug)]
#[command(name = "linematch")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Attributed (red) GeoJSON dataset
    #[arg(short = 'r', long = "red")]
    red: PathBuf,

    /// Reference (blue) GeoJSON dataset
    #[arg(short = 'b', long = "blue")]
    blue: PathBuf,

    /// Output (green) GeoJSON dataset
    #[arg(short = 'o', long = "output")]
    output: PathBuf,

    /// Matching tolerance in meters
    #[arg(short = 'e', long = "eps", default_value = "30")]
    eps: f64,

    /// Windowed search policy: first-nonempty or full-radius
    #[arg(long = "policy", default_value = "first-nonempty")]
    policy: String,

    /// Share of a feature's vertices a line needs to be kept (0-1]
    #[arg(long = "vote-share", default_value = "0.1")]
    vote_share: f64,

    /// Absolute tolerance of the geometric comparisons
    #[arg(long = "tolerance", default_value = "1e-8")]
    tolerance: f64,

    /// Identifier attribute of blue features
    #[arg(long = "blue-id-field", default_value = "link_id")]
    blue_id_field: String,

    /// Number of worker threads (0 = auto-detect, 1 = sequential)
    #[arg(long = "threads", short = 'j', default_value = "1")]
    threads: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    // Validate inputs
    if !args.red.exists() {
        bail!("Red dataset not found: {}", args.red.display());
    }
    if !args.blue.exists() {
        bail!("Blue dataset not found: {}", args.blue.display());
    }

    let config = build_config(&args)?;
    if config.eps < config.search_step {
        info!(
            "eps {} m is below the search step of {} m: no vertex will find a candidate",
            config.eps, config.search_step
        );
    }

    let num_threads = if args.threads == 0 {
        num_cpus::get()
    } else {
        args.threads
    };

    run(&args, &config, num_threads)?;

    info!("Done!");
    Ok(())
}

fn build_config(args: &Args) -> Result<Config> {
    let mut config = Config::new();
    config.set_eps(args.eps)?;
    config.set_vote_share(args.vote_share)?;
    config.set_tolerance(args.tolerance)?;
    config.search_policy = args
        .policy
        .parse::<SearchPolicy>()
        .context("Policy can only be one of the following: first-nonempty or full-radius")?;
    config.blue_id_field = args.blue_id_field.clone();
    Ok(config)
}

fn run(args: &Args, config: &Config, num_threads: usize) -> Result<()> {
    info!("Reading blue dataset: {}", args.blue.display());
    let blue = read_blue_lines(&args.blue, config)?;
    info!("Reading red dataset: {}", args.red.display());
    let red = read_red_features(&args.red, config)?;

    check_crs(red.crs.as_deref(), blue.crs.as_deref())?;

    info!("Indexing {} blue lines", blue.lines.len());
    let start = Instant::now();
    let vertices = VertexIndex::build(&blue.lines);
    let lines = LineIndexSet::build(&blue.lines);
    info!(
        "Indexed {} vertices in {:.2} ms",
        vertices.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    info!(
        "Matching {} red features (eps = {} m, policy = {})",
        red.features.len(),
        config.eps,
        config.search_policy
    );
    let start = Instant::now();
    let green = if num_threads == 1 {
        match_features(&red.features, &vertices, &lines, config)
    } else {
        info!("Using parallel mode with {} threads", num_threads);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .context("Failed to create thread pool")?;
        pool.install(|| match_features_parallel(&red.features, &vertices, &lines, config))
    };
    info!(
        "Matched in {:.2} ms",
        start.elapsed().as_secs_f64() * 1000.0
    );

    info!("Writing output to: {}", args.output.display());
    let file = File::create(&args.output).context("Failed to create output file")?;
    let mut writer = BufWriter::new(file);
    write_geojson(&mut writer, &green, blue.crs.as_deref())?;
    writer.flush()?;

    RunStats::from_outputs(&green).log_summary();
    Ok(())
}
