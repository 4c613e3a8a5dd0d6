//! Browse-image grid planner.
//!
//! Reads an output grid request and the source raster's metadata, resolves
//! the output grid and prints the tile plan as JSON.

use anyhow::{Context, Result};
use browse_planner::{build_plan, load_input_metadata, load_request, load_tiling_config};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "browse-planner")]
#[command(about = "Resolve browse-image output grids and tiles")]
struct Args {
    /// Output grid request (JSON)
    #[arg(short, long)]
    request: PathBuf,

    /// Source raster metadata (JSON)
    #[arg(short, long)]
    input: PathBuf,

    /// Tiling configuration file (YAML)
    #[arg(short, long, env = "BROWSE_TILING_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter when RUST_LOG is unset (e.g. `debug`, `browse_sizing=trace`)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Pretty-print the plan
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    // Logs go to stderr so stdout carries only the plan.
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if args.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }

    let config = load_tiling_config(args.config.as_deref())?;
    info!(?config, "Loaded tiling configuration");

    let request = load_request(&args.request)?;
    let input = load_input_metadata(&args.input)?;

    let plan = build_plan(&request, &input, &config).context("Failed to plan output grid")?;

    let output = if args.pretty {
        serde_json::to_string_pretty(&plan)?
    } else {
        serde_json::to_string(&plan)?
    };
    println!("{}", output);

    Ok(())
}
