//! Circuitry - headless circuit renderer
//!
//! Lays a circuit snapshot out with the editor and writes it as SVG.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use tracing::info;

fn main() -> Result<()> {
    let args = cli::Args::parse();
    let config = args.load_config()?;

    // Console output goes to stderr, so SVG on stdout stays clean.
    let _log_guard = circuitry_core::logging::init(&config.log)?;

    info!("==========================================");
    info!("===     Circuitry Session Started      ===");
    info!("==========================================");

    cli::render(&args, config)
}
