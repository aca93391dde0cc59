//! Command line arguments and the render run

use anyhow::{Context, Result};
use circuitry_core::{CircuitAction, CircuitSnapshot};
use circuitry_ui::{EditorConfig, HeadlessEditor};
use clap::Parser;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Render a circuit snapshot to SVG
#[derive(Parser, Debug)]
#[command(name = "circuitry", version, about = "Render a circuit snapshot to SVG")]
pub struct Args {
    /// Circuit snapshot (JSON) or '-' for stdin
    pub input: PathBuf,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Editor config JSON, instead of the one in the user's config directory
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Canvas width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Canvas height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Leave out the background grid
    #[arg(long = "no-grid")]
    pub no_grid: bool,
}

impl Args {
    /// Editor config with the command line overrides applied
    pub fn load_config(&self) -> Result<EditorConfig> {
        let mut config = match &self.config {
            Some(path) => EditorConfig::load_from(path)?,
            None => EditorConfig::load(),
        };
        if let Some(width) = self.width {
            config.canvas_width = width;
        }
        if let Some(height) = self.height {
            config.canvas_height = height;
        }
        if self.no_grid {
            config.show_grid = false;
        }
        Ok(config)
    }
}

/// Lay the snapshot out and write the SVG
pub fn render(args: &Args, config: EditorConfig) -> Result<()> {
    let json = read_input(&args.input)?;
    let snapshot = CircuitSnapshot::from_json(&json).context("parsing circuit snapshot")?;
    info!(
        "Rendering {} components at {}x{}",
        snapshot.components.len(),
        config.canvas_width,
        config.canvas_height
    );

    let mut headless = HeadlessEditor::new(config);
    let mut sent: Vec<CircuitAction> = Vec::new();
    let frames = headless.settle(&snapshot, &mut sent);
    debug!("Layout settled after {} frames", frames);
    if !sent.is_empty() {
        warn!("Dropping {} actions issued without input", sent.len());
    }

    write_output(&headless.to_svg(&snapshot), args.output.as_deref())
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn write_output(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg).with_context(|| format!("writing {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}
