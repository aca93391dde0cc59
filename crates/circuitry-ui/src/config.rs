//! Editor configuration
//!
//! Persisted as JSON under the user's config directory.

use anyhow::Context;
use circuitry_core::{GeometryConfig, LogConfig, WireStyle};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// User facing editor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Screen width of editor hosts and SVG exports
    pub canvas_width: f32,
    /// Screen height of editor hosts and SVG exports
    pub canvas_height: f32,
    /// Port anchor geometry
    pub geometry: GeometryConfig,
    /// Wire appearance
    pub wire_style: WireStyle,
    /// Draw the background grid
    pub show_grid: bool,
    /// Grid spacing in canvas units
    pub grid_spacing: f32,
    /// Logging setup used by hosts
    pub log: LogConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 600.0,
            canvas_height: 600.0,
            geometry: GeometryConfig::default(),
            wire_style: WireStyle::default(),
            show_grid: true,
            grid_spacing: 20.0,
            log: LogConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("Circuitry");
            p.push("editor.json");
            p
        })
    }

    /// Load configuration from disk, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Using default editor config: {:#}", e);
                Self::default()
            }
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(path) = Self::config_path() {
            self.save_to(&path)?;
        }
        Ok(())
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
    }
}
