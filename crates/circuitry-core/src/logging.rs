//! Logging configuration and setup
//!
//! Console output goes to stderr, file output to a timestamped file in the
//! log directory through a non-blocking writer. `RUST_LOG` overrides the
//! configured level.

use crate::{CircuitError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

const LOG_FILE_PREFIX: &str = "circuitry";

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Level name: trace, debug, info, warn, error
    pub level: String,
    /// Write to stderr
    pub console_output: bool,
    /// Write to a file in `log_directory`
    pub file_output: bool,
    /// Directory for log files
    pub log_directory: PathBuf,
    /// Number of log files kept on startup
    pub max_log_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console_output: true,
            file_output: false,
            log_directory: default_log_directory(),
            max_log_files: 10,
        }
    }
}

fn default_log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("Circuitry")
        .join("logs")
}

impl LogConfig {
    /// Configured level, `INFO` if the name is not recognized
    pub fn parse_level(&self) -> LevelFilter {
        self.level.parse().unwrap_or(LevelFilter::INFO)
    }

    /// Create the log directory if needed
    pub fn ensure_log_directory(&self) -> Result<()> {
        fs::create_dir_all(&self.log_directory)?;
        Ok(())
    }

    /// Path of the log file for this session
    pub fn current_log_path(&self) -> PathBuf {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        self.log_directory
            .join(format!("{LOG_FILE_PREFIX}_{stamp}.log"))
    }

    /// Delete the oldest log files so that at most `max_log_files - 1` remain,
    /// leaving room for the file of this session. Returns how many were removed.
    pub fn cleanup_old_logs(&self) -> Result<usize> {
        if !self.log_directory.exists() {
            return Ok(0);
        }
        let mut logs: Vec<PathBuf> = fs::read_dir(&self.log_directory)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension().is_some_and(|ext| ext == "log")
                    && path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.starts_with(LOG_FILE_PREFIX))
            })
            .collect();
        let keep = self.max_log_files.saturating_sub(1);
        if logs.len() <= keep {
            return Ok(0);
        }
        // Timestamped names sort chronologically.
        logs.sort();
        let excess = logs.len() - keep;
        for path in &logs[..excess] {
            fs::remove_file(path)?;
        }
        Ok(excess)
    }
}

/// Keeps the file writer thread alive; drop it on shutdown to flush
#[derive(Debug)]
pub struct LogGuard {
    _guard: WorkerGuard,
}

/// Install the global tracing subscriber
pub fn init(config: &LogConfig) -> Result<Option<LogGuard>> {
    let filter = || {
        EnvFilter::builder()
            .with_default_directive(config.parse_level().into())
            .from_env_lossy()
    };

    let console_layer = config.console_output.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false)
            .with_filter(filter())
    });

    let (file_layer, guard) = if config.file_output {
        config.ensure_log_directory()?;
        if let Err(e) = config.cleanup_old_logs() {
            eprintln!("Warning: Failed to cleanup old log files: {}", e);
        }
        let file = fs::File::create(config.current_log_path())?;
        let (writer, worker_guard) = tracing_appender::non_blocking(file);
        let layer = fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_filter(filter());
        (Some(layer), Some(LogGuard { _guard: worker_guard }))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| CircuitError::Logging(e.to_string()))?;

    tracing::info!("Logging initialized at level: {}", config.level);
    Ok(guard)
}
