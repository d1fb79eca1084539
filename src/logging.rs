//! # Logging
//!
//! The TUI owns the terminal, so log output goes to a file instead of stderr:
//!
//! ```text
//! ~/.local/share/hygieai/hygieai.log
//! ```
//!
//! Filtering follows `RUST_LOG` and defaults to `info`. Set
//! `RUST_LOG=hygieai=debug` to see raw backend responses.

use anyhow::{anyhow, Context, Result};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Platform data directory location of the log file.
pub fn default_log_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "hygieai")
        .context("Could not determine data directory")?;
    Ok(dirs.data_dir().join("hygieai.log"))
}

/// Install the global subscriber, appending to `path`.
pub fn init(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_log_file() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let path = temp_dir.path().join("nested").join("hygieai.log");

        init(&path).expect("init logging");
        tracing::info!("log file test");
        assert!(path.exists());
    }
}
