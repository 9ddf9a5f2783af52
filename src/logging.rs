use crate::config::config::{Config, DEFAULT_LOG_LEVEL};
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "passkeep.log";

pub enum LogTarget {
    Stderr,
    /// Append to a file; used while the terminal UI owns the screen.
    File(PathBuf),
}

fn filter_for(config: &Config) -> EnvFilter {
    EnvFilter::try_new(config.log_directive()).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(config: &Config, target: LogTarget) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter_for(config))
        .with_target(false);
    match target {
        LogTarget::Stderr => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
        LogTarget::File(path) => {
            crate::filesystem::secure::ensure_parent_secure(&path)?;
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let _ = builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
    }
    Ok(())
}
