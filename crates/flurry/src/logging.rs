//! Log file setup.
//!
//! The terminal belongs to the UI, so events go to a file instead.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use color_eyre::eyre::eyre;
use flurry_config::Config;
use tracing_subscriber::filter::EnvFilter;

/// Install the global subscriber. Filtering follows `RUST_LOG` and defaults
/// to `info`. Returns the log file path, if logging is enabled.
pub fn init(config: &Config) -> color_eyre::Result<Option<PathBuf>> {
    let Some(path) = config.log_path() else {
        return Ok(None);
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_target(false)
        .with_ansi(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| eyre!("failed to install logger: {e}"))?;
    Ok(Some(path))
}
