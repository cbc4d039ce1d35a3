//! Home-based storage paths for interview-coach.
//!
//! Everything the client persists lives under `~/.interview-coach/`:
//! - `logs/events.jsonl` - structured event log
//! - `config.yaml` - optional user configuration

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// The name of the interview-coach directory.
const COACH_DIR: &str = ".interview-coach";

/// Returns the home-based directory: `~/.interview-coach/`
///
/// Creates the directory if it doesn't exist.
///
/// # Errors
///
/// Returns an error if:
/// - Home directory cannot be determined
/// - Directory creation fails
pub fn coach_home_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let dir = home.join(COACH_DIR);
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    Ok(dir)
}

/// Returns the logs directory: `~/.interview-coach/logs/`
pub fn logs_dir() -> Result<PathBuf> {
    let dir = coach_home_dir()?.join("logs");
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create logs directory: {}", dir.display()))?;
    Ok(dir)
}

/// Returns the user config path: `~/.interview-coach/config.yaml`
///
/// The file itself is not created.
pub fn user_config_path() -> Result<PathBuf> {
    Ok(coach_home_dir()?.join("config.yaml"))
}

#[cfg(test)]
#[path = "tests/coach_paths_tests.rs"]
mod tests;
