//! Subcommand implementations.

pub mod init;
pub mod report;
pub mod session;
pub mod tasks;
pub mod validate;

use std::path::PathBuf;

use anyhow::Result;

use uxstudy_core::config::{load_config_from, StudyConfig};

/// Load the config and apply the `--data-dir` override.
pub fn load_settings(
    config_path: Option<PathBuf>,
    data_dir: Option<PathBuf>,
) -> Result<StudyConfig> {
    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(dir) = data_dir {
        config.data_dir = dir;
    }
    tracing::debug!(data_dir = %config.data_dir.display(), "resolved settings");
    Ok(config)
}
