//! The `uxstudy validate` command.

use std::path::PathBuf;

use anyhow::Result;

use uxstudy_core::config::validate_config;

pub fn execute(config_path: Option<PathBuf>, data_dir: Option<PathBuf>) -> Result<()> {
    let config = super::load_settings(config_path, data_dir)?;

    println!(
        "Study config: {} tasks, data in {}",
        config.tasks.len(),
        config.data_dir.display()
    );

    let warnings = validate_config(&config);
    for w in &warnings {
        let prefix = w
            .task
            .as_ref()
            .map(|name| format!("  [{name}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Config valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
