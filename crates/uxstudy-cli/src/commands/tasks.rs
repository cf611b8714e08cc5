//! The `uxstudy tasks` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = super::load_settings(config_path, None)?;

    if config.tasks.is_empty() {
        println!("No tasks configured. Add [[tasks]] entries to uxstudy.toml.");
        return Ok(());
    }

    for (i, task) in config.tasks.iter().enumerate() {
        println!("{}. {}", i + 1, task.name);
        if !task.description.is_empty() {
            println!("   {}", task.description);
        }
    }

    Ok(())
}
