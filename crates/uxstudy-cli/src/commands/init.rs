//! The `uxstudy init` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub fn execute(config_path: Option<PathBuf>, data_dir: Option<PathBuf>) -> Result<()> {
    if Path::new("uxstudy.toml").exists() {
        println!("uxstudy.toml already exists, skipping.");
    } else {
        std::fs::write("uxstudy.toml", SAMPLE_CONFIG)?;
        println!("Created uxstudy.toml");
    }

    let data_dir = super::load_settings(config_path, data_dir)?.data_dir;
    if data_dir.is_dir() {
        println!("{}/ already exists, skipping.", data_dir.display());
    } else {
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create {}", data_dir.display()))?;
        println!("Created {}/", data_dir.display());
    }

    println!("\nNext steps:");
    println!("  1. Edit the tasks in uxstudy.toml to match the app under test");
    println!("  2. Run: uxstudy validate");
    println!("  3. Run: uxstudy session");
    println!("  4. Run: uxstudy report --format html");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# uxstudy configuration

# Directory holding consent_data.csv, demographic_data.csv, task_data.csv
# and exit_data.csv. UXSTUDY_DATA_DIR overrides it.
data_dir = "data"

# Label task notes as observer notes (true) or participant notes (false).
observer_mode = true

[[tasks]]
name = "Task 1: Find an item"
description = "Imagine you want to find the price of 'Product X' on the website. Locate the product page and identify the listed price."

[[tasks]]
name = "Task 2: Create an account"
description = "Register a new user account with a mock email. Do not use personal information."

[[tasks]]
name = "Task 3: Change a setting"
description = "Locate the Settings page and switch the theme to Dark Mode."
"#;
