//! Study configuration: storage location, display defaults and the task
//! catalog.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable that overrides [`StudyConfig::data_dir`].
pub const DATA_DIR_ENV: &str = "UXSTUDY_DATA_DIR";

/// A task participants can be asked to perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    /// Name recorded in the task dataset.
    pub name: String,
    /// Instructions shown before the trial.
    #[serde(default)]
    pub description: String,
}

impl TaskDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Top-level uxstudy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyConfig {
    /// Directory holding the four dataset files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Label task notes as observer notes rather than participant notes.
    #[serde(default = "default_true")]
    pub observer_mode: bool,
    /// Task catalog offered during a session.
    #[serde(default = "default_tasks")]
    pub tasks: Vec<TaskDefinition>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_true() -> bool {
    true
}

/// The stock task catalog.
pub fn default_tasks() -> Vec<TaskDefinition> {
    vec![
        TaskDefinition::new(
            "Task 1: Find an item",
            "Imagine you want to find the price of 'Product X' on the website. \
             Locate the product page and identify the listed price.",
        ),
        TaskDefinition::new(
            "Task 2: Create an account",
            "Register a new user account with a mock email. Do not use personal information.",
        ),
        TaskDefinition::new(
            "Task 3: Change a setting",
            "Locate the Settings page and switch the theme to Dark Mode.",
        ),
    ]
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            observer_mode: true,
            tasks: default_tasks(),
        }
    }
}

impl StudyConfig {
    /// Look up a task by exact name.
    pub fn task(&self, name: &str) -> Option<&TaskDefinition> {
        self.tasks.iter().find(|t| t.name == name)
    }
}

/// Load config from an explicit path, or search the default locations:
/// `uxstudy.toml` in the current directory, then
/// `~/.config/uxstudy/config.toml`, then built-in defaults.
///
/// `UXSTUDY_DATA_DIR` overrides the data directory.
pub fn load_config_from(path: Option<&Path>) -> Result<StudyConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("uxstudy.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => StudyConfig::default(),
    };

    Ok(apply_data_dir_override(
        config,
        std::env::var(DATA_DIR_ENV).ok(),
    ))
}

/// Parse a TOML string into a config.
pub fn parse_config_str(content: &str) -> Result<StudyConfig> {
    Ok(toml::from_str::<StudyConfig>(content)?)
}

fn apply_data_dir_override(mut config: StudyConfig, value: Option<String>) -> StudyConfig {
    if let Some(dir) = value.filter(|v| !v.trim().is_empty()) {
        config.data_dir = PathBuf::from(dir);
    }
    config
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("uxstudy"))
}

/// A warning from config validation.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The task name (if applicable).
    pub task: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Check a config for common mistakes.
pub fn validate_config(config: &StudyConfig) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if config.tasks.is_empty() {
        warnings.push(ConfigWarning {
            task: None,
            message: "task catalog is empty; sessions will have no tasks to run".into(),
        });
    }

    let mut seen = HashSet::new();
    for task in &config.tasks {
        if task.name.trim().is_empty() {
            warnings.push(ConfigWarning {
                task: None,
                message: "task with an empty name".into(),
            });
            continue;
        }
        if !seen.insert(task.name.as_str()) {
            warnings.push(ConfigWarning {
                task: Some(task.name.clone()),
                message: format!("duplicate task name: {}", task.name),
            });
        }
        if task.description.trim().is_empty() {
            warnings.push(ConfigWarning {
                task: Some(task.name.clone()),
                message: "description is empty".into(),
            });
        }
    }

    warnings
}
