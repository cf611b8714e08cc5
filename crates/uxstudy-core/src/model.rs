//! Core data model types for uxstudy.
//!
//! Four independent datasets hold one record type each. Records are turned
//! into ordered [`Row`]s before they reach a store; rows are what the store
//! persists and what the aggregator reads back.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Format of every record's `timestamp` column (UTC).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a UTC instant the way records store it.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// One of the four append-only datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    Consent,
    Demographic,
    Task,
    Exit,
}

impl Dataset {
    /// All datasets in study order.
    pub const ALL: [Dataset; 4] = [
        Dataset::Consent,
        Dataset::Demographic,
        Dataset::Task,
        Dataset::Exit,
    ];

    /// File name of this dataset inside the storage directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Dataset::Consent => "consent_data.csv",
            Dataset::Demographic => "demographic_data.csv",
            Dataset::Task => "task_data.csv",
            Dataset::Exit => "exit_data.csv",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dataset::Consent => write!(f, "consent"),
            Dataset::Demographic => write!(f, "demographic"),
            Dataset::Task => write!(f, "task"),
            Dataset::Exit => write!(f, "exit"),
        }
    }
}

impl FromStr for Dataset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "consent" => Ok(Dataset::Consent),
            "demographic" | "demographics" => Ok(Dataset::Demographic),
            "task" | "tasks" => Ok(Dataset::Task),
            "exit" => Ok(Dataset::Exit),
            other => Err(format!("unknown dataset: {other}")),
        }
    }
}

/// A single stored row: column names paired with their text values, in
/// header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Row::push`].
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(column, value);
        self
    }

    /// Append a column. Columns keep insertion order.
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.fields.push((column.into(), value.into()));
    }

    /// Value of the named column, if present.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(c, _)| c.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<C: Into<String>, V: Into<String>> FromIterator<(C, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (C, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(c, v)| (c.into(), v.into()))
                .collect(),
        }
    }
}

/// A typed record that belongs to exactly one dataset.
pub trait Record {
    /// The dataset this record is appended to.
    const DATASET: Dataset;

    /// Participant the record belongs to.
    fn participant_id(&self) -> &str;

    /// Flatten into a row, columns in header order.
    fn to_row(&self) -> Row;
}

/// Outcome of a task trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskOutcome {
    Success,
    Partial,
    Fail,
    Abandoned,
}

impl TaskOutcome {
    pub const ALL: [TaskOutcome; 4] = [
        TaskOutcome::Success,
        TaskOutcome::Partial,
        TaskOutcome::Fail,
        TaskOutcome::Abandoned,
    ];

    /// Numeric score used when averaging outcomes.
    pub fn success_score(self) -> f64 {
        match self {
            TaskOutcome::Success => 1.0,
            TaskOutcome::Partial => 0.5,
            TaskOutcome::Fail | TaskOutcome::Abandoned => 0.0,
        }
    }

    /// Score of a stored outcome cell. Unrecognised or missing values score 0.
    pub fn score_of(cell: Option<&str>) -> f64 {
        cell.and_then(|c| c.parse::<TaskOutcome>().ok())
            .map(TaskOutcome::success_score)
            .unwrap_or(0.0)
    }
}

impl fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskOutcome::Success => write!(f, "Success"),
            TaskOutcome::Partial => write!(f, "Partial"),
            TaskOutcome::Fail => write!(f, "Fail"),
            TaskOutcome::Abandoned => write!(f, "Abandoned"),
        }
    }
}

impl FromStr for TaskOutcome {
    type Err = String;

    /// Exact match on the stored label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Success" => Ok(TaskOutcome::Success),
            "Partial" => Ok(TaskOutcome::Partial),
            "Fail" => Ok(TaskOutcome::Fail),
            "Abandoned" => Ok(TaskOutcome::Abandoned),
            other => Err(format!("unknown task outcome: {other}")),
        }
    }
}

/// Gender answer. `SelfDescribe` carries the participant's own wording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    PreferNotToSay,
    Female,
    Male,
    NonBinary,
    SelfDescribe(String),
}

impl Gender {
    /// Option labels as offered to participants.
    pub const OPTIONS: [&'static str; 5] = [
        "Prefer not to say",
        "Female",
        "Male",
        "Non-binary",
        "Self-describe",
    ];

    /// Build from an option label; `free_text` is used only for "Self-describe".
    pub fn from_option(label: &str, free_text: &str) -> Option<Gender> {
        match label {
            "Prefer not to say" => Some(Gender::PreferNotToSay),
            "Female" => Some(Gender::Female),
            "Male" => Some(Gender::Male),
            "Non-binary" => Some(Gender::NonBinary),
            "Self-describe" => Some(Gender::SelfDescribe(free_text.to_string())),
            _ => None,
        }
    }

    /// The value written to the dataset.
    pub fn stored_value(&self) -> &str {
        match self {
            Gender::PreferNotToSay => "Prefer not to say",
            Gender::Female => "Female",
            Gender::Male => "Male",
            Gender::NonBinary => "Non-binary",
            Gender::SelfDescribe(text) => text,
        }
    }
}

/// Highest completed education.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Education {
    PreferNotToSay,
    HighSchool,
    Associate,
    Bachelor,
    Master,
    Doctorate,
    Other,
}

impl Education {
    pub const ALL: [Education; 7] = [
        Education::PreferNotToSay,
        Education::HighSchool,
        Education::Associate,
        Education::Bachelor,
        Education::Master,
        Education::Doctorate,
        Education::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Education::PreferNotToSay => "Prefer not to say",
            Education::HighSchool => "High School",
            Education::Associate => "Associate",
            Education::Bachelor => "Bachelor",
            Education::Master => "Master",
            Education::Doctorate => "Doctorate",
            Education::Other => "Other",
        }
    }
}

impl fmt::Display for Education {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Consent given at the start of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsentRecord {
    pub timestamp: String,
    pub participant_id: String,
    pub consent_given: bool,
    /// Optional display name; empty when not provided.
    #[serde(default)]
    pub display_name: String,
}

/// Demographic questionnaire answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicRecord {
    pub timestamp: String,
    pub participant_id: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub occupation: String,
    pub education: String,
    pub country: String,
    pub familiarity_1to5: u8,
}

/// One timed task trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub timestamp: String,
    pub participant_id: String,
    pub task_name: String,
    pub success: TaskOutcome,
    /// Measured duration in seconds; `None` when the timer was never stopped.
    pub duration_seconds: Option<f64>,
    pub errors: u32,
    pub perceived_difficulty_1to5: u8,
    pub task_satisfaction_1to5: u8,
    pub notes: String,
}

/// Exit questionnaire answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitRecord {
    pub timestamp: String,
    pub participant_id: String,
    pub satisfaction_1to5: u8,
    pub ease_of_use_1to5: u8,
    pub efficiency_1to5: u8,
    pub learnability_1to5: u8,
    pub error_prevention_1to5: u8,
    pub nps_0to10: u8,
    pub likes: String,
    pub dislikes: String,
    pub suggestions: String,
}

impl Record for ConsentRecord {
    const DATASET: Dataset = Dataset::Consent;

    fn participant_id(&self) -> &str {
        &self.participant_id
    }

    fn to_row(&self) -> Row {
        let consent = if self.consent_given { "True" } else { "False" };
        Row::new()
            .with("timestamp", self.timestamp.as_str())
            .with("participant_id", self.participant_id.as_str())
            .with("consent_given", consent)
            .with("display_name", self.display_name.as_str())
    }
}

impl Record for DemographicRecord {
    const DATASET: Dataset = Dataset::Demographic;

    fn participant_id(&self) -> &str {
        &self.participant_id
    }

    fn to_row(&self) -> Row {
        Row::new()
            .with("timestamp", self.timestamp.as_str())
            .with("participant_id", self.participant_id.as_str())
            .with("name", self.name.as_str())
            .with("age", self.age.to_string())
            .with("gender", self.gender.as_str())
            .with("occupation", self.occupation.as_str())
            .with("education", self.education.as_str())
            .with("country", self.country.as_str())
            .with("familiarity_1to5", self.familiarity_1to5.to_string())
    }
}

impl Record for TaskRecord {
    const DATASET: Dataset = Dataset::Task;

    fn participant_id(&self) -> &str {
        &self.participant_id
    }

    fn to_row(&self) -> Row {
        let duration = self
            .duration_seconds
            .map(|d| d.to_string())
            .unwrap_or_default();
        Row::new()
            .with("timestamp", self.timestamp.as_str())
            .with("participant_id", self.participant_id.as_str())
            .with("task_name", self.task_name.as_str())
            .with("success", self.success.to_string())
            .with("duration_seconds", duration)
            .with("errors", self.errors.to_string())
            .with(
                "perceived_difficulty_1to5",
                self.perceived_difficulty_1to5.to_string(),
            )
            .with(
                "task_satisfaction_1to5",
                self.task_satisfaction_1to5.to_string(),
            )
            .with("notes", self.notes.as_str())
    }
}

impl Record for ExitRecord {
    const DATASET: Dataset = Dataset::Exit;

    fn participant_id(&self) -> &str {
        &self.participant_id
    }

    fn to_row(&self) -> Row {
        Row::new()
            .with("timestamp", self.timestamp.as_str())
            .with("participant_id", self.participant_id.as_str())
            .with("satisfaction_1to5", self.satisfaction_1to5.to_string())
            .with("ease_of_use_1to5", self.ease_of_use_1to5.to_string())
            .with("efficiency_1to5", self.efficiency_1to5.to_string())
            .with("learnability_1to5", self.learnability_1to5.to_string())
            .with(
                "error_prevention_1to5",
                self.error_prevention_1to5.to_string(),
            )
            .with("nps_0to10", self.nps_0to10.to_string())
            .with("likes", self.likes.as_str())
            .with("dislikes", self.dislikes.as_str())
            .with("suggestions", self.suggestions.as_str())
    }
}
