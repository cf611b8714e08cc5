//! Report aggregation over the stored datasets.
//!
//! All means are plain arithmetic means over every counted row across all
//! sessions. Cells are read leniently: a value that does not parse as a
//! finite number is left out of a mean rather than counted as zero.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::model::{Dataset, Row, TaskOutcome};
use crate::store::RecordStore;

/// Aggregate view of everything collected so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudySummary {
    /// Number of consent rows.
    pub consent_count: usize,
    pub demographics: DemographicStats,
    /// Mean success score per task, highest first.
    pub task_success_by_name: Vec<TaskScore>,
    /// Mean measured duration per task, by task name. Tasks with no
    /// measured duration are absent.
    pub task_duration_by_name: Vec<TaskDuration>,
    pub exit: ExitStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DemographicStats {
    pub count: usize,
    pub mean_age: Option<f64>,
    pub mean_familiarity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskScore {
    pub task_name: String,
    /// Mean of the per-trial success score, 0.0..=1.0.
    pub success_rate: f64,
    pub trials: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDuration {
    pub task_name: String,
    pub mean_seconds: f64,
    /// Trials that had a numeric duration.
    pub samples: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExitStats {
    pub count: usize,
    /// Means of the Likert metrics whose column exists, in questionnaire order.
    pub metrics: Vec<MetricMean>,
    pub mean_nps: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricMean {
    pub metric: ExitMetric,
    pub mean: f64,
}

/// The five Likert metrics of the exit questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitMetric {
    Satisfaction,
    EaseOfUse,
    Efficiency,
    Learnability,
    ErrorPrevention,
}

impl ExitMetric {
    pub const ALL: [ExitMetric; 5] = [
        ExitMetric::Satisfaction,
        ExitMetric::EaseOfUse,
        ExitMetric::Efficiency,
        ExitMetric::Learnability,
        ExitMetric::ErrorPrevention,
    ];

    /// Column holding this metric in the exit dataset.
    pub fn column(self) -> &'static str {
        match self {
            ExitMetric::Satisfaction => "satisfaction_1to5",
            ExitMetric::EaseOfUse => "ease_of_use_1to5",
            ExitMetric::Efficiency => "efficiency_1to5",
            ExitMetric::Learnability => "learnability_1to5",
            ExitMetric::ErrorPrevention => "error_prevention_1to5",
        }
    }
}

impl fmt::Display for ExitMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitMetric::Satisfaction => write!(f, "Satisfaction"),
            ExitMetric::EaseOfUse => write!(f, "Ease of Use"),
            ExitMetric::Efficiency => write!(f, "Efficiency"),
            ExitMetric::Learnability => write!(f, "Learnability"),
            ExitMetric::ErrorPrevention => write!(f, "Error Prevention"),
        }
    }
}

/// Parse a stored cell as a finite number.
pub fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .fold((0.0f64, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Mean of the numeric values of `column`; `None` if there are none.
pub fn column_mean(rows: &[Row], column: &str) -> Option<f64> {
    mean(rows.iter().filter_map(|r| r.get(column).and_then(parse_number)))
}

/// Group task rows by task name. Rows without a task name are skipped.
fn group_by_task(rows: &[Row]) -> BTreeMap<&str, Vec<&Row>> {
    let mut grouped: BTreeMap<&str, Vec<&Row>> = BTreeMap::new();
    for row in rows {
        match row.get("task_name") {
            Some(name) if !name.trim().is_empty() => grouped.entry(name).or_default().push(row),
            _ => {}
        }
    }
    grouped
}

/// Mean success score per task, sorted by score descending.
///
/// Ties keep task-name order.
pub fn success_by_task(rows: &[Row]) -> Vec<TaskScore> {
    let mut scores: Vec<TaskScore> = group_by_task(rows)
        .into_iter()
        .map(|(name, group)| TaskScore {
            task_name: name.to_string(),
            success_rate: mean(group.iter().map(|r| TaskOutcome::score_of(r.get("success"))))
                .unwrap_or(0.0),
            trials: group.len(),
        })
        .collect();
    // Vec::sort_by is stable.
    scores.sort_by(|a, b| b.success_rate.total_cmp(&a.success_rate));
    scores
}

/// Mean measured duration per task, by task name.
///
/// Empty or non-numeric durations are excluded; a task with none left is
/// omitted.
pub fn duration_by_task(rows: &[Row]) -> Vec<TaskDuration> {
    group_by_task(rows)
        .into_iter()
        .filter_map(|(name, group)| {
            let durations: Vec<f64> = group
                .iter()
                .filter_map(|r| r.get("duration_seconds").and_then(parse_number))
                .collect();
            let samples = durations.len();
            mean(durations).map(|mean_seconds| TaskDuration {
                task_name: name.to_string(),
                mean_seconds,
                samples,
            })
        })
        .collect()
}

/// Compute the full summary from already-loaded datasets.
pub fn compute_summary(
    consent: &[Row],
    demographic: &[Row],
    task: &[Row],
    exit: &[Row],
) -> StudySummary {
    let demographics = DemographicStats {
        count: demographic.len(),
        mean_age: column_mean(demographic, "age"),
        mean_familiarity: column_mean(demographic, "familiarity_1to5"),
    };

    let metrics = ExitMetric::ALL
        .into_iter()
        .filter_map(|metric| {
            column_mean(exit, metric.column()).map(|mean| MetricMean { metric, mean })
        })
        .collect();

    StudySummary {
        consent_count: consent.len(),
        demographics,
        task_success_by_name: success_by_task(task),
        task_duration_by_name: duration_by_task(task),
        exit: ExitStats {
            count: exit.len(),
            metrics,
            mean_nps: column_mean(exit, "nps_0to10"),
        },
    }
}

/// Load all four datasets from `store` and summarise them.
pub fn summarize_store(store: &dyn RecordStore) -> Result<StudySummary, StoreError> {
    let consent = store.load(Dataset::Consent)?;
    let demographic = store.load(Dataset::Demographic)?;
    let task = store.load(Dataset::Task)?;
    let exit = store.load(Dataset::Exit)?;
    tracing::debug!(
        consent = consent.len(),
        demographic = demographic.len(),
        task = task.len(),
        exit = exit.len(),
        "summarising datasets"
    );
    Ok(compute_summary(&consent, &demographic, &task, &exit))
}
