//! Response builders: raw form answers to persisted records.
//!
//! Each builder is pure. It takes the participant id, the form and the
//! submission instant, checks presence and ranges, and returns the record to
//! append or the reason it was refused.

use std::ops::RangeInclusive;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Rejection;
use crate::likert::{Agreement, LikertScale, Quality};
use crate::model::{
    format_timestamp, ConsentRecord, DemographicRecord, Education, ExitRecord, Gender,
    TaskOutcome, TaskRecord,
};

/// Allowed participant ages.
pub const AGE_RANGE: RangeInclusive<u32> = 13..=120;

/// Allowed Net Promoter Score answers.
pub const NPS_RANGE: RangeInclusive<u8> = 0..=10;

/// Consent form answers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsentForm {
    /// The "I have read and agree" checkbox.
    pub consent_given: bool,
    /// Optional display name.
    #[serde(default)]
    pub display_name: String,
}

/// Demographic questionnaire answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemographicForm {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub occupation: String,
    pub education: Education,
    pub country: String,
    /// Familiarity with similar tools.
    pub familiarity: Quality,
}

impl Default for DemographicForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            age: 25,
            gender: Gender::PreferNotToSay,
            occupation: "Student".to_string(),
            education: Education::PreferNotToSay,
            country: String::new(),
            familiarity: Quality::Fair,
        }
    }
}

/// Answers recorded after one task trial.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskForm {
    pub task_name: String,
    pub outcome: TaskOutcome,
    /// Number of noticeable errors.
    pub errors: u32,
    pub difficulty: Quality,
    pub satisfaction: Quality,
    pub notes: String,
}

impl TaskForm {
    /// A form for `task_name` with the default answers.
    pub fn new(task_name: impl Into<String>) -> Self {
        Self {
            task_name: task_name.into(),
            outcome: TaskOutcome::Success,
            errors: 0,
            difficulty: Quality::Fair,
            satisfaction: Quality::Good,
            notes: String::new(),
        }
    }
}

/// Exit questionnaire answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitForm {
    pub satisfaction: Agreement,
    pub ease_of_use: Agreement,
    pub efficiency: Agreement,
    pub learnability: Agreement,
    pub error_prevention: Agreement,
    /// Likelihood to recommend, 0..=10.
    pub nps: u8,
    pub likes: String,
    pub dislikes: String,
    pub suggestions: String,
}

impl Default for ExitForm {
    fn default() -> Self {
        Self {
            satisfaction: Agreement::Agree,
            ease_of_use: Agreement::Agree,
            efficiency: Agreement::Agree,
            learnability: Agreement::Agree,
            error_prevention: Agreement::Neutral,
            nps: 7,
            likes: String::new(),
            dislikes: String::new(),
            suggestions: String::new(),
        }
    }
}

pub fn build_consent(
    participant_id: &str,
    form: &ConsentForm,
    now: DateTime<Utc>,
) -> Result<ConsentRecord, Rejection> {
    if !form.consent_given {
        return Err(Rejection::ConsentNotGiven);
    }
    Ok(ConsentRecord {
        timestamp: format_timestamp(now),
        participant_id: participant_id.to_string(),
        consent_given: true,
        display_name: form.display_name.clone(),
    })
}

pub fn build_demographic(
    participant_id: &str,
    form: &DemographicForm,
    now: DateTime<Utc>,
) -> Result<DemographicRecord, Rejection> {
    if !AGE_RANGE.contains(&form.age) {
        return Err(Rejection::OutOfRange {
            field: "age",
            min: i64::from(*AGE_RANGE.start()),
            max: i64::from(*AGE_RANGE.end()),
            value: i64::from(form.age),
        });
    }
    Ok(DemographicRecord {
        timestamp: format_timestamp(now),
        participant_id: participant_id.to_string(),
        name: form.name.clone(),
        age: form.age,
        gender: form.gender.stored_value().to_string(),
        occupation: form.occupation.clone(),
        education: form.education.label().to_string(),
        country: form.country.clone(),
        familiarity_1to5: form.familiarity.value(),
    })
}

/// Build a task record. `duration` is `None` when the timer was not stopped;
/// it is then stored as unknown rather than zero.
pub fn build_task(
    participant_id: &str,
    form: &TaskForm,
    duration: Option<Duration>,
    now: DateTime<Utc>,
) -> Result<TaskRecord, Rejection> {
    if form.task_name.trim().is_empty() {
        return Err(Rejection::MissingField { field: "task_name" });
    }
    Ok(TaskRecord {
        timestamp: format_timestamp(now),
        participant_id: participant_id.to_string(),
        task_name: form.task_name.clone(),
        success: form.outcome,
        duration_seconds: duration.map(round_seconds),
        errors: form.errors,
        perceived_difficulty_1to5: form.difficulty.value(),
        task_satisfaction_1to5: form.satisfaction.value(),
        notes: form.notes.clone(),
    })
}

pub fn build_exit(
    participant_id: &str,
    form: &ExitForm,
    now: DateTime<Utc>,
) -> Result<ExitRecord, Rejection> {
    if !NPS_RANGE.contains(&form.nps) {
        return Err(Rejection::OutOfRange {
            field: "nps",
            min: i64::from(*NPS_RANGE.start()),
            max: i64::from(*NPS_RANGE.end()),
            value: i64::from(form.nps),
        });
    }
    Ok(ExitRecord {
        timestamp: format_timestamp(now),
        participant_id: participant_id.to_string(),
        satisfaction_1to5: form.satisfaction.value(),
        ease_of_use_1to5: form.ease_of_use.value(),
        efficiency_1to5: form.efficiency.value(),
        learnability_1to5: form.learnability.value(),
        error_prevention_1to5: form.error_prevention.value(),
        nps_0to10: form.nps,
        likes: form.likes.clone(),
        dislikes: form.dislikes.clone(),
        suggestions: form.suggestions.clone(),
    })
}

/// Seconds rounded to millisecond precision.
fn round_seconds(duration: Duration) -> f64 {
    (duration.as_secs_f64() * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn consent_requires_checkbox() {
        let form = ConsentForm::default();
        assert_eq!(
            build_consent("P-1", &form, now()),
            Err(Rejection::ConsentNotGiven)
        );

        let form = ConsentForm {
            consent_given: true,
            display_name: "  Sam ".into(),
        };
        let record = build_consent("P-1", &form, now()).unwrap();
        assert!(record.consent_given);
        assert_eq!(record.display_name, "  Sam ");
        assert_eq!(record.timestamp, "2025-06-01 09:30:00");
        assert_eq!(record.participant_id, "P-1");
    }

    #[test]
    fn demographic_maps_labels() {
        let form = DemographicForm {
            gender: Gender::SelfDescribe("Agender".into()),
            education: Education::Master,
            familiarity: Quality::Excellent,
            ..Default::default()
        };
        let record = build_demographic("P-1", &form, now()).unwrap();
        assert_eq!(record.gender, "Agender");
        assert_eq!(record.education, "Master");
        assert_eq!(record.familiarity_1to5, 5);
        assert_eq!(record.age, 25);
        assert_eq!(record.occupation, "Student");
    }

    #[test]
    fn demographic_age_bounds() {
        for age in [13, 120] {
            let form = DemographicForm {
                age,
                ..Default::default()
            };
            assert!(build_demographic("P-1", &form, now()).is_ok());
        }
        for age in [12, 121, 0] {
            let form = DemographicForm {
                age,
                ..Default::default()
            };
            let err = build_demographic("P-1", &form, now()).unwrap_err();
            assert!(matches!(err, Rejection::OutOfRange { field: "age", .. }));
        }
    }

    #[test]
    fn task_duration_rounded_or_unknown() {
        let form = TaskForm::new("Task 1: Find an item");
        let timed =
            build_task("P-1", &form, Some(Duration::from_micros(12_345_678)), now()).unwrap();
        assert_eq!(timed.duration_seconds, Some(12.346));

        let untimed = build_task("P-1", &form, None, now()).unwrap();
        assert_eq!(untimed.duration_seconds, None);

        let instant = build_task("P-1", &form, Some(Duration::ZERO), now()).unwrap();
        assert_eq!(instant.duration_seconds, Some(0.0));
    }

    #[test]
    fn task_defaults_and_scales() {
        let record = build_task("P-1", &TaskForm::new("T"), None, now()).unwrap();
        assert_eq!(record.success, TaskOutcome::Success);
        assert_eq!(record.perceived_difficulty_1to5, 3);
        assert_eq!(record.task_satisfaction_1to5, 4);
        assert_eq!(record.errors, 0);
    }

    #[test]
    fn task_requires_name() {
        let err = build_task("P-1", &TaskForm::new("  "), None, now()).unwrap_err();
        assert_eq!(err, Rejection::MissingField { field: "task_name" });
    }

    #[test]
    fn exit_maps_agreement_and_checks_nps() {
        let record = build_exit("P-1", &ExitForm::default(), now()).unwrap();
        assert_eq!(record.satisfaction_1to5, 4);
        assert_eq!(record.error_prevention_1to5, 3);
        assert_eq!(record.nps_0to10, 7);

        let form = ExitForm {
            nps: 11,
            ..Default::default()
        };
        assert!(matches!(
            build_exit("P-1", &form, now()),
            Err(Rejection::OutOfRange { field: "nps", .. })
        ));
    }
}
