//! End-to-end study flow against the in-memory store.

use std::sync::Arc;
use std::time::{Duration, Instant};

use uxstudy_core::builders::{ConsentForm, DemographicForm, ExitForm, TaskForm};
use uxstudy_core::likert::Agreement;
use uxstudy_core::model::{Dataset, TaskOutcome};
use uxstudy_core::{MemoryStore, RecordStore, Study};

fn consent_form() -> ConsentForm {
    ConsentForm {
        consent_given: true,
        display_name: "Test Participant".into(),
    }
}

#[test]
fn consent_then_demographics_then_report() {
    let store = Arc::new(MemoryStore::new());
    let mut study = Study::new(store.clone());
    study.session_mut().set_participant_id("P1");

    assert!(study.submit_consent(&consent_form()).unwrap().is_recorded());
    let demo = DemographicForm {
        age: 34,
        ..Default::default()
    };
    assert!(study.submit_demographics(&demo).unwrap().is_recorded());

    let report = study.get_report().unwrap();
    assert_eq!(report.consent_count, 1);
    assert_eq!(report.demographics.count, 1);
    assert_eq!(report.demographics.mean_age, Some(34.0));
    assert_eq!(report.demographics.mean_familiarity, Some(3.0));

    // A second participant without consent cannot record a task.
    let mut other = Study::new(store.clone());
    other.session_mut().set_participant_id("P2");
    let result = other.submit_task(&TaskForm::new("Task 1: Find an item")).unwrap();
    assert!(result.rejection().unwrap().needs_consent());
    assert_eq!(store.count(Dataset::Task).unwrap(), 0);
}

#[test]
fn full_session_feeds_every_aggregate() {
    let store = Arc::new(MemoryStore::new());

    for (pid, outcome, seconds, nps) in [
        ("P-aaaa0001", TaskOutcome::Success, Some(10), 9),
        ("P-aaaa0002", TaskOutcome::Fail, None, 5),
    ] {
        let mut study = Study::new(store.clone());
        study.session_mut().set_participant_id(pid);
        study.submit_consent(&consent_form()).unwrap();

        let start = Instant::now();
        study.session_mut().timer.start_at(start);
        if let Some(s) = seconds {
            study
                .session_mut()
                .timer
                .stop_at(start + Duration::from_secs(s));
        }

        let form = TaskForm {
            outcome,
            ..TaskForm::new("Task 1: Find an item")
        };
        assert!(study.submit_task(&form).unwrap().is_recorded());

        let exit = ExitForm {
            satisfaction: Agreement::StronglyAgree,
            nps,
            ..Default::default()
        };
        assert!(study.submit_exit(&exit).unwrap().is_recorded());
    }

    let summary = Study::new(store.clone()).get_report().unwrap();
    assert_eq!(summary.consent_count, 2);

    assert_eq!(summary.task_success_by_name.len(), 1);
    assert_eq!(summary.task_success_by_name[0].success_rate, 0.5);
    assert_eq!(summary.task_success_by_name[0].trials, 2);

    // The untimed trial is excluded, not averaged in as zero.
    assert_eq!(summary.task_duration_by_name.len(), 1);
    assert_eq!(summary.task_duration_by_name[0].mean_seconds, 10.0);
    assert_eq!(summary.task_duration_by_name[0].samples, 1);

    assert_eq!(summary.exit.count, 2);
    assert_eq!(summary.exit.metrics.len(), 5);
    assert_eq!(summary.exit.metrics[0].mean, 5.0);
    assert_eq!(summary.exit.mean_nps, Some(7.0));
}

#[test]
fn participant_id_is_stable_across_submissions() {
    let store = Arc::new(MemoryStore::new());
    let mut study = Study::new(store.clone());
    let first = study.participant_id();
    study.submit_consent(&consent_form()).unwrap();
    study.submit_exit(&ExitForm::default()).unwrap();
    assert_eq!(study.participant_id(), first);

    let ids: Vec<String> = [Dataset::Consent, Dataset::Exit]
        .into_iter()
        .flat_map(|d| store.load(d).unwrap())
        .filter_map(|r| r.get("participant_id").map(str::to_string))
        .collect();
    assert_eq!(ids, vec![first.clone(), first]);
}
