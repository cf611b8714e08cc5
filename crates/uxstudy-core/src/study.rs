//! The study facade.
//!
//! [`Study`] ties a [`Session`] to a [`RecordStore`] and exposes the
//! operations a front end drives: submit each stage, run the task timer and
//! read back the report.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::builders::{
    build_consent, build_demographic, build_exit, build_task, ConsentForm, DemographicForm,
    ExitForm, TaskForm,
};
use crate::consent::has_consented;
use crate::error::{Rejection, StoreError};
use crate::model::{ConsentRecord, DemographicRecord, ExitRecord, Record, TaskRecord};
use crate::report::StudyReport;
use crate::session::Session;
use crate::statistics::{summarize_store, StudySummary};
use crate::store::RecordStore;

/// Result of a submission that reached the store layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<R> {
    /// The record was appended.
    Recorded(R),
    /// Nothing was written; the participant may correct and retry.
    Rejected(Rejection),
}

impl<R> Submission<R> {
    pub fn is_recorded(&self) -> bool {
        matches!(self, Submission::Recorded(_))
    }

    pub fn record(&self) -> Option<&R> {
        match self {
            Submission::Recorded(r) => Some(r),
            Submission::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Submission::Recorded(_) => None,
            Submission::Rejected(r) => Some(r),
        }
    }
}

/// One participant's run through the study.
pub struct Study {
    store: Arc<dyn RecordStore>,
    session: Session,
}

impl Study {
    /// A study over `store` with a fresh session.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self::with_session(store, Session::new())
    }

    pub fn with_session(store: Arc<dyn RecordStore>, session: Session) -> Self {
        Self { store, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    /// The session's participant id, generated on first use.
    pub fn participant_id(&mut self) -> String {
        self.session.ensure_participant().to_string()
    }

    /// Whether the current participant has a consent record.
    pub fn has_consented(&mut self) -> Result<bool, StoreError> {
        let pid = self.participant_id();
        has_consented(self.store.as_ref(), &pid)
    }

    pub fn submit_consent(
        &mut self,
        form: &ConsentForm,
    ) -> Result<Submission<ConsentRecord>, StoreError> {
        let pid = self.participant_id();
        self.append(build_consent(&pid, form, Utc::now()))
    }

    pub fn submit_demographics(
        &mut self,
        form: &DemographicForm,
    ) -> Result<Submission<DemographicRecord>, StoreError> {
        self.gated(|pid, now| build_demographic(pid, form, now))
    }

    pub fn start_timer(&mut self) {
        self.session.timer.start();
    }

    /// Stop the task timer. `None` if it was never started.
    pub fn stop_timer(&mut self) -> Option<Duration> {
        self.session.timer.stop()
    }

    /// Record a task trial using the last measured duration, then reset the
    /// timer for the next task.
    pub fn submit_task(&mut self, form: &TaskForm) -> Result<Submission<TaskRecord>, StoreError> {
        let duration = self.session.timer.last_duration();
        let submission = self.gated(|pid, now| build_task(pid, form, duration, now))?;
        if submission.is_recorded() {
            self.session.timer.reset();
        }
        Ok(submission)
    }

    pub fn submit_exit(&mut self, form: &ExitForm) -> Result<Submission<ExitRecord>, StoreError> {
        self.gated(|pid, now| build_exit(pid, form, now))
    }

    /// Summary statistics over everything stored so far.
    pub fn get_report(&self) -> Result<StudySummary, StoreError> {
        summarize_store(self.store.as_ref())
    }

    /// Summary plus raw tables, ready to render or save.
    pub fn build_report(&self) -> anyhow::Result<StudyReport> {
        StudyReport::from_store(self.store.as_ref())
    }

    /// Build and append a record, but only for a consented participant.
    fn gated<R: Record>(
        &mut self,
        build: impl FnOnce(&str, DateTime<Utc>) -> Result<R, Rejection>,
    ) -> Result<Submission<R>, StoreError> {
        let pid = self.participant_id();
        if !has_consented(self.store.as_ref(), &pid)? {
            tracing::warn!(participant_id = %pid, "submission rejected: no consent on record");
            return Ok(Submission::Rejected(Rejection::NeedsConsent {
                participant_id: pid,
            }));
        }
        self.append(build(&pid, Utc::now()))
    }

    fn append<R: Record>(
        &self,
        built: Result<R, Rejection>,
    ) -> Result<Submission<R>, StoreError> {
        match built {
            Ok(record) => {
                self.store.append(R::DATASET, &record.to_row())?;
                tracing::info!(
                    dataset = %R::DATASET,
                    participant_id = %record.participant_id(),
                    "record saved"
                );
                Ok(Submission::Recorded(record))
            }
            Err(rejection) => {
                tracing::warn!(dataset = %R::DATASET, %rejection, "submission rejected");
                Ok(Submission::Rejected(rejection))
            }
        }
    }
}
