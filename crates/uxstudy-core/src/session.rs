//! Per-participant session state.
//!
//! A [`Session`] holds the participant id, the observer-mode display flag and
//! the task timer for one person's run through the study.

use std::time::{Duration, Instant};

use uuid::Uuid;

/// Generate a fresh participant id: `P-` followed by 8 lowercase hex digits.
pub fn generate_participant_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("P-{}", &hex[..8])
}

/// Mutable state for one participant's session.
#[derive(Debug, Clone)]
pub struct Session {
    participant_id: Option<String>,
    /// Picks the label of the free-text notes field; no other effect.
    pub observer_mode: bool,
    pub timer: TaskTimer,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A session with no participant id, observer mode on and an idle timer.
    pub fn new() -> Self {
        Self {
            participant_id: None,
            observer_mode: true,
            timer: TaskTimer::default(),
        }
    }

    /// Return the participant id, generating one first if none is set.
    ///
    /// An empty id counts as unset. An existing id is never replaced.
    pub fn ensure_participant(&mut self) -> &str {
        if self.participant_id.as_deref().map_or(true, str::is_empty) {
            let id = generate_participant_id();
            tracing::debug!(participant_id = %id, "generated participant id");
            self.participant_id = Some(id);
        }
        self.participant_id.as_deref().unwrap_or_default()
    }

    /// Current participant id, if one has been set or generated.
    pub fn participant_id(&self) -> Option<&str> {
        self.participant_id.as_deref()
    }

    /// Overwrite the participant id (e.g. the researcher typed one in).
    pub fn set_participant_id(&mut self, id: impl Into<String>) {
        let id = id.into();
        tracing::debug!(participant_id = %id, "participant id overridden");
        self.participant_id = Some(id);
    }

    /// Label for the free-text notes field of a task.
    pub fn notes_label(&self) -> &'static str {
        if self.observer_mode {
            "Observer Notes"
        } else {
            "Participant Notes"
        }
    }
}

/// Stopwatch for a single task trial.
#[derive(Debug, Clone, Default)]
pub struct TaskTimer {
    started_at: Option<Instant>,
    last_duration: Option<Duration>,
}

impl TaskTimer {
    /// Start timing now. Clears any previously measured duration.
    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn start_at(&mut self, now: Instant) {
        self.started_at = Some(now);
        self.last_duration = None;
    }

    /// Stop timing and return the elapsed time.
    ///
    /// Returns `None` and leaves the timer untouched if it was never started.
    pub fn stop(&mut self) -> Option<Duration> {
        self.stop_at(Instant::now())
    }

    pub fn stop_at(&mut self, now: Instant) -> Option<Duration> {
        let Some(started) = self.started_at else {
            tracing::warn!("timer was not started");
            return None;
        };
        let elapsed = now.saturating_duration_since(started);
        self.last_duration = Some(elapsed);
        Some(elapsed)
    }

    /// Clear both the start instant and the measured duration.
    pub fn reset(&mut self) {
        self.started_at = None;
        self.last_duration = None;
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some() && self.last_duration.is_none()
    }

    /// The most recently measured duration, if the timer was stopped.
    pub fn last_duration(&self) -> Option<Duration> {
        self.last_duration
    }
}
