//! Error and rejection types.
//!
//! Submissions can end two ways short of success. A [`Rejection`] is a
//! recoverable, user-facing refusal: nothing was written and the participant
//! may retry. A [`StoreError`] means the underlying dataset could not be read
//! or written and the triggering operation failed.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::Dataset;

/// Failures of the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The dataset file or directory could not be accessed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An existing dataset could not be parsed.
    #[error("malformed {dataset} dataset: {message}")]
    Malformed { dataset: Dataset, message: String },
}

impl StoreError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Why a submission was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// No consent record exists for the participant.
    #[error("consent required: submit consent for {participant_id} before recording data")]
    NeedsConsent { participant_id: String },

    /// The consent checkbox was left unchecked.
    #[error("you must agree to the consent terms before proceeding")]
    ConsentNotGiven,

    /// A required field was empty.
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    /// A numeric field fell outside its allowed range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },
}

impl Rejection {
    /// Returns `true` if the participant can fix this by submitting consent first.
    pub fn needs_consent(&self) -> bool {
        matches!(self, Rejection::NeedsConsent { .. })
    }
}
