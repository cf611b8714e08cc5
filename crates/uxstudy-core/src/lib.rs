//! uxstudy-core: Session state, record model, consent gating and report
//! aggregation.
//!
//! This crate defines the datasets a usability study collects, the rules for
//! when a participant's answers may be written, and the statistics computed
//! over everything collected.

pub mod builders;
pub mod config;
pub mod consent;
pub mod error;
pub mod likert;
pub mod model;
pub mod report;
pub mod session;
pub mod statistics;
pub mod store;
pub mod study;

pub use error::{Rejection, StoreError};
pub use store::{MemoryStore, RecordStore};
pub use study::{Study, Submission};
