//! Consent gate for dependent submissions.

use crate::error::StoreError;
use crate::model::Dataset;
use crate::store::RecordStore;

/// Returns `true` if any consent row carries `participant_id`.
///
/// The consent dataset is re-read on every call, so consent recorded earlier
/// in this process or by another process sharing the files is always seen.
pub fn has_consented(store: &dyn RecordStore, participant_id: &str) -> Result<bool, StoreError> {
    let rows = store.load(Dataset::Consent)?;
    Ok(rows
        .iter()
        .any(|row| row.get("participant_id") == Some(participant_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Row;
    use crate::store::MemoryStore;

    fn consent_row(pid: &str) -> Row {
        Row::new()
            .with("timestamp", "2025-01-01 00:00:00")
            .with("participant_id", pid)
            .with("consent_given", "True")
            .with("display_name", "")
    }

    #[test]
    fn empty_dataset_has_no_consent() {
        let store = MemoryStore::new();
        assert!(!has_consented(&store, "P-1").unwrap());
    }

    #[test]
    fn consent_is_per_participant() {
        let store = MemoryStore::new();
        store.append(Dataset::Consent, &consent_row("P-1")).unwrap();

        assert!(has_consented(&store, "P-1").unwrap());
        assert!(!has_consented(&store, "P-2").unwrap());
        assert!(!has_consented(&store, "P-").unwrap());
    }

    #[test]
    fn later_consent_is_visible() {
        let store = MemoryStore::new();
        assert!(!has_consented(&store, "P-9").unwrap());
        store.append(Dataset::Consent, &consent_row("P-9")).unwrap();
        assert!(has_consented(&store, "P-9").unwrap());
    }

    #[test]
    fn rows_without_participant_column_never_match() {
        let store = MemoryStore::with_rows(
            Dataset::Consent,
            vec![Row::new().with("timestamp", "2025-01-01 00:00:00")],
        );
        assert!(!has_consented(&store, "P-1").unwrap());
    }
}
