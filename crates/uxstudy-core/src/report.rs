//! Study report types with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Dataset, Row};
use crate::statistics::{compute_summary, StudySummary};
use crate::store::RecordStore;

/// A complete study report: the summary plus the raw tables it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Aggregate statistics.
    pub summary: StudySummary,
    /// Raw rows of each dataset, in study order.
    pub tables: Vec<DatasetTable>,
}

/// The raw contents of one dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetTable {
    pub dataset: Dataset,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DatasetTable {
    /// Tabulate rows. Columns appear in first-seen order; cells a row lacks
    /// are left empty.
    pub fn from_rows(dataset: Dataset, rows: &[Row]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in rows {
            for column in row.columns() {
                if !columns.iter().any(|c| c == column) {
                    columns.push(column.to_string());
                }
            }
        }

        let rows = rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|c| row.get(c).unwrap_or_default().to_string())
                    .collect()
            })
            .collect();

        Self {
            dataset,
            columns,
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl StudyReport {
    /// Load every dataset from `store` and build a report.
    pub fn from_store(store: &dyn RecordStore) -> Result<Self> {
        let mut loaded = Vec::with_capacity(Dataset::ALL.len());
        for dataset in Dataset::ALL {
            let rows = store
                .load(dataset)
                .with_context(|| format!("failed to load {dataset} dataset"))?;
            loaded.push((dataset, rows));
        }

        let summary = compute_summary(&loaded[0].1, &loaded[1].1, &loaded[2].1, &loaded[3].1);
        let tables = loaded
            .iter()
            .map(|(dataset, rows)| DatasetTable::from_rows(*dataset, rows))
            .collect();

        Ok(Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            summary,
            tables,
        })
    }

    /// The raw table for `dataset`, if present.
    pub fn table(&self, dataset: Dataset) -> Option<&DatasetTable> {
        self.tables.iter().find(|t| t.dataset == dataset)
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: StudyReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .append(
                Dataset::Consent,
                &Row::new().with("participant_id", "P-1").with("consent_given", "True"),
            )
            .unwrap();
        store
            .append(
                Dataset::Task,
                &Row::new()
                    .with("task_name", "T1")
                    .with("success", "Success")
                    .with("duration_seconds", "3.5"),
            )
            .unwrap();
        store
    }

    #[test]
    fn from_store_collects_all_tables() {
        let report = StudyReport::from_store(&seeded_store()).unwrap();
        assert_eq!(report.tables.len(), 4);
        assert_eq!(report.summary.consent_count, 1);
        assert_eq!(report.table(Dataset::Task).unwrap().rows.len(), 1);
        assert!(report.table(Dataset::Exit).unwrap().is_empty());
    }

    #[test]
    fn table_fills_missing_cells() {
        let rows = vec![
            Row::new().with("a", "1"),
            Row::new().with("a", "2").with("b", "x"),
        ];
        let table = DatasetTable::from_rows(Dataset::Exit, &rows);
        assert_eq!(table.columns, vec!["a", "b"]);
        assert_eq!(table.rows[0], vec!["1", ""]);
        assert_eq!(table.rows[1], vec!["2", "x"]);
    }

    #[test]
    fn json_roundtrip() {
        let report = StudyReport::from_store(&seeded_store()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");

        report.save_json(&path).unwrap();
        let loaded = StudyReport::load_json(&path).unwrap();

        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.summary, report.summary);
    }

    #[test]
    fn load_missing_report_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(StudyReport::load_json(&dir.path().join("none.json")).is_err());
    }
}
