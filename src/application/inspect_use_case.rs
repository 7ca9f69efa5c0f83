// ============================================================
// Layer 2 — InspectUseCase
// ============================================================
// Reloads generated tables and summarises them, so a dataset
// can be sanity-checked without opening multi-gigabyte JSON:
//
//   split   rows   positive   negative   reports
//   train   9      6          3          2
//   test    3      1          2          1

use anyhow::Result;
use std::collections::BTreeSet;

use crate::application::prepare_use_case::PrepareConfig;
use crate::domain::split::Split;
use crate::infra::dataset_store::DatasetStore;

/// Counts of one persisted table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    pub split:     Split,
    pub rows:      usize,
    pub positives: usize,
    pub negatives: usize,
    /// Distinct bug reports with at least one row
    pub reports:   usize,
}

pub struct InspectUseCase {
    store: DatasetStore,
}

impl InspectUseCase {
    pub fn new(data_dir: &str) -> Self {
        Self { store: DatasetStore::new(data_dir) }
    }

    /// Summarise one split's table
    pub fn summarize(&self, split: Split) -> Result<TableSummary> {
        let table = self.store.load_table(split)?;
        let reports: BTreeSet<&str> = table.rows().iter().map(|r| r.bug_id.as_str()).collect();

        let summary = TableSummary {
            split,
            rows:      table.len(),
            positives: table.positive_count(),
            negatives: table.negative_count(),
            reports:   reports.len(),
        };
        tracing::debug!("{:?}", summary);
        Ok(summary)
    }

    /// Options of the run that wrote the tables
    pub fn config(&self) -> Result<PrepareConfig> {
        self.store.load_config()
    }

    /// Summaries of every split that exists on disk
    pub fn summarize_all(&self) -> Result<Vec<TableSummary>> {
        [Split::Train, Split::Test]
            .into_iter()
            .filter(|s| self.store.exists(*s))
            .map(|s| self.summarize(s))
            .collect()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::FeatureTable;
    use crate::domain::feature_row::{FeatureRow, NEGATIVE, POSITIVE};

    fn row(bug: &str, method: &str, label: u8) -> FeatureRow {
        FeatureRow {
            bug_id:           bug.into(),
            method_id:        method.into(),
            report_token_ids: vec![vec![0]],
            code_token_ids:   vec![1, 2],
            bfr:              0.0,
            bff:              0.0,
            cfs:              0.0,
            expanded_code_token_ids: vec![],
            label,
        }
    }

    #[test]
    fn test_summarize_counts_rows_and_reports() {
        let dir   = tempfile::tempdir().unwrap();
        let store = DatasetStore::new(dir.path());
        store
            .save_table(
                Split::Test,
                &FeatureTable::new(vec![row("1", "a", POSITIVE), row("1", "b", NEGATIVE), row("2", "b", NEGATIVE)]),
            )
            .unwrap();

        let inspect = InspectUseCase::new(&dir.path().display().to_string());
        let summary = inspect.summarize(Split::Test).unwrap();
        assert_eq!(
            summary,
            TableSummary { split: Split::Test, rows: 3, positives: 1, negatives: 2, reports: 2 }
        );

        // Only the split on disk is listed
        let all = inspect.summarize_all().unwrap();
        assert_eq!(all.len(), 1);
        assert!(inspect.summarize(Split::Train).is_err());
    }
}
