use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::domain::feature_row::FeatureRow;

/// The assembled rows of one split, materialised once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureTable {
    rows: Vec<FeatureRow>,
}

impl FeatureTable {
    pub fn new(rows: Vec<FeatureRow>) -> Self { Self { rows } }

    pub fn rows(&self) -> &[FeatureRow] { &self.rows }

    pub fn len(&self) -> usize { self.rows.len() }

    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    pub fn positive_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_positive()).count()
    }

    pub fn negative_count(&self) -> usize {
        self.rows.len() - self.positive_count()
    }

    /// Rows belonging to one bug report
    pub fn rows_for<'a>(&'a self, bug_id: &'a str) -> impl Iterator<Item = &'a FeatureRow> + 'a {
        self.rows.iter().filter(move |r| r.bug_id == bug_id)
    }
}

impl Dataset<FeatureRow> for FeatureTable {
    fn get(&self, index: usize) -> Option<FeatureRow> {
        self.rows.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::feature_row::{NEGATIVE, POSITIVE};

    fn row(bug: &str, label: u8) -> FeatureRow {
        FeatureRow {
            bug_id:           bug.into(),
            method_id:        "m".into(),
            report_token_ids: vec![],
            code_token_ids:   vec![],
            bfr:              0.0,
            bff:              0.0,
            cfs:              0.0,
            expanded_code_token_ids: vec![],
            label,
        }
    }

    #[test]
    fn test_counts_and_dataset_access() {
        let table = FeatureTable::new(vec![row("1", POSITIVE), row("1", NEGATIVE), row("2", NEGATIVE)]);
        assert_eq!(table.positive_count(), 1);
        assert_eq!(table.negative_count(), 2);
        assert_eq!(Dataset::len(&table), 3);
        assert_eq!(table.get(1).map(|r| r.label), Some(NEGATIVE));
        assert!(table.get(3).is_none());
        assert_eq!(table.rows_for("1").count(), 2);
    }
}
