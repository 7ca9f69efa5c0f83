// ============================================================
// Layer 3 — Feature Row
// ============================================================
// One labelled (bug report, candidate method) pair.
//
//   label = 1 → the method was changed by the report's fix
//   label = 0 → a sampled negative from the same commit
//
// Example:
//   bug_id = "4231", method_id = "org.foo.Parser.parse(String)"
//   bfr = 0.5, bff = 2.0, cfs = 0.81, label = 1

use serde::{Deserialize, Serialize};

/// Label of a ground-truth (fixed) method
pub const POSITIVE: u8 = 1;

/// Label of a sampled non-fixed method
pub const NEGATIVE: u8 = 0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub bug_id:           String,
    pub method_id:        String,

    /// Encoded report text: one `[index]` list per token
    pub report_token_ids: Vec<Vec<u32>>,

    /// Code token ids of the candidate method
    pub code_token_ids:   Vec<u32>,

    /// Bug-Fixing-Recency
    pub bfr:              f64,

    /// Bug-Fixing-Frequency
    pub bff:              f64,

    /// Collaborative-filtering score
    pub cfs:              f64,

    /// Code of related methods, filled only for short methods
    pub expanded_code_token_ids: Vec<Vec<u32>>,

    pub label:            u8,
}

impl FeatureRow {
    pub fn is_positive(&self) -> bool {
        self.label == POSITIVE
    }
}
