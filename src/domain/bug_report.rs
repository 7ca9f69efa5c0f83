// ============================================================
// Layer 3 — Bug Report Domain Types
// ============================================================
// A bug report moves through two shapes:
//
//   RawReport  — exactly what the CSV row says
//                (summary, description, ground-truth methods)
//       │
//       ▼
//   BugReport  — the prepared report: normalised tokens,
//                vocabulary indexes, and the commit timestamp
//
// commit_time gives a total order over reports. Every
// "prior reports" query (recency, frequency, similarity)
// compares against it with a strict less-than.
//
// Reference: Rust Book §5 (Structs and Methods)

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the bug-report table before any text processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReport {
    pub bug_id:        String,
    pub commit_id:     String,
    pub summary:       String,
    pub description:   String,
    /// Ground truth: the methods changed by the fixing commit
    pub fixed_methods: BTreeSet<String>,
    pub commit_time:   DateTime<Utc>,
}

/// A prepared bug report. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BugReport {
    pub bug_id:        String,
    pub commit_id:     String,

    /// Normalised report tokens (summary followed by description)
    pub tokens:        Vec<String>,

    /// One single-element list per token: `[index]`, or `[V]` for
    /// tokens outside a vocabulary of size V
    pub token_ids:     Vec<Vec<u32>>,

    pub fixed_methods: BTreeSet<String>,
    pub commit_time:   DateTime<Utc>,
}

impl BugReport {
    /// Build a prepared report from its raw row plus the outputs of
    /// the preprocessor and the vocabulary encoder.
    pub fn from_raw(raw: RawReport, tokens: Vec<String>, token_ids: Vec<Vec<u32>>) -> Self {
        Self {
            bug_id:        raw.bug_id,
            commit_id:     raw.commit_id,
            tokens,
            token_ids,
            fixed_methods: raw.fixed_methods,
            commit_time:   raw.commit_time,
        }
    }

    /// True if this report was committed strictly before `time`
    pub fn precedes(&self, time: DateTime<Utc>) -> bool {
        self.commit_time < time
    }

    /// True if `method` is part of this report's ground truth
    pub fn fixes(&self, method: &str) -> bool {
        self.fixed_methods.contains(method)
    }
}

/// Reports from `corpus` committed strictly before `time`, in corpus order.
pub fn prior_reports(corpus: &[BugReport], time: DateTime<Utc>) -> Vec<&BugReport> {
    corpus.iter().filter(|r| r.precedes(time)).collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    /// Midnight UTC on 2020-01-01 plus `days`
    pub fn day(days: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::days(days)
    }

    /// A prepared report with the given tokens and fixed methods
    pub fn report(bug_id: &str, commit_id: &str, days: i64, tokens: &[&str], methods: &[&str]) -> BugReport {
        BugReport {
            bug_id:        bug_id.to_string(),
            commit_id:     commit_id.to_string(),
            tokens:        tokens.iter().map(|t| t.to_string()).collect(),
            token_ids:     (0..tokens.len() as u32).map(|i| vec![i]).collect(),
            fixed_methods: methods.iter().map(|m| m.to_string()).collect(),
            commit_time:   day(days),
        }
    }
}
