// ============================================================
// Layer 5 — Temporal Features
// ============================================================
// Two history features of a (method, reference time) pair:
//
//   Bug-Fixing-Frequency (bff)
//     number of reports committed strictly before the
//     reference time whose fix touched the method
//
//   Bug-Fixing-Recency (bfr)
//     1 / (months since the latest such report + 1)
//     e.g. last fixed 2 months earlier → 1/3
//
// A method that was never fixed before gets (0.0, 0.0).
//
// Reference: Ye et al. (2014) Learning to Rank Relevant Files
//            for Bug Reports using Domain Knowledge

use chrono::{DateTime, Utc};

use crate::domain::bug_report::BugReport;

const SECONDS_PER_MONTH: f64 = 30.0 * 24.0 * 60.0 * 60.0;

/// Recency and frequency of one method at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TemporalFeatures {
    pub bfr: f64,
    pub bff: f64,
}

/// Reports committed before `time` that fixed `method`, in corpus order
pub fn previous_reports_for_method<'a>(
    method: &str,
    time:   DateTime<Utc>,
    corpus: &'a [BugReport],
) -> Vec<&'a BugReport> {
    corpus
        .iter()
        .filter(|r| r.precedes(time) && r.fixes(method))
        .collect()
}

/// 1 / (months between `time` and the latest previous fix + 1),
/// or 0.0 when there is no previous fix
pub fn bug_fixing_recency(time: DateTime<Utc>, previous: &[&BugReport]) -> f64 {
    let Some(latest) = previous.iter().map(|r| r.commit_time).max() else {
        return 0.0;
    };
    let gap_seconds = (time - latest).num_seconds().max(0) as f64;
    let months      = gap_seconds / SECONDS_PER_MONTH;
    1.0 / (months + 1.0)
}

/// Compute bfr and bff for `method` at `time` against `corpus`
pub fn temporal_features(method: &str, time: DateTime<Utc>, corpus: &[BugReport]) -> TemporalFeatures {
    let previous = previous_reports_for_method(method, time, corpus);
    TemporalFeatures {
        bfr: bug_fixing_recency(time, &previous),
        bff: previous.len() as f64,
    }
}
