// ============================================================
// Layer 4 — Sampling Strategy
// ============================================================
// Decides which methods of a commit become rows for a report.
//
//   Positives: every fixed method that exists in the commit's
//              block table. Fixed methods without a block are
//              counted as "unused" and produce no row.
//
//   Negatives:
//     Training   → `wrong_k` methods drawn uniformly, without
//                  replacement, from the non-fixed methods
//     Evaluation → every non-fixed method, in table order
//
//   Oversampling (training only, after assembly):
//     each label 1 row is copied `wrong_k` more times, then the
//     whole table is shuffled once.
//
// Example with wrong_k = 2:
//   1 positive + 2 negatives → 3 positives + 2 negatives
//
// Reference: rand crate documentation (SliceRandom)

use rand::{seq::SliceRandom, Rng};

use crate::domain::bug_report::BugReport;
use crate::domain::code_block::CodeBlocks;
use crate::domain::feature_row::FeatureRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingStrategy {
    /// Bounded random negatives, oversampled positives
    Training { wrong_k: usize },
    /// Exhaustive negatives, no oversampling
    Evaluation,
}

/// The positive methods of a report plus its unused ground truth count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Positives<'a> {
    pub methods: Vec<&'a str>,
    pub unused:  usize,
}

impl SamplingStrategy {
    /// Fixed methods present in `blocks`, in ground-truth order
    pub fn positives<'a>(&self, report: &'a BugReport, blocks: &CodeBlocks) -> Positives<'a> {
        let mut methods = Vec::new();
        let mut unused  = 0usize;
        for method in &report.fixed_methods {
            if blocks.contains(method) {
                methods.push(method.as_str());
            } else {
                unused += 1;
            }
        }
        Positives { methods, unused }
    }

    /// Non-fixed methods of `blocks` to use as label 0 rows
    pub fn negatives<'b, R: Rng + ?Sized>(
        &self,
        report: &BugReport,
        blocks: &'b CodeBlocks,
        rng:    &mut R,
    ) -> Vec<&'b str> {
        let candidates: Vec<&str> = blocks
            .method_ids()
            .filter(|m| !report.fixes(m))
            .collect();

        match *self {
            SamplingStrategy::Training { wrong_k } => candidates
                .choose_multiple(rng, wrong_k)
                .copied()
                .collect(),
            SamplingStrategy::Evaluation => candidates,
        }
    }

    /// Rebalance an assembled table. Returns the number of rows added.
    pub fn oversample<R: Rng + ?Sized>(&self, rows: &mut Vec<FeatureRow>, rng: &mut R) -> usize {
        let SamplingStrategy::Training { wrong_k } = *self else {
            return 0;
        };

        let positives: Vec<FeatureRow> = rows.iter().filter(|r| r.is_positive()).cloned().collect();
        let added = positives.len() * wrong_k;
        rows.reserve(added);
        for row in &positives {
            rows.extend(std::iter::repeat(row).take(wrong_k).cloned());
        }
        rows.shuffle(rng);
        added
    }
}
