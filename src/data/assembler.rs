// ============================================================
// Layer 4 — Dataset Assembler
// ============================================================
// Builds the labelled feature table of one split.
//
// Per report, in table order:
//
//   LOAD_BLOCKS ──(no block file)──► SKIP (warn, counted)
//       │
//       ▼
//   COMPUTE_SIMILARITY      cfs scores, once per report
//       │
//       ▼
//   positives ─► COMPUTE_FEATURES ─► EMIT_ROW (label 1)
//       │
//       ▼
//   negatives ─► COMPUTE_FEATURES ─► EMIT_ROW (label 0)
//       │
//       ▼
//   drop the block table ─► next report
//
// COMPUTE_FEATURES for one candidate method:
//   bfr, bff  ← temporal features against the corpus
//   cfs       ← the report's score map (0.0 if absent)
//   expansion ← related methods' code, only for short bodies
//
// Rows are collected and materialised into a FeatureTable once,
// after every report; training tables are then oversampled.

use anyhow::Result;
use rand::Rng;

use crate::data::dataset::FeatureTable;
use crate::data::sampler::SamplingStrategy;
use crate::domain::bug_report::{prior_reports, BugReport};
use crate::domain::code_block::CodeBlocks;
use crate::domain::feature_row::{FeatureRow, NEGATIVE, POSITIVE};
use crate::domain::split::Split;
use crate::domain::traits::BlockSource;
use crate::features::expansion::{expand_candidate, ExpansionParams};
use crate::features::similarity::{collaborative_filtering_scores, score_of, CfsParams, MethodScores};
use crate::features::temporal::temporal_features;
use crate::infra::graph_store::SimilarityGraphs;
use crate::infra::metrics::GenerationStats;

/// Feature parameters shared by every report of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureParams {
    pub expansion: ExpansionParams,
    pub cfs:       CfsParams,
}

/// Assembles feature tables from a block source and the
/// repository graphs. Holds only shared references; all
/// per-report state lives inside `assemble`.
pub struct DatasetAssembler<'a, S: BlockSource + ?Sized> {
    blocks: &'a S,
    graphs: &'a SimilarityGraphs,
    params: FeatureParams,
}

impl<'a, S: BlockSource + ?Sized> DatasetAssembler<'a, S> {
    pub fn new(blocks: &'a S, graphs: &'a SimilarityGraphs, params: FeatureParams) -> Self {
        Self { blocks, graphs, params }
    }

    /// Build the table for `reports`.
    ///
    /// `corpus` is the history used for prior-report queries
    /// (temporal features and similarity): the training reports
    /// for the train split, every report for the test split.
    pub fn assemble<R: Rng + ?Sized>(
        &self,
        split:    Split,
        reports:  &[BugReport],
        corpus:   &[BugReport],
        strategy: SamplingStrategy,
        rng:      &mut R,
    ) -> Result<(FeatureTable, GenerationStats)> {
        let mut stats = GenerationStats::new(split);
        let mut rows  = Vec::new();

        for report in reports {
            stats.reports += 1;

            // ── LOAD_BLOCKS ──────────────────────────────────────────────────
            let blocks = match self.blocks.load_blocks(&report.commit_id) {
                Ok(blocks) => blocks,
                Err(e) if e.is_recoverable() => {
                    tracing::warn!("Skipping bug {}: {}", report.bug_id, e);
                    stats.skipped_reports += 1;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            // ── COMPUTE_SIMILARITY ───────────────────────────────────────────
            let priors = prior_reports(corpus, report.commit_time);
            let scores = collaborative_filtering_scores(
                &report.tokens,
                &priors,
                self.graphs,
                &self.params.cfs,
            );

            // ── Positives ────────────────────────────────────────────────────
            let positives = strategy.positives(report, &blocks);
            stats.unused_methods += positives.unused;
            for method in positives.methods {
                if let Some(row) = self.build_row(report, method, &blocks, corpus, &scores, POSITIVE) {
                    rows.push(row);
                    stats.positive_rows += 1;
                }
            }

            // ── Negatives ────────────────────────────────────────────────────
            let negatives = strategy.negatives(report, &blocks, rng);
            for method in negatives {
                if let Some(row) = self.build_row(report, method, &blocks, corpus, &scores, NEGATIVE) {
                    rows.push(row);
                    stats.negative_rows += 1;
                }
            }

            tracing::debug!(
                "Bug {}: {} blocks, {} priors, {} rows so far",
                report.bug_id,
                blocks.len(),
                priors.len(),
                rows.len()
            );

            // Release the block table before loading the next commit
            drop(blocks);
        }

        stats.oversampled_rows = strategy.oversample(&mut rows, rng);
        Ok((FeatureTable::new(rows), stats))
    }

    /// COMPUTE_FEATURES + EMIT_ROW for one candidate.
    /// None when the method has no block in this commit.
    fn build_row(
        &self,
        report: &BugReport,
        method: &str,
        blocks: &CodeBlocks,
        corpus: &[BugReport],
        scores: &MethodScores,
        label:  u8,
    ) -> Option<FeatureRow> {
        let code     = blocks.get(method)?;
        let temporal = temporal_features(method, report.commit_time, corpus);
        let expanded = expand_candidate(method, code, blocks, self.graphs, &self.params.expansion);

        Some(FeatureRow {
            bug_id:           report.bug_id.clone(),
            method_id:        method.to_string(),
            report_token_ids: report.token_ids.clone(),
            code_token_ids:   code.to_vec(),
            bfr:              temporal.bfr,
            bff:              temporal.bff,
            cfs:              score_of(scores, method),
            expanded_code_token_ids: expanded,
            label,
        })
    }
}
