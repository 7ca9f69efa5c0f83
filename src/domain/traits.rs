// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The pipeline reads from two external stores. Both are
// reached through a trait so the assembler can be driven by
// on-disk data in production and by in-memory tables in tests.
//
//   - CsvReportLoader implements ReportSource
//   - JsonBlockStore  implements BlockSource
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::bug_report::RawReport;
use crate::domain::code_block::CodeBlocks;
use crate::domain::error::PrepareError;

// ─── ReportSource ─────────────────────────────────────────────────────────────
/// Any component that can load the raw bug-report table.
pub trait ReportSource {
    /// Load every report, in source order.
    fn load_all(&self) -> Result<Vec<RawReport>>;
}

// ─── BlockSource ──────────────────────────────────────────────────────────────
/// Any component that can produce a commit's code-block table.
pub trait BlockSource {
    /// Load the block table of `commit_id`.
    ///
    /// Returns `PrepareError::MissingCommitBlocks` when the commit has
    /// no table; callers skip the report in that case.
    fn load_blocks(&self, commit_id: &str) -> Result<CodeBlocks, PrepareError>;
}
