// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// Errors raised while preparing a dataset.
//
//   MissingCommitBlocks    → recoverable: the report is skipped
//   MissingSimilarityGraph → fatal
//   BlockFile              → fatal (present but unreadable)
//   Vocabulary             → fatal
//   InvalidConfig          → fatal
//   MalformedReport        → fatal
//
// A method missing from a block table and a method missing from
// the similarity scores are NOT errors: the first is counted and
// skipped, the second scores 0.0.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrepareError {
    /// No block file exists for the report's commit
    #[error("no code blocks for commit '{commit_id}'")]
    MissingCommitBlocks { commit_id: String },

    /// A block file exists but cannot be read or decoded
    #[error("cannot read block file '{}': {message}", path.display())]
    BlockFile { path: PathBuf, message: String },

    /// A similarity or call graph file is absent
    #[error("similarity graph file '{}' not found", path.display())]
    MissingSimilarityGraph { path: PathBuf },

    /// The vocabulary could neither be loaded nor built
    #[error("vocabulary unavailable: {message}")]
    Vocabulary { message: String },

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// A bug-report row could not be parsed
    #[error("malformed report at row {row}: {message}")]
    MalformedReport { row: usize, message: String },
}

impl PrepareError {
    pub fn missing_blocks(commit_id: impl Into<String>) -> Self {
        Self::MissingCommitBlocks { commit_id: commit_id.into() }
    }

    pub fn vocabulary(message: impl Into<String>) -> Self {
        Self::Vocabulary { message: message.into() }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig { message: message.into() }
    }

    /// True for errors that only affect a single report
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::MissingCommitBlocks { .. })
    }
}
