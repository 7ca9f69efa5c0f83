// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums, and traits that describe what the
// dataset pipeline works with:
//
//   bug_report.rs  — a historical bug report and its fixed methods
//   code_block.rs  — one commit's method → code token table
//   feature_row.rs — one labelled (report, method) training row
//   split.rs       — train / test
//   error.rs       — the error taxonomy of a preparation run
//   traits.rs      — the seams other layers implement
//
// Rules for this layer:
//   - NO file I/O or network calls
//   - NO feature math
//   - Only types and the small helpers that belong to them
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// A bug report, raw (CSV row) and prepared (tokenised + encoded)
pub mod bug_report;

// A commit snapshot's code blocks, keyed by method id
pub mod code_block;

// A labelled feature row emitted by the assembler
pub mod feature_row;

// Train or test
pub mod split;

// Error taxonomy (recoverable vs fatal)
pub mod error;

// Core abstractions (traits) that other layers implement
pub mod traits;
