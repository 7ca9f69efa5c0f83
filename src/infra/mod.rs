// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that touches the filesystem:
//
//   vocabulary_store.rs — Word vocabulary persistence
//                         Builds a frequency-ranked vocabulary
//                         from the report corpus if none exists,
//                         or loads the saved WordLevel tokenizer.
//
//   graph_store.rs      — Repository similarity/call graphs
//                         Loads the four relations once per run.
//
//   block_store.rs      — Per-commit code-block tables
//                         Loaded lazily, one commit at a time.
//
//   dataset_store.rs    — Feature table and config persistence
//                         Atomic writes, existence checks for
//                         idempotent re-runs.
//
//   metrics.rs          — Generation statistics CSV logger
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Vocabulary building, saving, and loading
pub mod vocabulary_store;

/// Commit/method similarity and call graphs
pub mod graph_store;

/// Code-block tables keyed by commit id
pub mod block_store;

/// Train/test table persistence
pub mod dataset_store;

/// Generation statistics CSV logger
pub mod metrics;
