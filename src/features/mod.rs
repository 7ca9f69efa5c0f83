// ============================================================
// Layer 5 — Feature Layer
// ============================================================
// The per-candidate signals that go into each feature row.
// Nothing here touches the filesystem: every function takes
// the read-only context it needs (vocabulary, corpus, graphs)
// as arguments.
//
//   encoder.rs    — report tokens → vocabulary indexes
//                   (out-of-vocabulary → sentinel V)
//
//   temporal.rs   — Bug-Fixing-Recency and Bug-Fixing-Frequency
//                   of a method before a reference time
//
//   expansion.rs  — related methods whose code is attached to
//                   candidates with very short bodies
//
//   similarity.rs — collaborative-filtering score per method,
//                   propagated from textually similar prior
//                   reports through commit and method graphs
//
// Reference: Ye et al. (2014) Learning to Rank Relevant Files
//            for Bug Reports (recency / frequency features)

/// Vocabulary encoding of report tokens
pub mod encoder;

/// Bug-fixing recency and frequency
pub mod temporal;

/// Short-method context expansion
pub mod expansion;

/// Collaborative-filtering similarity scores
pub mod similarity;
