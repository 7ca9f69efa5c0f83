// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// This layer handles everything from the raw report table
// all the way to the labelled feature tables on disk.
//
// The pipeline flows in this order:
//
//   reports.csv
//       │
//       ▼
//   CsvReportLoader   → reads rows, parses methods and times
//       │
//       ▼
//   Preprocessor      → cleans text, splits identifiers
//       │
//       ▼
//   (features::encoder turns tokens into vocabulary ids)
//       │
//       ▼
//   split_train_test  → head / tail split, order preserved
//       │
//       ▼
//   DatasetAssembler  → per report: positives, negatives,
//                       features, rows (SamplingStrategy)
//       │
//       ▼
//   FeatureTable      → implements Burn's Dataset trait
//
// Each module is responsible for exactly one step.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)
//            Rust Book §13 (Iterators and Closures)

/// Loads the bug-report CSV table
pub mod loader;

/// Cleans report text and splits it into tokens
pub mod preprocessor;

/// Head/tail split of the report table
pub mod splitter;

/// Positive/negative selection and oversampling
pub mod sampler;

/// Materialised rows of one split, Burn Dataset impl
pub mod dataset;

/// Turns reports into labelled feature rows
pub mod assembler;
