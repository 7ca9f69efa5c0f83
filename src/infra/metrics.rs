// ============================================================
// Layer 6 — Generation Metrics Logger
// ============================================================
// Records one diagnostic row per generated split.
//
// Metrics recorded per split:
//   - reports:          reports handed to the assembler
//   - skipped_reports:  reports whose commit had no block file
//   - unused_methods:   ground-truth methods absent from their
//                       commit's block table
//   - positive_rows:    label 1 rows before oversampling
//   - negative_rows:    label 0 rows
//   - oversampled_rows: extra label 1 copies added for training
//
// Output file: {data_dir}/generation_stats.csv
//
// Example CSV output:
//   split,reports,skipped_reports,unused_methods,positive_rows,negative_rows,oversampled_rows
//   train,812,14,37,1290,243600,387000
//   test,204,3,9,301,1871214,0

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};
use serde::{Deserialize, Serialize};

use crate::domain::split::Split;

const CSV_HEADER: &str =
    "split,reports,skipped_reports,unused_methods,positive_rows,negative_rows,oversampled_rows";

/// Diagnostics for one assembled split
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub split:            Split,
    pub reports:          usize,
    pub skipped_reports:  usize,
    pub unused_methods:   usize,
    pub positive_rows:    usize,
    pub negative_rows:    usize,
    pub oversampled_rows: usize,
}

impl GenerationStats {
    pub fn new(split: Split) -> Self {
        Self {
            split,
            reports:          0,
            skipped_reports:  0,
            unused_methods:   0,
            positive_rows:    0,
            negative_rows:    0,
            oversampled_rows: 0,
        }
    }

    /// Rows in the final table
    pub fn total_rows(&self) -> usize {
        self.positive_rows + self.negative_rows + self.oversampled_rows
    }
}

/// Appends generation stats to a CSV file.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger.
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("generation_stats.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "{CSV_HEADER}")?;
            tracing::debug!("Created stats CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one split's stats as a new row
    pub fn log(&self, s: &GenerationStats) -> Result<()> {
        let mut f = OpenOptions::new().append(true).open(&self.csv_path)?;

        writeln!(
            f,
            "{},{},{},{},{},{},{}",
            s.split,
            s.reports,
            s.skipped_reports,
            s.unused_methods,
            s.positive_rows,
            s.negative_rows,
            s.oversampled_rows,
        )?;

        tracing::info!(
            "{} split: {} reports ({} skipped), {} rows ({} positive, {} negative, {} oversampled), {} unused methods",
            s.split,
            s.reports,
            s.skipped_reports,
            s.total_rows(),
            s.positive_rows,
            s.negative_rows,
            s.oversampled_rows,
            s.unused_methods,
        );

        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}
