// ============================================================
// Layer 4 — Bug Report Loader
// ============================================================
// Reads the project's bug-report table from CSV.
//
// Required columns (any order, extra columns ignored):
//   summary, description, bug_id, commit_id, method, commit_time
//
// The `method` column holds the ground-truth method set, in
// either of two shapes:
//   ['org.a.B.run()', 'org.a.C.stop(int, String)']   ← list literal
//   org.a.B.run();org.a.C.stop(int, String)          ← ; or newline
//
// The `commit_time` column accepts:
//   1404812345                  ← epoch seconds
//   2014-07-08T09:39:05+00:00   ← RFC 3339
//   2014-07-08 09:39:05         ← naive, read as UTC
//   2014-07-08                  ← date only, midnight UTC
//
// Rows are returned in file order. Errors name the file line
// the offending record starts on.
//
// Reference: csv crate documentation (serde deserialisation)
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use std::{collections::BTreeSet, path::PathBuf};

use crate::domain::bug_report::RawReport;
use crate::domain::error::PrepareError;
use crate::domain::traits::ReportSource;

/// One CSV row, as written by the report exporter
#[derive(Debug, Deserialize)]
struct CsvRecord {
    bug_id:      String,
    commit_id:   String,
    #[serde(default)]
    summary:     String,
    #[serde(default)]
    description: String,
    method:      String,
    commit_time: String,
}

/// Loads bug reports from a CSV file.
/// Implements the ReportSource trait from Layer 3.
pub struct CsvReportLoader {
    path: PathBuf,
}

impl CsvReportLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportSource for CsvReportLoader {
    fn load_all(&self) -> Result<Vec<RawReport>> {
        let mut reader = csv::Reader::from_path(&self.path)
            .with_context(|| format!("Cannot open report table '{}'", self.path.display()))?;

        let headers = reader
            .headers()
            .with_context(|| format!("Cannot read header of '{}'", self.path.display()))?
            .clone();

        let mut reports = Vec::new();
        for result in reader.records() {
            // Quoted fields may span lines: report the line the record starts on
            let record = result.map_err(|e| PrepareError::MalformedReport {
                row:     e.position().map_or(0, |p| p.line() as usize),
                message: e.to_string(),
            })?;
            let row = record.position().map_or(0, |p| p.line() as usize);
            let parsed: CsvRecord = record
                .deserialize(Some(&headers))
                .map_err(|e| PrepareError::MalformedReport { row, message: e.to_string() })?;
            reports.push(into_raw_report(parsed, row)?);
        }

        tracing::info!("Loaded {} bug reports from '{}'", reports.len(), self.path.display());
        Ok(reports)
    }
}

fn into_raw_report(record: CsvRecord, row: usize) -> Result<RawReport, PrepareError> {
    let commit_time = parse_commit_time(&record.commit_time).ok_or_else(|| {
        PrepareError::MalformedReport {
            row,
            message: format!("unrecognised commit_time '{}'", record.commit_time),
        }
    })?;

    Ok(RawReport {
        bug_id:        record.bug_id.trim().to_string(),
        commit_id:     record.commit_id.trim().to_string(),
        summary:       record.summary,
        description:   record.description,
        fixed_methods: parse_methods(&record.method),
        commit_time,
    })
}

/// Parse the ground-truth method column into a set of method ids
pub fn parse_methods(field: &str) -> BTreeSet<String> {
    let field = field.trim();
    let items: Vec<String> = match field.strip_prefix('[').and_then(|f| f.strip_suffix(']')) {
        Some(inner) if inner.contains(['\'', '"']) => quoted_items(inner),
        Some(inner) => inner.split(',').map(str::to_string).collect(),
        None => field.split([';', '\n']).map(str::to_string).collect(),
    };

    items
        .into_iter()
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .collect()
}

/// Contents of every '...' or "..." literal in `s`
fn quoted_items(s: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut quote: Option<char> = None;
    let mut current = String::new();

    for c in s.chars() {
        match quote {
            Some(q) if c == q => {
                items.push(std::mem::take(&mut current));
                quote = None;
            }
            Some(_) => current.push(c),
            None if c == '\'' || c == '"' => quote = Some(c),
            None => {}
        }
    }
    items
}

/// Parse a commit timestamp in any of the supported formats
pub fn parse_commit_time(field: &str) -> Option<DateTime<Utc>> {
    let field = field.trim();

    if let Ok(secs) = field.parse::<i64>() {
        return Utc.timestamp_opt(secs, 0).single();
    }
    if let Ok(t) = DateTime::parse_from_rfc3339(field) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(field, "%Y-%m-%d %H:%M:%S") {
        return Some(t.and_utc());
    }
    NaiveDate::parse_from_str(field, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc())
}
