// ============================================================
// Layer 6 — Dataset Store
// ============================================================
// Persists generated feature tables and the run configuration.
//
// File naming convention:
//   data/
//     train.json            ← training table (oversampled)
//     test.json             ← evaluation table (exhaustive)
//     prepare_config.json   ← options of the run that wrote them
//
// Tables are written to a `.tmp` sibling first and renamed into
// place, so a crashed run never leaves a half-written table that
// a later run would mistake for a finished one.
//
// A table that already exists is never rewritten: callers check
// `exists` and skip the split.
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{
    fs,
    io::{BufReader, BufWriter, Write},
    path::PathBuf,
};

use crate::application::prepare_use_case::PrepareConfig;
use crate::data::dataset::FeatureTable;
use crate::domain::split::Split;

const CONFIG_FILE: &str = "prepare_config.json";

/// Reads and writes datasets under a single directory.
pub struct DatasetStore {
    dir: PathBuf,
}

impl DatasetStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Full path of a split's table
    pub fn path_for(&self, split: Split) -> PathBuf {
        self.dir.join(format!("{}.json", split.name()))
    }

    /// True if the split has already been generated
    pub fn exists(&self, split: Split) -> bool {
        self.path_for(split).exists()
    }

    /// Write a split's table, replacing nothing that is already there
    pub fn save_table(&self, split: Split, table: &FeatureTable) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let path = self.path_for(split);
        let tmp  = path.with_extension("json.tmp");

        {
            let file = fs::File::create(&tmp)
                .with_context(|| format!("Cannot create '{}'", tmp.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, table)
                .with_context(|| format!("Cannot serialise {split} table"))?;
            writer.flush()?;
        }
        fs::rename(&tmp, &path)
            .with_context(|| format!("Cannot move table into '{}'", path.display()))?;

        tracing::info!("Saved {} table ({} rows) to '{}'", split, table.len(), path.display());
        Ok(())
    }

    /// Load a previously written table
    pub fn load_table(&self, split: Split) -> Result<FeatureTable> {
        let path = self.path_for(split);
        let file = fs::File::open(&path).with_context(|| {
            format!("Cannot open '{}'. Have you run 'prepare' first?", path.display())
        })?;
        let table: FeatureTable = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Cannot parse '{}'", path.display()))?;
        Ok(table)
    }

    /// Save the configuration of the current run
    pub fn save_config(&self, cfg: &PrepareConfig) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(CONFIG_FILE);
        fs::write(&path, serde_json::to_string_pretty(cfg)?)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;
        tracing::debug!("Saved prepare config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<PrepareConfig> {
        let path = self.dir.join(CONFIG_FILE);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;
        Ok(serde_json::from_str(&json)?)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::feature_row::{FeatureRow, NEGATIVE, POSITIVE};

    fn row(method: &str, label: u8) -> FeatureRow {
        FeatureRow {
            bug_id:           "1".into(),
            method_id:        method.into(),
            report_token_ids: vec![vec![0], vec![3]],
            code_token_ids:   vec![9, 9],
            bfr:              0.5,
            bff:              1.0,
            cfs:              0.25,
            expanded_code_token_ids: vec![],
            label,
        }
    }

    #[test]
    fn test_save_then_load_table() {
        let dir   = tempfile::tempdir().unwrap();
        let store = DatasetStore::new(dir.path().join("out"));
        let table = FeatureTable::new(vec![row("a", POSITIVE), row("b", NEGATIVE)]);

        assert!(!store.exists(Split::Test));
        store.save_table(Split::Test, &table).unwrap();
        assert!(store.exists(Split::Test));
        assert!(!store.path_for(Split::Test).with_extension("json.tmp").exists());

        let loaded = store.load_table(Split::Test).unwrap();
        assert_eq!(loaded.rows(), table.rows());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir   = tempfile::tempdir().unwrap();
        let store = DatasetStore::new(dir.path());
        let cfg   = PrepareConfig { wrong_k: 7, ..PrepareConfig::default() };
        store.save_config(&cfg).unwrap();
        assert_eq!(store.load_config().unwrap().wrong_k, 7);
    }

    #[test]
    fn test_missing_table_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(DatasetStore::new(dir.path()).load_table(Split::Train).is_err());
    }
}
