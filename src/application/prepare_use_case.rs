// ============================================================
// Layer 2 — PrepareUseCase
// ============================================================
// Orchestrates the full dataset preparation run in order:
//
//   Step 1: Validate the configuration
//   Step 2: Stop early if both tables exist   (Layer 6 - infra)
//   Step 3: Load the report table             (Layer 4 - data)
//   Step 4: Tokenise summaries/descriptions   (Layer 4 - data)
//   Step 5: Build / load the vocabulary       (Layer 6 - infra)
//   Step 6: Encode report tokens              (Layer 5 - features)
//   Step 7: Head/tail train-test split        (Layer 4 - data)
//   Step 8: Load similarity graphs            (Layer 6 - infra)
//   Step 9: Save config, fresh runs only      (Layer 6 - infra)
//   Step 10: Assemble + save each missing split
//
// The train split uses the training reports as history; the
// test split uses every report, so a test bug can see earlier
// training bugs (and earlier test bugs) as priors.
//
// Reference: Rust Book §13 (Iterators and Closures)

use anyhow::{Context, Result};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::data::{
    assembler::{DatasetAssembler, FeatureParams},
    loader::CsvReportLoader,
    preprocessor::Preprocessor,
    sampler::SamplingStrategy,
    splitter::split_train_test,
};
use crate::domain::{bug_report::BugReport, error::PrepareError, split::Split, traits::ReportSource};
use crate::features::{encoder::encode_reports, expansion::ExpansionParams, similarity::CfsParams};
use crate::infra::{
    block_store::JsonBlockStore,
    dataset_store::DatasetStore,
    graph_store::GraphStore,
    metrics::{GenerationStats, MetricsLogger},
    vocabulary_store::VocabularyStore,
};

// ─── Preparation Configuration ───────────────────────────────────────────────
// Every option of a preparation run.
// Saved next to the tables so a dataset can be traced back to
// the parameters that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepareConfig {
    pub project_csv:           String,
    pub block_dir:             String,
    pub sim_dir:               String,
    pub data_dir:              String,
    pub train_ratio:           f64,
    pub wrong_k:               usize,
    pub neighbors:             usize,
    pub expand_k:              usize,
    pub short_method_len:      usize,
    pub max_vocab:             usize,
    pub min_count:             usize,
    pub seed:                  u64,
    pub use_commit_similarity: bool,
    pub use_method_similarity: bool,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            project_csv:           "data/reports.csv".to_string(),
            block_dir:             "data/blocks".to_string(),
            sim_dir:               "data/similarity".to_string(),
            data_dir:              "data/prepared".to_string(),
            train_ratio:           0.8,
            wrong_k:               300,
            neighbors:             50,
            expand_k:              10,
            short_method_len:      5,
            max_vocab:             5000,
            min_count:             5,
            seed:                  42,
            use_commit_similarity: true,
            use_method_similarity: true,
        }
    }
}

impl PrepareConfig {
    /// Reject option combinations that cannot produce a dataset
    pub fn validate(&self) -> Result<(), PrepareError> {
        if !(0.0..=1.0).contains(&self.train_ratio) {
            return Err(PrepareError::invalid_config(format!(
                "train ratio must be within [0, 1], got {}",
                self.train_ratio
            )));
        }
        if self.max_vocab == 0 {
            return Err(PrepareError::invalid_config("max_vocab must be positive"));
        }
        if self.data_dir.trim().is_empty() {
            return Err(PrepareError::invalid_config("data directory must not be empty"));
        }
        Ok(())
    }

    pub fn feature_params(&self) -> FeatureParams {
        FeatureParams {
            expansion: ExpansionParams {
                short_method_len: self.short_method_len,
                max_related:      self.expand_k,
            },
            cfs: CfsParams {
                neighbors:             self.neighbors,
                use_commit_similarity: self.use_commit_similarity,
                use_method_similarity: self.use_method_similarity,
            },
        }
    }
}

// ─── PrepareUseCase ──────────────────────────────────────────────────────────
pub struct PrepareUseCase {
    config: PrepareConfig,
}

impl PrepareUseCase {
    pub fn new(config: PrepareConfig) -> Self {
        Self { config }
    }

    /// Run the preparation pipeline end to end.
    /// Returns the stats of the splits generated by this run;
    /// splits whose table already existed are not in the list.
    pub fn execute(&self) -> Result<Vec<GenerationStats>> {
        let cfg = &self.config;

        // ── Step 1: Validate ─────────────────────────────────────────────────
        cfg.validate()?;

        // ── Step 2: Nothing to do? ───────────────────────────────────────────
        let store = DatasetStore::new(&cfg.data_dir);
        if store.exists(Split::Train) && store.exists(Split::Test) {
            tracing::info!("Train and test tables already exist in '{}', nothing to do", cfg.data_dir);
            return Ok(Vec::new());
        }

        // ── Step 3: Load the report table ────────────────────────────────────
        let loader = CsvReportLoader::new(&cfg.project_csv);
        let raw    = loader.load_all()?;

        // ── Step 4: Tokenise ─────────────────────────────────────────────────
        let preprocessor = Preprocessor::new();
        let tokenised: Vec<_> = raw
            .into_iter()
            .map(|r| {
                let tokens = preprocessor.report_tokens(&r.summary, &r.description);
                (r, tokens)
            })
            .collect();

        // ── Step 5: Vocabulary ───────────────────────────────────────────────
        let corpus: Vec<Vec<String>> = tokenised.iter().map(|(_, t)| t.clone()).collect();
        let vocab = VocabularyStore::new(&cfg.data_dir)
            .load_or_build(&corpus, cfg.max_vocab, cfg.min_count)
            .context("Vocabulary step failed")?;
        tracing::info!("Vocabulary size: {} (sentinel index {})", vocab.len(), vocab.sentinel());

        // ── Step 6: Encode ───────────────────────────────────────────────────
        let reports = encode_reports(tokenised, &vocab);

        // ── Step 7: Split ────────────────────────────────────────────────────
        let (train, test) = split_train_test(reports.clone(), cfg.train_ratio);
        tracing::info!("Split: {} train, {} test reports", train.len(), test.len());

        // ── Step 8: Graphs ───────────────────────────────────────────────────
        let graphs = GraphStore::new(&cfg.sim_dir).load()?;

        // ── Step 9: Save config ──────────────────────────────────────────────
        // Only a run that writes both tables owns prepare_config.json;
        // otherwise the kept table's options stay on record.
        if !store.exists(Split::Train) && !store.exists(Split::Test) {
            store.save_config(cfg)?;
        } else {
            match store.load_config() {
                Ok(saved) if saved != *cfg => tracing::warn!(
                    "Options differ from the run that wrote the existing table; keeping its prepare_config.json"
                ),
                Ok(_) => {}
                Err(e) => tracing::warn!("No config recorded for the existing table: {e:#}"),
            }
        }

        // ── Step 10: Assemble each split ─────────────────────────────────────
        let blocks    = JsonBlockStore::new(&cfg.block_dir);
        let assembler = DatasetAssembler::new(&blocks, &graphs, cfg.feature_params());
        let metrics   = MetricsLogger::new(&cfg.data_dir)?;
        let mut rng   = StdRng::seed_from_u64(cfg.seed);

        let plan: [(Split, &[BugReport], &[BugReport], SamplingStrategy); 2] = [
            (Split::Train, train.as_slice(), train.as_slice(), SamplingStrategy::Training { wrong_k: cfg.wrong_k }),
            (Split::Test, test.as_slice(), reports.as_slice(), SamplingStrategy::Evaluation),
        ];

        let mut generated = Vec::new();
        for (split, split_reports, corpus, strategy) in plan {
            if store.exists(split) {
                tracing::info!("'{}' already exists, skipping {} split", store.path_for(split).display(), split);
                continue;
            }

            tracing::info!("Assembling {} split from {} reports", split, split_reports.len());
            let (table, stats) = assembler
                .assemble(split, split_reports, corpus, strategy, &mut rng)
                .with_context(|| format!("Cannot assemble {split} split"))?;

            store.save_table(split, &table)?;
            metrics.log(&stats)?;
            generated.push(stats);
        }

        if !generated.is_empty() {
            tracing::info!("Generation stats appended to '{}'", metrics.csv_path().display());
        }
        Ok(generated)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, path::Path};

    const REPORTS_CSV: &str = "\
bug_id,summary,description,commit_id,method,commit_time
1,Window resize flicker,Resizing the window flickers,c1,['Win.resize()'],2020-01-01
2,Parser crash on empty node,Parser throws on empty node,c2,['Parser.parse()'],2020-02-01
3,Parser slow on big file,Parsing a big file is slow,c3,['Parser.parse()'],2020-03-01
";

    /// Lay out a small project under `root` and return its config
    fn project(root: &Path) -> PrepareConfig {
        let blocks = root.join("blocks");
        let sim    = root.join("sim");
        fs::create_dir_all(&blocks).unwrap();
        fs::create_dir_all(&sim).unwrap();

        fs::write(root.join("reports.csv"), REPORTS_CSV).unwrap();
        fs::write(blocks.join("c1.json"), r#"{"Win.resize()": [1,2,3,4,5,6], "Win.draw()": [7,8,9,10,11,12]}"#).unwrap();
        fs::write(
            blocks.join("c2.json"),
            r#"{"Parser.parse()": [1,2,3,4], "Parser.read()": [5,6,7,8,9,10], "Win.draw()": [7,8,9,10,11,12]}"#,
        )
        .unwrap();
        fs::write(
            blocks.join("c3.json"),
            r#"{"Parser.parse()": [1,2,3,4], "Parser.read()": [5,6,7,8,9,10], "Win.draw()": [7,8,9,10,11,12]}"#,
        )
        .unwrap();
        fs::write(sim.join("commit2commit.json"), r#"{"c1": {"c2": 0.2}}"#).unwrap();
        fs::write(sim.join("method2method.json"), "{}").unwrap();
        fs::write(sim.join("method_call_method.json"), r#"{"Parser.parse()": ["Parser.read()"]}"#).unwrap();
        fs::write(sim.join("method_call_graph.json"), r#"{"Parser.parse()": ["Parser.read()"]}"#).unwrap();

        PrepareConfig {
            project_csv: root.join("reports.csv").display().to_string(),
            block_dir:   blocks.display().to_string(),
            sim_dir:     sim.display().to_string(),
            data_dir:    root.join("out").display().to_string(),
            train_ratio: 0.7,
            wrong_k:     2,
            min_count:   1,
            ..PrepareConfig::default()
        }
    }

    #[test]
    fn test_prepare_writes_both_splits() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = project(dir.path());

        let stats = PrepareUseCase::new(cfg.clone()).execute().unwrap();
        assert_eq!(stats.len(), 2);

        let store = DatasetStore::new(&cfg.data_dir);
        let train = store.load_table(Split::Train).unwrap();
        let test  = store.load_table(Split::Test).unwrap();

        // Train: reports 1 and 2, one positive each, replicated 1 + wrong_k times
        assert_eq!(train.positive_count(), 2 * 3);
        assert_eq!(train.negative_count(), 1 + 2);

        // Test: report 3, exhaustive negatives over c3
        assert_eq!(test.positive_count(), 1);
        assert_eq!(test.negative_count(), 2);

        // Report 2 fixed Parser.parse() a month before report 3
        let parse = test.rows().iter().find(|r| r.method_id == "Parser.parse()").unwrap();
        assert_eq!(parse.bff, 1.0);
        assert!(parse.cfs > 0.0);
        assert_eq!(parse.expanded_code_token_ids, vec![vec![5u32, 6, 7, 8, 9, 10]]);

        assert_eq!(store.load_config().unwrap(), cfg);
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = project(dir.path());

        PrepareUseCase::new(cfg.clone()).execute().unwrap();
        let store  = DatasetStore::new(&cfg.data_dir);
        let before = fs::read(store.path_for(Split::Train)).unwrap();

        let stats = PrepareUseCase::new(cfg.clone()).execute().unwrap();
        assert!(stats.is_empty());
        assert_eq!(fs::read(store.path_for(Split::Train)).unwrap(), before);
    }

    #[test]
    fn test_only_missing_split_is_regenerated() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = project(dir.path());

        PrepareUseCase::new(cfg.clone()).execute().unwrap();
        let store = DatasetStore::new(&cfg.data_dir);
        fs::remove_file(store.path_for(Split::Test)).unwrap();

        let stats = PrepareUseCase::new(cfg).execute().unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].split, Split::Test);
        assert!(store.exists(Split::Test));
    }

    #[test]
    fn test_partial_rerun_keeps_original_config() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = project(dir.path());

        PrepareUseCase::new(cfg.clone()).execute().unwrap();
        let store = DatasetStore::new(&cfg.data_dir);
        fs::remove_file(store.path_for(Split::Test)).unwrap();

        let changed = PrepareConfig { wrong_k: 5, seed: 7, ..cfg.clone() };
        PrepareUseCase::new(changed).execute().unwrap();

        // The kept train table was built with the first run's options
        assert_eq!(store.load_config().unwrap(), cfg);
        assert!(store.exists(Split::Test));
    }

    #[test]
    fn test_missing_graph_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = project(dir.path());
        fs::remove_file(Path::new(&cfg.sim_dir).join("method2method.json")).unwrap();

        let err = PrepareUseCase::new(cfg.clone()).execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PrepareError>(),
            Some(PrepareError::MissingSimilarityGraph { .. })
        ));
        assert!(!DatasetStore::new(&cfg.data_dir).exists(Split::Train));
    }

    #[test]
    fn test_invalid_train_ratio_rejected() {
        let cfg = PrepareConfig { train_ratio: 1.5, ..PrepareConfig::default() };
        assert!(matches!(cfg.validate(), Err(PrepareError::InvalidConfig { .. })));
        assert!(PrepareConfig::default().validate().is_ok());
    }
}
