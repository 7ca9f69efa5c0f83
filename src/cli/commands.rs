// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `prepare` and `inspect`
// and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use crate::application::prepare_use_case::PrepareConfig;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the train and test feature tables
    Prepare(PrepareArgs),

    /// Summarise previously generated tables
    Inspect(InspectArgs),
}

/// All arguments for the `prepare` command.
#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Bug-report table (summary, description, bug_id, commit_id, method, commit_time)
    #[arg(long, default_value = "data/reports.csv")]
    pub project_csv: String,

    /// Directory of per-commit code-block files (<commit_id>.json)
    #[arg(long, default_value = "data/blocks")]
    pub block_dir: String,

    /// Directory of the similarity and call graphs
    #[arg(long, default_value = "data/similarity")]
    pub sim_dir: String,

    /// Output directory for tables, vocabulary, config and stats
    #[arg(long, default_value = "data/prepared")]
    pub data_dir: String,

    /// Fraction of reports (from the top of the table) used for training
    #[arg(long, default_value_t = 0.8)]
    pub train_ratio: f64,

    /// Random negatives per training report, and extra copies
    /// of every training positive
    #[arg(long, default_value_t = 300)]
    pub wrong_k: usize,

    /// Most similar prior reports used for the cfs score
    #[arg(long, default_value_t = 50)]
    pub neighbors: usize,

    /// Related methods attached to a short method
    #[arg(long, default_value_t = 10)]
    pub expand_k: usize,

    /// Methods with at most this many code tokens are expanded
    #[arg(long, default_value_t = 5)]
    pub short_method_len: usize,

    /// Vocabulary size cap
    #[arg(long, default_value_t = 5000)]
    pub max_vocab: usize,

    /// Minimum corpus frequency of a vocabulary token
    #[arg(long, default_value_t = 5)]
    pub min_count: usize,

    /// Seed for negative sampling and the oversampling shuffle
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Skip commit-similarity propagation in the cfs score
    #[arg(long)]
    pub no_commit_similarity: bool,

    /// Skip method-similarity propagation in the cfs score
    #[arg(long)]
    pub no_method_similarity: bool,
}

/// Convert CLI PrepareArgs into the application-layer PrepareConfig.
/// The application layer never sees clap types.
impl From<PrepareArgs> for PrepareConfig {
    fn from(a: PrepareArgs) -> Self {
        PrepareConfig {
            project_csv:           a.project_csv,
            block_dir:             a.block_dir,
            sim_dir:               a.sim_dir,
            data_dir:              a.data_dir,
            train_ratio:           a.train_ratio,
            wrong_k:               a.wrong_k,
            neighbors:             a.neighbors,
            expand_k:              a.expand_k,
            short_method_len:      a.short_method_len,
            max_vocab:             a.max_vocab,
            min_count:             a.min_count,
            seed:                  a.seed,
            use_commit_similarity: !a.no_commit_similarity,
            use_method_similarity: !a.no_method_similarity,
        }
    }
}

/// All arguments for the `inspect` command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Directory the tables were written to
    #[arg(long, default_value = "data/prepared")]
    pub data_dir: String,
}
