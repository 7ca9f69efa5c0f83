// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `prepare` — generates train.json and test.json
//   2. `inspect` — prints row/label counts of generated tables
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, InspectArgs, PrepareArgs};

#[derive(Parser, Debug)]
#[command(
    name = "bugloc-dataset",
    version = "0.1.0",
    about = "Generate bug-report → method localisation datasets from a project's fix history."
)]
pub struct Cli {
    /// The subcommand to run (prepare or inspect)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Prepare(args) => run_prepare(args),
            Commands::Inspect(args) => run_inspect(args),
        }
    }
}

fn run_prepare(args: PrepareArgs) -> Result<()> {
    use crate::application::prepare_use_case::PrepareUseCase;

    tracing::info!("Preparing dataset from '{}'", args.project_csv);

    let data_dir = args.data_dir.clone();
    let stats    = PrepareUseCase::new(args.into()).execute()?;

    if stats.is_empty() {
        println!("Nothing to do: train and test tables already exist in '{data_dir}'.");
    }
    for s in &stats {
        println!(
            "{}: {} rows ({} positive, {} negative, {} oversampled) from {} reports, {} skipped",
            s.split,
            s.total_rows(),
            s.positive_rows,
            s.negative_rows,
            s.oversampled_rows,
            s.reports,
            s.skipped_reports,
        );
    }
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    use crate::application::inspect_use_case::InspectUseCase;

    let inspect   = InspectUseCase::new(&args.data_dir);
    let summaries = inspect.summarize_all()?;
    if summaries.is_empty() {
        println!("No tables found in '{}'. Have you run 'prepare' first?", args.data_dir);
        return Ok(());
    }

    println!("{:<8}{:>12}{:>12}{:>12}{:>10}", "split", "rows", "positive", "negative", "reports");
    for s in summaries {
        println!(
            "{:<8}{:>12}{:>12}{:>12}{:>10}",
            s.split.name(),
            s.rows,
            s.positives,
            s.negatives,
            s.reports
        );
    }

    match inspect.config() {
        Ok(cfg) => println!(
            "\nGenerated from '{}' with train_ratio={}, wrong_k={}, seed={}",
            cfg.project_csv, cfg.train_ratio, cfg.wrong_k, cfg.seed
        ),
        Err(e) => tracing::warn!("No run configuration found: {e:#}"),
    }
    Ok(())
}
