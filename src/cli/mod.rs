// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `prepro` — turns the corpus into model-ready JSON artifacts
//   2. `stats`  — prints length distributions of one split
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

// Declare the commands submodule
pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, PreproArgs, StatsArgs};

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "squad-prepro",
    version = "0.1.0",
    about = "Preprocess a SQuAD-style QA corpus into id-encoded JSON artifacts."
)]
pub struct Cli {
    /// The subcommand to run (prepro or stats)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Whether the chosen subcommand asked for debug logging.
    pub fn debug(&self) -> bool {
        self.command.debug()
    }

    /// Match on the subcommand and dispatch to the correct use case.
    /// This keeps the CLI layer thin — it only routes, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Prepro(args) => run_prepro(args),
            Commands::Stats(args)  => run_stats(args),
        }
    }
}

/// Handles the `prepro` subcommand.
/// Converts CLI args into a PreproConfig and hands off to Layer 2.
fn run_prepro(args: PreproArgs) -> Result<()> {
    use crate::application::prepro_use_case::PreproUseCase;

    tracing::info!("Preprocessing corpus in: {}", args.source_dir);
    let target = args.target_dir.clone();

    let summary = PreproUseCase::new(args.into())?.execute()?;

    let m = &summary.metadata;
    println!("Preprocessing complete. Artifacts saved to '{target}'.");
    println!(
        "  train: {} questions kept, {} skipped",
        summary.train.questions, summary.train.skipped_questions
    );
    println!(
        "  dev:   {} questions kept, {} skipped",
        summary.dev.questions, summary.dev.skipped_questions
    );
    println!(
        "  vocab: {} known / {} total words, {} chars",
        m.vocab_size, m.all_vocab_size, m.char_vocab_size
    );
    Ok(())
}

/// Handles the `stats` subcommand.
fn run_stats(args: StatsArgs) -> Result<()> {
    use crate::application::stats_use_case::StatsUseCase;

    let stats = StatsUseCase::new(args.into()).execute()?;
    print!("{stats}");
    Ok(())
}
