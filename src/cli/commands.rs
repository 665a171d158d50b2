// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `prepro` and `stats`
// and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing or malformed args
//   - type conversion (string → usize, GloveCorpus, etc.)
//
// Boolean flags take an explicit value (`--debug True`) so
// existing command lines for the reference tool keep working.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{ArgAction, Args, Subcommand};

use crate::application::prepro_use_case::{PreproConfig, SpanStrategy};
use crate::application::stats_use_case::StatsConfig;
use crate::domain::dataset::Split;
use crate::infra::glove::GloveCorpus;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Preprocess the train and dev splits into model-ready artifacts
    Prepro(PreproArgs),

    /// Print length distributions of one split
    Stats(StatsArgs),
}

impl Commands {
    pub fn debug(&self) -> bool {
        match self {
            Commands::Prepro(args) => args.debug,
            Commands::Stats(args)  => args.debug,
        }
    }
}

/// Accepts `True`/`False` (and their lowercase forms).
fn parse_bool(s: &str) -> Result<bool, String> {
    match s {
        "True" | "true"   => Ok(true),
        "False" | "false" => Ok(false),
        other => Err(format!("expected True or False, got '{other}'")),
    }
}

/// All arguments for the `prepro` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct PreproArgs {
    /// Directory holding <split>-v<version>.json
    #[arg(long, default_value = "data/squad")]
    pub source_dir: String,

    /// Directory the artifacts are written to
    #[arg(long, default_value = "data/model/squad")]
    pub target_dir: String,

    /// Directory holding glove.<corpus>.<dim>d.txt
    #[arg(long, default_value = "data/glove")]
    pub glove_dir: String,

    /// Pretrained corpus tier: 6B, 42B, 840B or 2B
    #[arg(long, default_value = "6B")]
    pub glove_corpus: GloveCorpus,

    /// Dimension of the pretrained vectors
    #[arg(long, default_value_t = 100)]
    pub glove_word_size: usize,

    /// Corpus version in the split file names
    #[arg(long, default_value = "1.0")]
    pub version: String,

    /// Minimum training count for a word to keep its vector
    #[arg(long, default_value_t = 100)]
    pub count_th: usize,

    /// Most sentences per paragraph
    #[arg(long, default_value_t = 8)]
    pub para_size_th: usize,

    /// Most words per sentence (and per question)
    #[arg(long, default_value_t = 64)]
    pub sent_size_th: usize,

    /// Longest spelling kept per word, in chars
    #[arg(long, default_value_t = 16)]
    pub word_size_th: usize,

    /// Minimum training count for a char to get its own id
    #[arg(long, default_value_t = 500)]
    pub char_count_th: usize,

    /// Ingest only the first article of each split and log at debug level
    #[arg(long, default_value = "False", action = ArgAction::Set, value_parser = parse_bool)]
    pub debug: bool,

    /// How answer spans are mapped to tokens: offsets or sentinel
    #[arg(long, default_value = "offsets")]
    pub span_strategy: SpanStrategy,

    /// Seed for the placeholder vectors of <NULL> and <UNK>
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Convert CLI PreproArgs into the application-layer PreproConfig.
/// This is the boundary between Layer 1 and Layer 2 —
/// the application layer never sees clap types.
impl From<PreproArgs> for PreproConfig {
    fn from(a: PreproArgs) -> Self {
        PreproConfig {
            source_dir:      a.source_dir,
            target_dir:      a.target_dir,
            glove_dir:       a.glove_dir,
            glove_corpus:    a.glove_corpus,
            glove_word_size: a.glove_word_size,
            version:         a.version,
            count_th:        a.count_th,
            para_size_th:    a.para_size_th,
            sent_size_th:    a.sent_size_th,
            word_size_th:    a.word_size_th,
            char_count_th:   a.char_count_th,
            debug:           a.debug,
            span_strategy:   a.span_strategy,
            seed:            a.seed,
        }
    }
}

/// All arguments for the `stats` command
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Directory holding <split>-v<version>.json
    #[arg(long, default_value = "data/squad")]
    pub source_dir: String,

    /// Corpus version in the split file names
    #[arg(long, default_value = "1.0")]
    pub version: String,

    /// Which split to inspect: train or dev
    #[arg(long, default_value = "train")]
    pub split: Split,

    /// Log at debug level
    #[arg(long, default_value = "False", action = ArgAction::Set, value_parser = parse_bool)]
    pub debug: bool,
}

impl From<StatsArgs> for StatsConfig {
    fn from(a: StatsArgs) -> Self {
        StatsConfig {
            source_dir: a.source_dir,
            version:    a.version,
            split:      a.split,
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    fn prepro(args: &[&str]) -> Result<PreproConfig, clap::Error> {
        let argv = ["squad-prepro", "prepro"].iter().chain(args).copied();
        match Cli::try_parse_from(argv)?.command {
            Commands::Prepro(a) => Ok(a.into()),
            Commands::Stats(_)  => unreachable!(),
        }
    }

    #[test]
    fn test_defaults_match_config_defaults() {
        assert_eq!(prepro(&[]).unwrap(), PreproConfig::default());
    }

    #[test]
    fn test_flags() {
        let cfg = prepro(&[
            "--glove-corpus", "840B",
            "--glove-word-size", "300",
            "--debug", "True",
            "--span-strategy", "sentinel",
            "--seed", "5",
        ])
        .unwrap();
        assert_eq!(cfg.glove_corpus, GloveCorpus::CommonCrawl840B);
        assert_eq!(cfg.glove_word_size, 300);
        assert!(cfg.debug);
        assert_eq!(cfg.span_strategy, SpanStrategy::Sentinel);
        assert_eq!(cfg.seed, Some(5));
    }

    #[test]
    fn test_bad_values_are_rejected() {
        assert!(prepro(&["--glove-corpus", "7B"]).is_err());
        assert!(prepro(&["--debug", "yes"]).is_err());
        assert!(prepro(&["--count-th", "-1"]).is_err());
    }

    #[test]
    fn test_stats_args() {
        let cli = Cli::try_parse_from(["squad-prepro", "stats", "--split", "dev"]).unwrap();
        let Commands::Stats(args) = cli.command else { panic!("expected stats") };
        let cfg: StatsConfig = args.into();
        assert_eq!(cfg.split, Split::Dev);
        assert_eq!(cfg.version, "1.0");
    }
}
