// ============================================================
// Layer 2 — PreproUseCase
// ============================================================
// Orchestrates the full preprocessing pipeline in order:
//
//   Step 1: Validate the configuration        (Layer 2)
//   Step 2: Load + ingest the train split     (Layer 4 - data)
//   Step 3: Load + ingest the dev split       (Layer 4 - data)
//   Step 4: Open the GloVe file               (Layer 6 - infra)
//   Step 5: Build the vocabulary              (Layer 5 - vocab)
//   Step 6: Encode both splits                (Layer 5 - vocab)
//   Step 7: Merge splits + size summary       (Layer 4 - data)
//   Step 8: Write artifacts + config          (Layer 6 - infra)
//
// Every fatal problem (missing file, malformed JSON or vector,
// marker collision, encoding miss) aborts the run before Step 8
// touches the target directory.
//
// Reference: Rust Book §13 (Iterators and Closures)

use anyhow::{bail, Result};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::data::{
    ingester::{CorpusIngester, IngestLimits, IngestStats},
    loader::SquadLoader,
    merger::{merge, summarize},
    span_locator::{OffsetLocator, SentinelLocator},
    tokenizer::Tokenizer,
};
use crate::domain::dataset::{Metadata, PreprocessedDataset, Split};
use crate::domain::traits::{CorpusSource, SpanLocator};
use crate::infra::{
    artifact_store::ArtifactStore,
    glove::{GloveCorpus, GloveReader},
};
use crate::vocab::{
    builder::{VocabBuilder, VocabParams},
    encoder::encode,
};

// ─── SpanStrategy ─────────────────────────────────────────────────────────────
/// How answer char spans are turned into token coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanStrategy {
    /// Look the span up in the tokens' char offsets
    #[default]
    Offsets,
    /// Splice marker words into the context and re-tokenize
    Sentinel,
}

impl SpanStrategy {
    fn locator(self, tokenizer: Tokenizer) -> Box<dyn SpanLocator> {
        match self {
            SpanStrategy::Offsets  => Box::new(OffsetLocator),
            SpanStrategy::Sentinel => Box::new(SentinelLocator::new(tokenizer)),
        }
    }
}

impl fmt::Display for SpanStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpanStrategy::Offsets  => f.write_str("offsets"),
            SpanStrategy::Sentinel => f.write_str("sentinel"),
        }
    }
}

impl FromStr for SpanStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "offsets"  => Ok(SpanStrategy::Offsets),
            "sentinel" => Ok(SpanStrategy::Sentinel),
            other      => bail!("unknown span strategy '{other}' (expected offsets or sentinel)"),
        }
    }
}

// ─── Preprocessing Configuration ─────────────────────────────────────────────
// All settings of a preprocessing run.
// Serialisable so it can be written next to the artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreproConfig {
    pub source_dir:      String,
    pub target_dir:      String,
    pub glove_dir:       String,
    pub glove_corpus:    GloveCorpus,
    pub glove_word_size: usize,
    pub version:         String,
    pub count_th:        usize,
    pub para_size_th:    usize,
    pub sent_size_th:    usize,
    pub word_size_th:    usize,
    pub char_count_th:   usize,
    pub debug:           bool,
    pub span_strategy:   SpanStrategy,
    pub seed:            Option<u64>,
}

impl Default for PreproConfig {
    fn default() -> Self {
        Self {
            source_dir:      "data/squad".to_string(),
            target_dir:      "data/model/squad".to_string(),
            glove_dir:       "data/glove".to_string(),
            glove_corpus:    GloveCorpus::Wiki6B,
            glove_word_size: 100,
            version:         "1.0".to_string(),
            count_th:        100,
            para_size_th:    8,
            sent_size_th:    64,
            word_size_th:    16,
            char_count_th:   500,
            debug:           false,
            span_strategy:   SpanStrategy::Offsets,
            seed:            None,
        }
    }
}

impl PreproConfig {
    /// Reject settings that could only produce an empty or
    /// meaningless dataset.
    pub fn validate(&self) -> Result<()> {
        let thresholds = [
            ("count_th",      self.count_th),
            ("para_size_th",  self.para_size_th),
            ("sent_size_th",  self.sent_size_th),
            ("word_size_th",  self.word_size_th),
            ("char_count_th", self.char_count_th),
        ];
        for (name, value) in thresholds {
            if value == 0 {
                bail!("{name} must be at least 1");
            }
        }
        if self.glove_word_size == 0 {
            bail!("glove_word_size must be at least 1");
        }
        if self.version.trim().is_empty() {
            bail!("version must not be empty");
        }
        Ok(())
    }

    fn limits(&self) -> IngestLimits {
        IngestLimits {
            para_size_th:       self.para_size_th,
            sent_size_th:       self.sent_size_th,
            first_article_only: self.debug,
        }
    }

    fn vocab_params(&self) -> VocabParams {
        VocabParams {
            count_th:      self.count_th,
            char_count_th: self.char_count_th,
            word_size_th:  self.word_size_th,
        }
    }
}

/// What a finished run reports back to the CLI.
#[derive(Debug, Clone)]
pub struct PreproSummary {
    pub train:    IngestStats,
    pub dev:      IngestStats,
    pub metadata: Metadata,
}

// ─── PreproUseCase ────────────────────────────────────────────────────────────
// Owns the config and runs the full preprocessing pipeline.
pub struct PreproUseCase {
    config: PreproConfig,
}

impl PreproUseCase {
    /// Create a new PreproUseCase, rejecting an invalid config
    /// before any file is touched.
    pub fn new(config: PreproConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Execute the full preprocessing pipeline end to end
    pub fn execute(&self) -> Result<PreproSummary> {
        let cfg = &self.config;

        // ── Steps 2–3: Ingest both splits ─────────────────────────────────────
        // Dev paragraph refs are shifted past the training articles
        // so they stay valid once the splits are concatenated.
        let tokenizer = Tokenizer::new();
        let ingester  = CorpusIngester::new(
            tokenizer,
            cfg.span_strategy.locator(tokenizer),
            cfg.limits(),
        );

        tracing::info!("Ingesting train split ({} spans)", cfg.span_strategy);
        let train_doc = SquadLoader::for_split(&cfg.source_dir, Split::Train, &cfg.version).load()?;
        let train     = ingester.ingest(&train_doc, 0)?;
        drop(train_doc);

        tracing::info!("Ingesting dev split ({} spans)", cfg.span_strategy);
        let dev_doc = SquadLoader::for_split(&cfg.source_dir, Split::Dev, &cfg.version).load()?;
        let dev     = ingester.ingest(&dev_doc, train.data.passages.article_count())?;
        drop(dev_doc);

        // ── Steps 4–5: Vocabulary ─────────────────────────────────────────────
        let glove   = GloveReader::open(&cfg.glove_dir, cfg.glove_corpus, cfg.glove_word_size)?;
        let mut rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None       => StdRng::from_entropy(),
        };
        let vocab = VocabBuilder::new(cfg.vocab_params())
            .build(&train.data, &dev.data, glove, &mut rng)?;

        // ── Step 6: Encode ────────────────────────────────────────────────────
        let train_ids = encode(&vocab.words.word2idx, train.data)?;
        let dev_ids   = encode(&vocab.words.word2idx, dev.data)?;

        // ── Step 7: Merge ─────────────────────────────────────────────────────
        let merged   = merge(Split::ORDER.into_iter().zip([train_ids, dev_ids]));
        let metadata = summarize(&merged, &vocab.words, vocab.char2idx.len());
        tracing::info!(
            "{} examples, {} articles, vocab {} / {}",
            merged.batched.len(),
            merged.passages.article_count(),
            metadata.vocab_size,
            metadata.all_vocab_size
        );

        // ── Step 8: Persist ───────────────────────────────────────────────────
        let dataset = PreprocessedDataset {
            ranges:    merged.ranges,
            metadata:  metadata.clone(),
            passages:  merged.passages,
            batched:   merged.batched,
            word2idx:  vocab.words.word2idx,
            emb_mat:   vocab.words.emb_mat,
            char2idx:  vocab.char2idx,
            char_idxs: vocab.words.char_idxs,
        };
        ArtifactStore::new(&cfg.target_dir).save(&dataset, cfg)?;

        Ok(PreproSummary { train: train.stats, dev: dev.stats, metadata })
    }
}
