// ============================================================
// Layer 2 — StatsUseCase
// ============================================================
// Reads one corpus split, tokenizes it, and collects the length
// distributions that matter when choosing the size thresholds:
//
//   sentence length         (words per passage sentence)
//   sentences per paragraph
//   question length         (words per question)
//   word length in passages (chars per word)
//   word length in questions
//
// Nothing is filtered and nothing is written; the result is only
// rendered as text histograms by the CLI.
//
// Reference: Rust Book §8 (Hash Maps), std::collections::BTreeMap

use anyhow::Result;
use std::collections::BTreeMap;
use std::fmt;

use crate::data::{loader::SquadLoader, tokenizer::Tokenizer};
use crate::domain::corpus::SquadDocument;
use crate::domain::dataset::Split;
use crate::domain::traits::CorpusSource;

/// Widest bar printed by `Display`.
const BAR_WIDTH: usize = 40;

#[derive(Debug, Clone)]
pub struct StatsConfig {
    pub source_dir: String,
    pub version:    String,
    pub split:      Split,
}

// ─── Histogram ────────────────────────────────────────────────────────────────
/// Value → number of observations, ordered by value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Histogram {
    counts: BTreeMap<usize, usize>,
}

impl Histogram {
    pub fn add(&mut self, value: usize) {
        *self.counts.entry(value).or_insert(0) += 1;
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    #[cfg(test)]
    pub fn count(&self, value: usize) -> usize {
        self.counts.get(&value).copied().unwrap_or(0)
    }

    pub fn max(&self) -> Option<usize> {
        self.counts.keys().next_back().copied()
    }

    /// Smallest value at or below which `q` of the observations fall.
    pub fn quantile(&self, q: f64) -> Option<usize> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let target = ((total as f64) * q).ceil().max(1.0) as usize;
        let mut seen = 0;
        for (&value, &n) in &self.counts {
            seen += n;
            if seen >= target {
                return Some(value);
            }
        }
        self.max()
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let peak = self.counts.values().copied().max().unwrap_or(0);
        for (value, &n) in &self.counts {
            let width = if peak == 0 { 0 } else { (n * BAR_WIDTH).div_ceil(peak) };
            writeln!(f, "{value:>5} | {:<pad$} {n}", "#".repeat(width), pad = BAR_WIDTH)?;
        }
        Ok(())
    }
}

// ─── CorpusStats ──────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Default)]
pub struct CorpusStats {
    pub sent_size:          Histogram,
    pub num_sents:          Histogram,
    pub ques_size:          Histogram,
    pub passage_word_size:  Histogram,
    pub question_word_size: Histogram,
}

impl CorpusStats {
    pub fn collect(tokenizer: &Tokenizer, doc: &SquadDocument) -> Result<Self> {
        let mut stats = Self::default();

        for para in doc.data.iter().flat_map(|a| &a.paragraphs) {
            let sentences = tokenizer.tokenize(&para.context)?;
            stats.num_sents.add(sentences.len());
            for sent in &sentences {
                stats.sent_size.add(sent.len());
                for word in sent {
                    stats.passage_word_size.add(word.chars().count());
                }
            }

            for qa in &para.qas {
                let question = tokenizer.tokenize_flat(&qa.question)?;
                stats.ques_size.add(question.len());
                for word in &question {
                    stats.question_word_size.add(word.chars().count());
                }
            }
        }
        Ok(stats)
    }

    fn sections(&self) -> [(&'static str, &Histogram); 5] {
        [
            ("sentence size (words)",      &self.sent_size),
            ("sentences per paragraph",    &self.num_sents),
            ("question size (words)",      &self.ques_size),
            ("passage word size (chars)",  &self.passage_word_size),
            ("question word size (chars)", &self.question_word_size),
        ]
    }
}

impl fmt::Display for CorpusStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (title, hist) in self.sections() {
            writeln!(
                f,
                "── {title}: n = {}, max = {}, p99 = {}",
                hist.total(),
                hist.max().unwrap_or(0),
                hist.quantile(0.99).unwrap_or(0)
            )?;
            write!(f, "{hist}")?;
        }
        Ok(())
    }
}

// ─── StatsUseCase ─────────────────────────────────────────────────────────────
pub struct StatsUseCase {
    config: StatsConfig,
}

impl StatsUseCase {
    pub fn new(config: StatsConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<CorpusStats> {
        let cfg = &self.config;
        let doc = SquadLoader::for_split(&cfg.source_dir, cfg.split, &cfg.version).load()?;
        let stats = CorpusStats::collect(&Tokenizer::new(), &doc)?;
        tracing::info!(
            "{} split: {} paragraphs, {} questions",
            cfg.split,
            stats.num_sents.total(),
            stats.ques_size.total()
        );
        Ok(stats)
    }
}
