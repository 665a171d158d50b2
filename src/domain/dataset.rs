// ============================================================
// Layer 3 — Preprocessed Dataset (the output artifacts)
// ============================================================
// The fully numeric dataset handed to the model. Each field maps
// to one JSON artifact written by the ArtifactStore:
//
//   ranges    → mode2idxs.json   split → [start, end) example range
//   metadata  → metadata.json    size summary
//   passages  → shared.json      { "X": word ids }
//   batched   → batched.json     columnar example records
//   word2idx  → word2idx.json    word → id
//   emb_mat   → param.json       { "emb_mat": [[f32]] }
//   char2idx  → char2idx.json    char → id
//   char_idxs → char_idxs.json   word id → padded char ids
//
// Reference: Rust Book §5 (Structs)
//            serde documentation (rename, custom Serialize)

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::domain::example::{Example, Passages};
use crate::domain::index_map::IndexBijection;

// ─── Split ────────────────────────────────────────────────────────────────────
/// A named partition of the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    Train,
    Dev,
}

impl Split {
    /// Fixed merge order: training before dev.
    pub const ORDER: [Split; 2] = [Split::Train, Split::Dev];

    pub fn name(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Dev   => "dev",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Split {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "train" => Ok(Split::Train),
            "dev"   => Ok(Split::Dev),
            other   => anyhow::bail!("unknown split '{other}' (expected 'train' or 'dev')"),
        }
    }
}

// ─── IndexRange / SplitRanges ─────────────────────────────────────────────────
/// Half-open range `[start, end)` of merged example indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRange {
    pub start: usize,
    pub end:   usize,
}

impl IndexRange {
    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Split → range mapping, in merge order. Ranges are disjoint and
/// together cover `[0, total)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitRanges {
    entries: Vec<(Split, IndexRange)>,
}

impl SplitRanges {
    /// Append the next split's range, starting where the last ended.
    pub fn push(&mut self, split: Split, len: usize) -> IndexRange {
        let start = self.total();
        let range = IndexRange { start, end: start + len };
        self.entries.push((split, range));
        range
    }

    #[cfg(test)]
    pub fn get(&self, split: Split) -> Option<IndexRange> {
        self.entries.iter().find(|(s, _)| *s == split).map(|(_, r)| *r)
    }

    pub fn total(&self) -> usize {
        self.entries.last().map_or(0, |(_, r)| r.end)
    }
}

impl Serialize for SplitRanges {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(s, r)| (s.name(), r)))
    }
}

// ─── Metadata ─────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Longest sentence, in words
    pub max_sent_size:   usize,
    /// Most sentences in one paragraph
    pub max_num_sents:   usize,
    /// Known vocabulary size (= embedding matrix rows)
    pub vocab_size:      usize,
    /// Known + unknown words
    pub all_vocab_size:  usize,
    pub char_vocab_size: usize,
    pub max_ques_size:   usize,
    /// Width of every char_idxs row
    pub max_word_size:   usize,
    pub word_vec_size:   usize,
}

// ─── BatchedExamples ──────────────────────────────────────────────────────────
/// Example records stored column-wise, one entry per example in
/// every column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchedExamples {
    /// (article index, paragraph index) into `X`
    #[serde(rename = "*X")]
    pub refs:      Vec<[usize; 2]>,

    /// Encoded question words
    #[serde(rename = "Q")]
    pub questions: Vec<Vec<usize>>,

    /// Answer start (sentence index, word index)
    #[serde(rename = "Y")]
    pub starts:    Vec<[usize; 2]>,

    pub ids:       Vec<String>,
}

impl BatchedExamples {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn push(&mut self, example: Example<usize>) {
        self.refs.push([example.reference.article, example.reference.paragraph]);
        self.starts.push([example.answer.start.sent, example.answer.start.word]);
        self.questions.push(example.question);
        self.ids.push(example.id);
    }
}

impl FromIterator<Example<usize>> for BatchedExamples {
    fn from_iter<I: IntoIterator<Item = Example<usize>>>(iter: I) -> Self {
        let mut batched = Self::default();
        for example in iter {
            batched.push(example);
        }
        batched
    }
}

// ─── EmbeddingMatrix ──────────────────────────────────────────────────────────
/// Rows indexed by known-word id. Serializes as `{ "emb_mat": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingMatrix {
    pub emb_mat: Vec<Vec<f32>>,
}

impl EmbeddingMatrix {
    pub fn rows(&self) -> usize {
        self.emb_mat.len()
    }

    pub fn dim(&self) -> usize {
        self.emb_mat.first().map_or(0, Vec::len)
    }
}

// ─── PreprocessedDataset ──────────────────────────────────────────────────────
/// Every artifact of one pipeline run.
#[derive(Debug, Clone)]
pub struct PreprocessedDataset {
    pub ranges:    SplitRanges,
    pub metadata:  Metadata,
    pub passages:  Passages<usize>,
    pub batched:   BatchedExamples,
    pub word2idx:  IndexBijection<String>,
    pub emb_mat:   EmbeddingMatrix,
    pub char2idx:  IndexBijection<String>,
    pub char_idxs: Vec<Vec<usize>>,
}
