// ============================================================
// Layer 3 — Passages and Example Records
// ============================================================
// The tokenized view of a corpus split:
//
//   Passages   articles → paragraphs → sentences → words
//   Example    one retained (paragraph, question, first answer)
//
// Both are generic over the word type `T`:
//   - `String` while ingesting and building the vocabulary
//   - `usize`  after the encoder has replaced every word by its id
//
// An example never copies its paragraph. It points at it through a
// `ParagraphRef` (article index, paragraph index) into the passage
// collection, so a paragraph with ten questions is stored once.
//
// Reference: Rust Book §10 (Generic Data Types)
//            Rust Book §13 (Iterators)

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub type Sentence<T>  = Vec<T>;
pub type Paragraph<T> = Vec<Sentence<T>>;
pub type Article<T>   = Vec<Paragraph<T>>;

// ─── Token ────────────────────────────────────────────────────────────────────
/// A lowercased word together with the half-open char range
/// `[start, end)` it was cut from in the raw (not lowercased) text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text:  String,
    pub start: usize,
    pub end:   usize,
}

impl Token {
    pub fn new(text: impl Into<String>, start: usize, end: usize) -> Self {
        Self { text: text.into(), start, end }
    }
}

// ─── Coordinates ──────────────────────────────────────────────────────────────
/// (sentence index, word index) inside one tokenized paragraph.
/// Orders by sentence first, then word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenCoord {
    pub sent: usize,
    pub word: usize,
}

impl TokenCoord {
    pub fn new(sent: usize, word: usize) -> Self {
        Self { sent, word }
    }
}

/// Token coordinates of an answer: its first word and its last
/// word (inclusive). Only `start` is persisted; `stop` is kept for
/// diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerSpan {
    pub start: TokenCoord,
    pub stop:  TokenCoord,
}

/// Where an example's paragraph lives in the passage collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphRef {
    pub article:   usize,
    pub paragraph: usize,
}

// ─── Example ──────────────────────────────────────────────────────────────────
/// One training/evaluation record.
#[derive(Debug, Clone, PartialEq)]
pub struct Example<T> {
    pub reference: ParagraphRef,
    pub question:  Vec<T>,
    pub answer:    AnswerSpan,
    pub id:        String,
}

impl<T> Example<T> {
    /// Rewrite every question word, keeping everything else.
    pub fn try_map<U>(self, mut f: impl FnMut(T) -> Result<U>) -> Result<Example<U>> {
        let question = self
            .question
            .into_iter()
            .map(&mut f)
            .collect::<Result<Vec<U>>>()?;

        Ok(Example {
            reference: self.reference,
            question,
            answer:    self.answer,
            id:        self.id,
        })
    }
}

// ─── Passages ─────────────────────────────────────────────────────────────────
/// The passage collection `X`. Serializes as `{ "X": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passages<T> {
    #[serde(rename = "X")]
    pub articles: Vec<Article<T>>,
}

impl<T> Default for Passages<T> {
    fn default() -> Self {
        Self { articles: Vec::new() }
    }
}

impl<T> Passages<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn article_count(&self) -> usize {
        self.articles.len()
    }

    pub fn paragraph_count(&self) -> usize {
        self.articles.iter().map(Vec::len).sum()
    }

    /// Every paragraph in order, across all articles.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph<T>> {
        self.articles.iter().flatten()
    }

    /// Every sentence in order.
    pub fn sentences(&self) -> impl Iterator<Item = &Sentence<T>> {
        self.paragraphs().flatten()
    }

    /// Every word in order.
    pub fn words(&self) -> impl Iterator<Item = &T> {
        self.sentences().flatten()
    }

    /// Look up the paragraph an example refers to.
    #[cfg(test)]
    pub fn paragraph(&self, r: ParagraphRef) -> Option<&Paragraph<T>> {
        self.articles.get(r.article)?.get(r.paragraph)
    }

    /// Append another collection's articles after ours.
    pub fn append(&mut self, other: Passages<T>) {
        self.articles.extend(other.articles);
    }

    /// Rewrite every word, keeping the nesting intact.
    pub fn try_map<U>(self, mut f: impl FnMut(T) -> Result<U>) -> Result<Passages<U>> {
        let mut articles = Vec::with_capacity(self.articles.len());
        for article in self.articles {
            let mut paras = Vec::with_capacity(article.len());
            for para in article {
                let mut sents = Vec::with_capacity(para.len());
                for sent in para {
                    sents.push(sent.into_iter().map(&mut f).collect::<Result<Vec<U>>>()?);
                }
                paras.push(sents);
            }
            articles.push(paras);
        }
        Ok(Passages { articles })
    }
}

// ─── SplitData ────────────────────────────────────────────────────────────────
/// Everything ingested from one split. Handed by value from the
/// ingester to the vocabulary builder and on to the encoder.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitData<T> {
    pub passages: Passages<T>,
    pub examples: Vec<Example<T>>,
}

impl<T> Default for SplitData<T> {
    fn default() -> Self {
        Self { passages: Passages::new(), examples: Vec::new() }
    }
}

impl<T> SplitData<T> {
    /// Passage words followed by question words.
    pub fn words(&self) -> impl Iterator<Item = &T> {
        self.passages
            .words()
            .chain(self.examples.iter().flat_map(|e| e.question.iter()))
    }

    pub fn try_map<U>(self, mut f: impl FnMut(T) -> Result<U>) -> Result<SplitData<U>> {
        let passages = self.passages.try_map(&mut f)?;
        let examples = self
            .examples
            .into_iter()
            .map(|e| e.try_map(&mut f))
            .collect::<Result<Vec<_>>>()?;
        Ok(SplitData { passages, examples })
    }
}
