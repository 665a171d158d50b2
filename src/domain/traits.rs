// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams the pipeline is built around. The application layer
// only talks to these traits, so a different corpus source or a
// different span-recovery strategy plugs in without touching it.
//
//   CorpusSource  — where a corpus split comes from
//   SpanLocator   — how a char range becomes token coordinates
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use std::ops::Range;

use anyhow::Result;

use crate::domain::corpus::SquadDocument;
use crate::domain::example::{AnswerSpan, Token};

// ─── CorpusSource ─────────────────────────────────────────────────────────────
/// Any component that can produce one corpus split.
///
/// Implementations:
///   - SquadLoader → reads a SQuAD JSON file from disk
pub trait CorpusSource {
    fn load(&self) -> Result<SquadDocument>;
}

// ─── SpanLocator ──────────────────────────────────────────────────────────────
/// Maps a char range `[start, stop)` of a paragraph's raw text to
/// the (sentence, word) coordinates of its first and last token.
///
/// `sentences` is the paragraph already tokenized from `context`.
///
/// Returns:
///   - `Ok(Some(span))` — located
///   - `Ok(None)`       — the range cannot be mapped (skip the example)
///   - `Err(_)`         — the corpus itself is unusable (fatal)
///
/// Implementations:
///   - OffsetLocator   → interval lookup over token char offsets
///   - SentinelLocator → splices marker words and retokenizes
pub trait SpanLocator {
    fn locate(
        &self,
        context:   &str,
        sentences: &[Vec<Token>],
        span:      Range<usize>,
    ) -> Result<Option<AnswerSpan>>;
}
