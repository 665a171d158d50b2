// ============================================================
// Layer 4 — Answer Span Locators
// ============================================================
// A SQuAD answer is annotated as a char range of the raw context:
//
//   context: "Paris is nice. Rome is old."
//   answer:  "Rome is"  answer_start = 15  →  chars [15, 22)
//
// The model needs it as token coordinates of the tokenized
// context instead:
//
//   sentences: [paris is nice .] [rome is old .]
//   start = (1, 0)   stop = (1, 1)   (stop is inclusive)
//
// Two strategies implement the SpanLocator trait:
//
//   OffsetLocator   — every token carries its char range, so the
//                     answer is a plain interval lookup. Cannot
//                     collide with corpus text. Default.
//
//   SentinelLocator — splices two marker words around the answer,
//                     retokenizes the spliced text and looks for
//                     the markers. Kept for parity with datasets
//                     built the old way.
//
// Both answer `Ok(None)` when a range cannot be mapped (empty,
// reversed, past the end of the context, or only whitespace) so the
// ingester can drop that one example and carry on.
//
// Reference: Rust Book §10 (Traits), §18 (Patterns)

use std::ops::Range;

use anyhow::{bail, Result};

use crate::data::tokenizer::{slice_chars, Tokenizer};
use crate::domain::example::{AnswerSpan, Token, TokenCoord};
use crate::domain::traits::SpanLocator;

/// Marker spliced in front of the answer.
pub const START_MARKER: &str = "sstartt";
/// Marker spliced after the answer.
pub const STOP_MARKER: &str = "sstopp";

/// `true` when `[start, stop)` is a non-empty range inside `context`.
fn in_bounds(context: &str, span: &Range<usize>) -> bool {
    span.start < span.end && span.end <= context.chars().count()
}

// ─── OffsetLocator ────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, Default)]
pub struct OffsetLocator;

impl SpanLocator for OffsetLocator {
    fn locate(
        &self,
        context:   &str,
        sentences: &[Vec<Token>],
        span:      Range<usize>,
    ) -> Result<Option<AnswerSpan>> {
        if !in_bounds(context, &span) {
            return Ok(None);
        }

        let mut first: Option<TokenCoord> = None;
        let mut last:  Option<TokenCoord> = None;

        // Tokens are in text order across sentences, so the scan can
        // stop at the first token that starts at or after `stop`.
        'scan: for (s, sent) in sentences.iter().enumerate() {
            for (w, tok) in sent.iter().enumerate() {
                if tok.start >= span.end {
                    break 'scan;
                }
                if tok.end > span.start {
                    first.get_or_insert(TokenCoord::new(s, w));
                    last = Some(TokenCoord::new(s, w));
                }
            }
        }

        Ok(first.zip(last).map(|(start, stop)| AnswerSpan { start, stop }))
    }
}

// ─── SentinelLocator ──────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, Default)]
pub struct SentinelLocator {
    tokenizer: Tokenizer,
}

impl SentinelLocator {
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self { tokenizer }
    }
}

impl SpanLocator for SentinelLocator {
    fn locate(
        &self,
        context:   &str,
        sentences: &[Vec<Token>],
        span:      Range<usize>,
    ) -> Result<Option<AnswerSpan>> {
        // A marker already present in the text would be found before
        // the spliced one and silently give wrong coordinates.
        let lowered = context.to_lowercase();
        if lowered.contains(START_MARKER) || lowered.contains(STOP_MARKER) {
            bail!(
                "context contains a reserved marker word ('{START_MARKER}' or '{STOP_MARKER}'); \
                 choose other markers or use the offsets strategy"
            );
        }
        if !in_bounds(context, &span) {
            return Ok(None);
        }

        let len     = context.chars().count();
        let spliced = format!(
            "{} {} {} {} {}",
            slice_chars(context, 0..span.start),
            START_MARKER,
            slice_chars(context, span.clone()),
            STOP_MARKER,
            slice_chars(context, span.end..len),
        );
        let temp = self.tokenizer.tokenize(&spliced)?;

        let (Some(start_at), Some(stop_at)) =
            (find_first(&temp, START_MARKER), find_first(&temp, STOP_MARKER))
        else {
            bail!("spliced markers vanished during retokenisation");
        };

        // The start marker sits exactly where the answer's first word
        // sits in the unspliced text, unless retokenisation moved a
        // sentence boundary.
        let start_valid = sentences
            .get(start_at.sent)
            .map_or(false, |sent| start_at.word < sent.len());
        if !start_valid {
            return Ok(None);
        }

        // Step back over the stop marker itself, and over the start
        // marker too when both landed in the same sentence. A bare
        // `stop - 1` is off by one there, since the coordinate is read
        // from the spliced text; the extra step corrects that on purpose.
        let shift = 1 + usize::from(start_at.sent == stop_at.sent);
        let stop  = match stop_at.word.checked_sub(shift) {
            Some(word) => TokenCoord::new(stop_at.sent, word),
            None       => last_word_before(sentences, stop_at.sent).unwrap_or(start_at),
        };

        Ok(Some(AnswerSpan { start: start_at, stop: stop.max(start_at) }))
    }
}

/// First (sentence, word) position of `needle`, scanning sentences
/// then words.
fn find_first(sentences: &[Vec<String>], needle: &str) -> Option<TokenCoord> {
    sentences.iter().enumerate().find_map(|(s, sent)| {
        sent.iter().position(|w| w == needle).map(|w| TokenCoord::new(s, w))
    })
}

fn last_word_before(sentences: &[Vec<Token>], sent: usize) -> Option<TokenCoord> {
    let prev = sent.checked_sub(1)?;
    let len  = sentences.get(prev)?.len();
    len.checked_sub(1).map(|w| TokenCoord::new(prev, w))
}

// ─── Answer text check ────────────────────────────────────────────────────────
/// Compare the annotated answer text with the context slice it
/// claims to cover, token for token. A mismatch is only a warning
/// sign in the annotation; it never rejects the example.
pub fn answer_text_matches(
    tokenizer: &Tokenizer,
    context:   &str,
    span:      Range<usize>,
    text:      &str,
) -> Result<bool> {
    let candidate = tokenizer.tokenize(slice_chars(context, span))?;
    let annotated = tokenizer.tokenize(text)?;
    Ok(candidate == annotated)
}
