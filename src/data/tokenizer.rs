// ============================================================
// Layer 4 — Sentence / Word Tokenizer
// ============================================================
// Splits raw text into sentences of lowercase word tokens.
//
// Word boundaries come from the `tokenizers` crate's BERT
// pre-tokenizer: split on whitespace, then isolate every
// punctuation character as its own token.
//
//   "Paris is nice."  →  paris | is | nice | .
//
// Each token keeps the char range it was cut from in the raw text
// (OffsetType::Char). SQuAD answer offsets count chars, so these
// ranges line up with `answer_start` directly.
//
// Sentence boundaries are decided on the token stream. A `.`, `!`
// or `?` closes a sentence when:
//   - it is followed by whitespace or the end of the text
//     ("3.5" and "a.b" stay inside one sentence)
//   - it is not the dot of an abbreviation ("dr.") or of a run
//     of single-letter initials ("u.s.", "j. r. r.")
// A lone letter before a dot ("plan b.", "vitamin c.") is treated
// as a word, so a name with one middle initial does get split.
// Closing quotes/brackets glued to the terminator stay with the
// sentence they close.
//
// Lowercasing happens per token, after the split. None of the
// splitting rules look at letter case, so the result is the same
// as lowercasing first, but the char offsets still point into the
// raw text even for characters whose lowercase form is longer.
//
// Reference: tokenizers crate (pre_tokenizers::bert)
//            Rust Book §8 (Strings), §13 (Iterators)

use std::ops::Range;

use anyhow::Result;
use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
use tokenizers::{OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer};

use crate::domain::example::Token;

/// Words whose trailing dot does not end a sentence.
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "st", "jr", "sr", "vs", "etc",
    "inc", "ltd", "corp", "mt", "ft", "gen", "col", "lt", "sgt",
    "capt", "rev", "approx", "dept", "est", "fig",
];

/// Tokens that close a sentence.
fn is_terminal(text: &str) -> bool {
    matches!(text, "." | "!" | "?")
}

/// Closing punctuation that belongs to the sentence before it.
fn is_closer(text: &str) -> bool {
    matches!(text, "\"" | "'" | ")" | "]" | "}" | "\u{201D}" | "\u{2019}" | "\u{00BB}")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer;

impl Tokenizer {
    pub fn new() -> Self {
        Self
    }

    /// Sentences of lowercase words.
    pub fn tokenize(&self, raw: &str) -> Result<Vec<Vec<String>>> {
        Ok(self
            .tokenize_with_offsets(raw)?
            .into_iter()
            .map(|sent| sent.into_iter().map(|t| t.text).collect())
            .collect())
    }

    /// All words of `raw` as one sequence, ignoring sentence breaks.
    /// Used for questions.
    pub fn tokenize_flat(&self, raw: &str) -> Result<Vec<String>> {
        Ok(self.split_words(raw)?.into_iter().map(|t| t.text).collect())
    }

    /// Sentences of lowercase tokens with their raw-text char ranges.
    pub fn tokenize_with_offsets(&self, raw: &str) -> Result<Vec<Vec<Token>>> {
        Ok(split_sentences(self.split_words(raw)?))
    }

    fn split_words(&self, raw: &str) -> Result<Vec<Token>> {
        let mut pretok = PreTokenizedString::from(raw);
        BertPreTokenizer
            .pre_tokenize(&mut pretok)
            .map_err(|e| anyhow::anyhow!("Pre-tokenisation error: {e}"))?;

        Ok(pretok
            .get_splits(OffsetReferential::Original, OffsetType::Char)
            .into_iter()
            .map(|(piece, (start, end), _)| Token::new(piece.to_lowercase(), start, end))
            .collect())
    }
}

/// Group a flat token stream into sentences.
fn split_sentences(words: Vec<Token>) -> Vec<Vec<Token>> {
    // exclusive end index of every closed sentence
    let mut bounds = Vec::new();
    let mut i = 0;

    while i < words.len() {
        if !is_terminal(&words[i].text) || is_abbreviation_dot(&words, i) {
            i += 1;
            continue;
        }

        // "?!", "...", '."' and friends
        let mut end = i + 1;
        while end < words.len()
            && words[end].start == words[end - 1].end
            && (is_closer(&words[end].text) || is_terminal(&words[end].text))
        {
            end += 1;
        }

        let followed_by_gap = words.get(end).map_or(true, |n| n.start > words[end - 1].end);
        if followed_by_gap {
            bounds.push(end);
        }
        i = end;
    }

    let mut tokens = words.into_iter();
    let mut taken  = 0;
    let mut sentences: Vec<Vec<Token>> = bounds
        .into_iter()
        .map(|end| {
            let sent = tokens.by_ref().take(end - taken).collect();
            taken = end;
            sent
        })
        .collect();

    let rest: Vec<Token> = tokens.collect();
    if !rest.is_empty() {
        sentences.push(rest);
    }
    sentences
}

fn is_letter(tok: &Token) -> bool {
    let mut chars = tok.text.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic())
}

/// True when the dot at `i` is glued to an abbreviation or belongs to
/// a run of at least two initials.
fn is_abbreviation_dot(words: &[Token], i: usize) -> bool {
    if words[i].text != "." || i == 0 {
        return false;
    }
    let prev = &words[i - 1];
    if prev.end != words[i].start {
        return false;
    }
    if ABBREVIATIONS.contains(&prev.text.as_str()) {
        return true;
    }
    if !is_letter(prev) {
        return false;
    }

    let follows_initial = i >= 3
        && is_letter(&words[i - 3])
        && words[i - 2].text == "."
        && words[i - 2].start == words[i - 3].end;
    let next_initial = match (words.get(i + 1), words.get(i + 2)) {
        (Some(letter), Some(dot)) => is_letter(letter) && dot.text == "." && dot.start == letter.end,
        _ => false,
    };
    follows_initial || next_initial
}

/// Char-indexed substring, clamped to the end of `s` like a Python
/// slice.
pub fn slice_chars(s: &str, range: Range<usize>) -> &str {
    let byte_at = |n: usize| s.char_indices().nth(n).map_or(s.len(), |(b, _)| b);
    let start = byte_at(range.start);
    let end   = byte_at(range.end.max(range.start));
    &s[start..end]
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn sents(text: &str) -> Vec<Vec<String>> {
        Tokenizer::new().tokenize(text).unwrap()
    }

    #[test]
    fn test_lowercases_and_isolates_punctuation() {
        assert_eq!(sents("Paris is nice."), vec![vec!["paris", "is", "nice", "."]]);
    }

    #[test]
    fn test_splits_sentences() {
        let out = sents("Paris is nice. What is nice? Paris!");
        assert_eq!(out.len(), 3);
        assert_eq!(out[1], vec!["what", "is", "nice", "?"]);
        assert_eq!(out[2], vec!["paris", "!"]);
    }

    #[test]
    fn test_keeps_decimals_and_abbreviations_together() {
        assert_eq!(sents("It cost 3.5 dollars. Dr. Smith paid.").len(), 2);
        assert_eq!(sents("The U.S. army was there.").len(), 1);
        assert_eq!(sents("J. R. R. Tolkien wrote it.").len(), 1);
    }

    #[test]
    fn test_lone_letter_before_dot_ends_sentence() {
        let out = sents("He chose plan B. Then he left. I saw Vitamin C. It helped.");
        assert_eq!(out.len(), 4);
        assert_eq!(out[0].last().map(String::as_str), Some("."));
        assert_eq!(out[1][0], "then");
        assert_eq!(out[3], vec!["it", "helped", "."]);
    }

    #[test]
    fn test_closing_quote_stays_with_sentence() {
        let out = sents("He said \"stop.\" Then he left.");
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].last().map(String::as_str), Some("\""));
        assert_eq!(out[1][0], "then");
    }

    #[test]
    fn test_offsets_are_char_based() {
        let out = Tokenizer::new().tokenize_with_offsets("Café au lait.").unwrap();
        let au  = &out[0][1];
        assert_eq!(au.text, "au");
        assert_eq!((au.start, au.end), (5, 7));
    }

    #[test]
    fn test_offsets_survive_lowercase_expansion() {
        // 'İ' lowercases to two chars; offsets must still index the raw text
        let raw = "İstanbul is big.";
        let out = Tokenizer::new().tokenize_with_offsets(raw).unwrap();
        let is  = &out[0][1];
        assert_eq!(slice_chars(raw, is.start..is.end), "is");
    }

    #[test]
    fn test_flat_question_ignores_sentence_breaks() {
        let q = Tokenizer::new().tokenize_flat("Who? Where is it?").unwrap();
        assert_eq!(q, vec!["who", "?", "where", "is", "it", "?"]);
    }

    #[test]
    fn test_same_token_count_whole_vs_per_sentence() {
        let raw = "The tower was built in 1889. It is 330 m tall! Is it \
                   still the tallest? No, it is not. Mr. Eiffel designed it.";
        let tok    = Tokenizer::new();
        let whole  = tok.tokenize_with_offsets(raw).unwrap();
        let total: usize = whole.iter().map(Vec::len).sum();

        let mut per_sentence = 0;
        for sent in &whole {
            let (start, end) = (sent[0].start, sent[sent.len() - 1].end);
            let piece = slice_chars(raw, start..end);
            per_sentence += tok.tokenize(piece).unwrap().iter().map(Vec::len).sum::<usize>();
        }
        assert_eq!(total, per_sentence);
        assert_eq!(whole.len(), 5);
    }

    #[test]
    fn test_empty_text_has_no_sentences() {
        assert!(sents("").is_empty());
        assert!(sents("   \n ").is_empty());
    }

    #[test]
    fn test_slice_chars_clamps() {
        assert_eq!(slice_chars("héllo", 1..3), "él");
        assert_eq!(slice_chars("abc", 2..10), "c");
        assert_eq!(slice_chars("abc", 5..9), "");
    }
}
