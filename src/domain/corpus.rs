// ============================================================
// Layer 3 — Raw Corpus Domain Types
// ============================================================
// The on-disk shape of one SQuAD-style corpus split:
//
//   { data: [ { paragraphs: [ { context, qas: [
//         { id, question, answers: [ { text, answer_start } ] }
//   ] } ] } ] }
//
// Only the fields the pipeline reads are modelled. serde ignores
// everything else (titles, "version", "is_impossible", ...), so
// both v1.1 and v2.0 files deserialize into the same structs.
//
// `answer_start` counts Unicode scalar values (chars), not bytes.
//
// Reference: Rust Book §5 (Structs)
//            serde documentation (derive, default)

use serde::{Deserialize, Serialize};

/// A whole corpus split as read from disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SquadDocument {
    pub data: Vec<SquadArticle>,
}

/// One article — an ordered list of paragraphs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SquadArticle {
    #[serde(default)]
    pub paragraphs: Vec<SquadParagraph>,
}

/// A context passage together with its question/answer groups.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SquadParagraph {
    pub context: String,

    #[serde(default)]
    pub qas: Vec<SquadQa>,
}

/// One question. Unanswerable (v2.0) questions carry no answers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SquadQa {
    pub id:       String,
    pub question: String,

    #[serde(default)]
    pub answers:  Vec<SquadAnswer>,
}

/// An annotated answer: its text and the char offset where it starts
/// inside the paragraph context.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SquadAnswer {
    pub text:         String,
    pub answer_start: usize,
}

impl SquadAnswer {
    /// Half-open char range `[start, stop)` the answer covers.
    /// Saturates, so an absurd `answer_start` yields an empty range
    /// that the span locators reject.
    pub fn char_range(&self) -> std::ops::Range<usize> {
        self.answer_start..self.answer_start.saturating_add(self.text.chars().count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_v2_fields_and_ignores_extras() {
        let json = r#"{
            "version": "v2.0",
            "data": [{
                "title": "Paris",
                "paragraphs": [{
                    "context": "Paris is nice.",
                    "qas": [
                        {"id": "q1", "question": "What is nice?",
                         "answers": [{"text": "Paris", "answer_start": 0}]},
                        {"id": "q2", "question": "Why?", "answers": [],
                         "is_impossible": true}
                    ]
                }]
            }]
        }"#;

        let doc: SquadDocument = serde_json::from_str(json).unwrap();
        let para = &doc.data[0].paragraphs[0];
        assert_eq!(para.qas.len(), 2);
        assert_eq!(para.qas[0].answers[0].char_range(), 0..5);
        assert!(para.qas[1].answers.is_empty());
    }

    #[test]
    fn test_char_range_counts_chars_not_bytes() {
        let a = SquadAnswer { text: "café".into(), answer_start: 3 };
        assert_eq!(a.char_range(), 3..7);
    }

    #[test]
    fn test_char_range_saturates_on_huge_offsets() {
        let a = SquadAnswer { text: "Paris".into(), answer_start: usize::MAX - 2 };
        let r = a.char_range();
        assert_eq!(r, usize::MAX - 2..usize::MAX);

        let b = SquadAnswer { text: "Paris".into(), answer_start: usize::MAX };
        assert!(b.char_range().is_empty());
    }
}
