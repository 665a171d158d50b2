// ============================================================
// Layer 4 — Corpus Ingester
// ============================================================
// Turns one parsed corpus split into passages + example records.
//
// For every article, for every paragraph:
//
//   1. Tokenize the context into sentences (with char offsets).
//   2. Size filter — skip the whole paragraph, and count all of
//      its questions as skipped, when it has
//        - no sentences at all
//        - more than `para_size_th` sentences
//        - a sentence longer than `sent_size_th` words
//   3. For every question:
//        - tokenize; skip if longer than `sent_size_th` words
//        - take the FIRST answer only; skip unanswerable questions
//        - compare the answer text with the context slice it
//          covers (mismatch is only counted)
//        - locate the answer's token coordinates; skip on failure
//        - record Example { paragraph ref, question, span, id }
//   4. Store the paragraph's words once in the passage collection.
//
// A paragraph that survives the size filter is stored even when
// none of its questions does, so paragraph indices only depend on
// the size filter.
//
// Article indices in paragraph refs are shifted by `article_offset`
// so refs from the dev split point past the training articles in
// the merged collection.
//
// Reference: Rust Book §8 (Vectors), §9 (Error Handling)

use anyhow::Result;

use crate::data::span_locator::answer_text_matches;
use crate::data::tokenizer::Tokenizer;
use crate::domain::corpus::SquadDocument;
use crate::domain::example::{Article, Example, Paragraph, ParagraphRef, SplitData, Token};
use crate::domain::traits::SpanLocator;

/// Size filters applied while ingesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestLimits {
    /// Most sentences a paragraph may have
    pub para_size_th:       usize,
    /// Most words a sentence or question may have
    pub sent_size_th:       usize,
    /// Stop after the first article (quick debugging runs)
    pub first_article_only: bool,
}

/// Diagnostic counters. Logged, never used downstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub articles:            usize,
    pub paragraphs:          usize,
    pub questions:           usize,
    pub skipped_questions:   usize,
    pub invalid_annotations: usize,
    pub mismatches:          usize,
}

/// Result of ingesting one split.
#[derive(Debug, Clone)]
pub struct IngestedSplit {
    pub data:  SplitData<String>,
    pub stats: IngestStats,
}

pub struct CorpusIngester {
    tokenizer: Tokenizer,
    locator:   Box<dyn SpanLocator>,
    limits:    IngestLimits,
}

impl CorpusIngester {
    pub fn new(tokenizer: Tokenizer, locator: Box<dyn SpanLocator>, limits: IngestLimits) -> Self {
        Self { tokenizer, locator, limits }
    }

    pub fn ingest(&self, doc: &SquadDocument, article_offset: usize) -> Result<IngestedSplit> {
        let mut data  = SplitData::<String>::default();
        let mut stats = IngestStats::default();

        let articles = if self.limits.first_article_only {
            &doc.data[..doc.data.len().min(1)]
        } else {
            &doc.data[..]
        };

        for (article_idx, article) in articles.iter().enumerate() {
            let mut kept: Article<String> = Vec::new();

            for para in &article.paragraphs {
                let sentences = self.tokenizer.tokenize_with_offsets(&para.context)?;

                if let Some(reason) = self.oversized(&sentences) {
                    tracing::debug!("Skipping paragraph with {reason}");
                    stats.skipped_questions += para.qas.len();
                    continue;
                }

                let reference = ParagraphRef {
                    article:   article_idx + article_offset,
                    paragraph: kept.len(),
                };

                for qa in &para.qas {
                    let question = self.tokenizer.tokenize_flat(&qa.question)?;
                    if question.len() > self.limits.sent_size_th {
                        tracing::debug!("Skipping question with {} words", question.len());
                        stats.skipped_questions += 1;
                        continue;
                    }

                    // Only the first annotated answer is kept.
                    let Some(answer) = qa.answers.first() else {
                        tracing::debug!("Skipping qa id {}: no answer", qa.id);
                        stats.skipped_questions += 1;
                        continue;
                    };
                    let range = answer.char_range();

                    if !answer_text_matches(&self.tokenizer, &para.context, range.clone(), &answer.text)? {
                        tracing::debug!("Mismatching answer found for qa id {}: '{}'", qa.id, answer.text);
                        stats.mismatches += 1;
                    }

                    match self.locator.locate(&para.context, &sentences, range)? {
                        Some(span) => data.examples.push(Example {
                            reference,
                            question,
                            answer: span,
                            id:     qa.id.clone(),
                        }),
                        None => {
                            tracing::warn!("Skipping qa id {}: invalid answer annotation", qa.id);
                            stats.invalid_annotations += 1;
                            stats.skipped_questions   += 1;
                        }
                    }
                }

                kept.push(strip_offsets(sentences));
            }

            data.passages.articles.push(kept);
        }

        stats.articles   = data.passages.article_count();
        stats.paragraphs = data.passages.paragraph_count();
        stats.questions  = data.examples.len();

        if stats.mismatches > 0 {
            tracing::warn!("# answer mismatches: {}", stats.mismatches);
        }
        tracing::info!(
            "# skipped questions: {} ({} invalid annotations)",
            stats.skipped_questions,
            stats.invalid_annotations
        );
        tracing::info!("# articles: {}, # paragraphs: {}", stats.articles, stats.paragraphs);
        tracing::info!("# questions: {}", stats.questions);

        Ok(IngestedSplit { data, stats })
    }

    /// Why a paragraph fails the size filter, if it does.
    fn oversized(&self, sentences: &[Vec<Token>]) -> Option<String> {
        if sentences.is_empty() {
            return Some("no sentences".to_string());
        }
        if sentences.len() > self.limits.para_size_th {
            return Some(format!("num sents = {}", sentences.len()));
        }
        let max_sent_size = sentences.iter().map(Vec::len).max().unwrap_or(0);
        if max_sent_size > self.limits.sent_size_th {
            return Some(format!("sent size = {max_sent_size}"));
        }
        None
    }
}

fn strip_offsets(sentences: Vec<Vec<Token>>) -> Paragraph<String> {
    sentences
        .into_iter()
        .map(|sent| sent.into_iter().map(|t| t.text).collect())
        .collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::span_locator::{OffsetLocator, SentinelLocator};
    use crate::domain::corpus::{SquadAnswer, SquadArticle, SquadParagraph, SquadQa};
    use crate::domain::example::TokenCoord;

    const LIMITS: IngestLimits = IngestLimits {
        para_size_th:       8,
        sent_size_th:       64,
        first_article_only: false,
    };

    fn qa(id: &str, question: &str, answers: &[(&str, usize)]) -> SquadQa {
        SquadQa {
            id:       id.to_string(),
            question: question.to_string(),
            answers:  answers
                .iter()
                .map(|(t, s)| SquadAnswer { text: t.to_string(), answer_start: *s })
                .collect(),
        }
    }

    fn doc(paragraphs: Vec<SquadParagraph>) -> SquadDocument {
        SquadDocument { data: vec![SquadArticle { paragraphs }] }
    }

    fn para(context: &str, qas: Vec<SquadQa>) -> SquadParagraph {
        SquadParagraph { context: context.to_string(), qas }
    }

    fn ingester(limits: IngestLimits) -> CorpusIngester {
        CorpusIngester::new(Tokenizer::new(), Box::new(OffsetLocator), limits)
    }

    #[test]
    fn test_single_example() {
        let d   = doc(vec![para("Paris is nice.", vec![qa("q1", "What is nice?", &[("Paris", 0)])])]);
        let out = ingester(LIMITS).ingest(&d, 0).unwrap();

        assert_eq!(out.data.examples.len(), 1);
        let ex = &out.data.examples[0];
        assert_eq!(ex.answer.start, TokenCoord::new(0, 0));
        assert_eq!(ex.reference, ParagraphRef { article: 0, paragraph: 0 });
        assert_eq!(ex.question, vec!["what", "is", "nice", "?"]);
        assert_eq!(ex.id, "q1");
        assert_eq!(out.data.passages.articles[0][0], vec![vec!["paris", "is", "nice", "."]]);
        assert_eq!(out.stats.skipped_questions, 0);
    }

    #[test]
    fn test_too_many_sentences_skips_paragraph() {
        let context = "One. Two. Three. Four. Five. Six. Seven. Eight. Nine.";
        let d = doc(vec![para(context, vec![
            qa("a", "One?", &[("One", 0)]),
            qa("b", "Two?", &[("Two", 5)]),
        ])]);
        let out = ingester(LIMITS).ingest(&d, 0).unwrap();

        assert_eq!(out.stats.skipped_questions, 2);
        assert_eq!(out.stats.paragraphs, 0);
        assert_eq!(out.data.passages.words().count(), 0);
        assert!(out.data.examples.is_empty());
    }

    #[test]
    fn test_long_sentence_and_long_question_are_skipped() {
        let limits = IngestLimits { sent_size_th: 4, ..LIMITS };
        let d = doc(vec![
            para("This sentence has far too many words.", vec![qa("a", "Why?", &[("This", 0)])]),
            para("Paris is nice.", vec![
                qa("b", "What is it that is nice here?", &[("Paris", 0)]),
                qa("c", "What?", &[("Paris", 0)]),
            ]),
        ]);
        let out = ingester(limits).ingest(&d, 0).unwrap();

        assert_eq!(out.stats.skipped_questions, 2);
        assert_eq!(out.data.examples.len(), 1);
        assert_eq!(out.data.examples[0].id, "c");
        // the surviving paragraph is the first one kept in its article
        assert_eq!(out.data.examples[0].reference.paragraph, 0);
    }

    #[test]
    fn test_article_offset_shifts_refs() {
        let d   = doc(vec![para("Paris is nice.", vec![qa("q", "What?", &[("nice", 9)])])]);
        let out = ingester(LIMITS).ingest(&d, 7).unwrap();
        assert_eq!(out.data.examples[0].reference.article, 7);
        assert_eq!(out.data.examples[0].answer.start, TokenCoord::new(0, 2));
    }

    #[test]
    fn test_only_first_answer_is_kept() {
        let d = doc(vec![para("Paris is nice.", vec![
            qa("q", "What?", &[("nice", 9), ("Paris", 0)]),
        ])]);
        let out = ingester(LIMITS).ingest(&d, 0).unwrap();
        assert_eq!(out.data.examples.len(), 1);
        assert_eq!(out.data.examples[0].answer.start, TokenCoord::new(0, 2));
    }

    #[test]
    fn test_unanswerable_and_invalid_are_skipped() {
        let d = doc(vec![para("Paris is nice.", vec![
            qa("none", "Why?", &[]),
            qa("bad", "Where?", &[("Paris", 200)]),
            qa("ok", "What?", &[("Paris", 0)]),
        ])]);
        let out = ingester(LIMITS).ingest(&d, 0).unwrap();
        assert_eq!(out.data.examples.len(), 1);
        assert_eq!(out.stats.skipped_questions, 2);
        assert_eq!(out.stats.invalid_annotations, 1);
    }

    #[test]
    fn test_mismatch_is_counted_but_kept() {
        let d   = doc(vec![para("Paris is nice.", vec![qa("q", "What?", &[("Rome", 0)])])]);
        let out = ingester(LIMITS).ingest(&d, 0).unwrap();
        assert_eq!(out.stats.mismatches, 1);
        assert_eq!(out.data.examples.len(), 1);
    }

    #[test]
    fn test_paragraph_without_surviving_questions_is_still_stored() {
        let d = doc(vec![
            para("Rome is old.", vec![qa("none", "Why?", &[])]),
            para("Paris is nice.", vec![qa("q", "What?", &[("Paris", 0)])]),
        ]);
        let out = ingester(LIMITS).ingest(&d, 0).unwrap();
        assert_eq!(out.stats.paragraphs, 2);
        assert_eq!(out.data.examples[0].reference.paragraph, 1);
    }

    #[test]
    fn test_first_article_only() {
        let mut d = doc(vec![para("Paris is nice.", vec![qa("q", "What?", &[("Paris", 0)])])]);
        d.data.push(d.data[0].clone());
        let limits = IngestLimits { first_article_only: true, ..LIMITS };
        let out = ingester(limits).ingest(&d, 0).unwrap();
        assert_eq!(out.stats.articles, 1);
        assert_eq!(ingester(LIMITS).ingest(&d, 0).unwrap().stats.articles, 2);
    }

    #[test]
    fn test_sentinel_collision_aborts_split() {
        let d = doc(vec![para("The sstopp word.", vec![qa("q", "What?", &[("The", 0)])])]);
        let ingester = CorpusIngester::new(
            Tokenizer::new(),
            Box::new(SentinelLocator::new(Tokenizer::new())),
            LIMITS,
        );
        assert!(ingester.ingest(&d, 0).is_err());
    }
}
