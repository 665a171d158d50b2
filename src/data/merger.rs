// ============================================================
// Layer 4 — Split Merger
// ============================================================
// Concatenates the encoded splits in a fixed order (train, then
// dev) and records where each split's examples landed:
//
//   train: 3 examples, dev: 2 examples
//   → merged examples [t0 t1 t2 d0 d1]
//   → ranges { train: [0, 3), dev: [3, 5) }
//
// Passage articles are concatenated the same way. Dev paragraph
// refs were already shifted by the number of training articles at
// ingest time, so they stay valid in the merged collection.
//
// Also computes the size summary written to metadata.json.
//
// Reference: Rust Book §8 (Vectors), §13 (Iterators)

use crate::domain::dataset::{BatchedExamples, Metadata, Split, SplitRanges};
use crate::domain::example::{Passages, SplitData};
use crate::vocab::encoder::FinalVocab;

/// All splits after concatenation.
#[derive(Debug, Clone, Default)]
pub struct MergedSplits {
    pub passages: Passages<usize>,
    pub batched:  BatchedExamples,
    pub ranges:   SplitRanges,
}

/// Concatenate splits in the order given.
pub fn merge(splits: impl IntoIterator<Item = (Split, SplitData<usize>)>) -> MergedSplits {
    let mut merged = MergedSplits::default();

    for (split, data) in splits {
        let range = merged.ranges.push(split, data.examples.len());
        tracing::debug!("{} examples → {:?}", split, range.as_range());

        merged.passages.append(data.passages);
        for example in data.examples {
            merged.batched.push(example);
        }
    }

    merged
}

/// Size summary of the merged dataset.
pub fn summarize(merged: &MergedSplits, vocab: &FinalVocab, char_vocab_size: usize) -> Metadata {
    Metadata {
        max_sent_size:   merged.passages.sentences().map(Vec::len).max().unwrap_or(0),
        max_num_sents:   merged.passages.paragraphs().map(Vec::len).max().unwrap_or(0),
        vocab_size:      vocab.known_size(),
        all_vocab_size:  vocab.total_size(),
        char_vocab_size,
        max_ques_size:   merged.batched.questions.iter().map(Vec::len).max().unwrap_or(0),
        max_word_size:   vocab.max_word_size,
        word_vec_size:   vocab.emb_mat.dim(),
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dataset::EmbeddingMatrix;
    use crate::domain::example::{AnswerSpan, Example, ParagraphRef, TokenCoord};
    use crate::domain::index_map::IndexBijection;

    fn split(article: usize, n_examples: usize, sents: Vec<Vec<usize>>) -> SplitData<usize> {
        let examples = (0..n_examples)
            .map(|i| Example {
                reference: ParagraphRef { article, paragraph: 0 },
                question:  vec![7; i + 1],
                answer:    AnswerSpan { start: TokenCoord::new(0, i), stop: TokenCoord::new(0, i) },
                id:        format!("{article}-{i}"),
            })
            .collect();
        SplitData { passages: Passages { articles: vec![vec![sents]] }, examples }
    }

    #[test]
    fn test_ranges_are_disjoint_and_cover_everything() {
        let merged = merge([
            (Split::Train, split(0, 3, vec![vec![1, 2]])),
            (Split::Dev,   split(1, 2, vec![vec![3]])),
        ]);

        let train = merged.ranges.get(Split::Train).unwrap();
        let dev   = merged.ranges.get(Split::Dev).unwrap();
        assert_eq!(train.as_range(), 0..3);
        assert_eq!(dev.as_range(), 3..5);
        assert_eq!(merged.ranges.total(), merged.batched.len());
        assert_eq!(merged.batched.ids[3], "1-0");
        assert_eq!(merged.passages.article_count(), 2);
    }

    #[test]
    fn test_empty_split_gets_an_empty_range() {
        let merged = merge([
            (Split::Train, split(0, 2, vec![vec![1]])),
            (Split::Dev,   SplitData::default()),
        ]);
        let dev = merged.ranges.get(Split::Dev).unwrap();
        assert!(dev.as_range().is_empty());
        assert_eq!(dev.start, 2);
    }

    #[test]
    fn test_summary() {
        let merged = merge([
            (Split::Train, split(0, 2, vec![vec![1, 2, 3], vec![4]])),
            (Split::Dev,   split(1, 3, vec![vec![5]])),
        ]);
        let vocab = FinalVocab {
            word2idx:      ["a", "b", "c"].iter().map(|s| s.to_string()).collect::<IndexBijection<_>>(),
            emb_mat:       EmbeddingMatrix { emb_mat: vec![vec![0.0; 5], vec![0.0; 5]] },
            char_idxs:     vec![vec![0; 4]; 3],
            max_word_size: 4,
        };
        let meta = summarize(&merged, &vocab, 9);

        assert_eq!(meta.max_sent_size, 3);
        assert_eq!(meta.max_num_sents, 2);
        assert_eq!(meta.vocab_size, 2);
        assert_eq!(meta.all_vocab_size, 3);
        assert_eq!(meta.char_vocab_size, 9);
        assert_eq!(meta.max_ques_size, 3);
        assert_eq!(meta.max_word_size, 4);
        assert_eq!(meta.word_vec_size, 5);
    }
}
