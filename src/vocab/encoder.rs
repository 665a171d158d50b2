// ============================================================
// Layer 5 — Index Assigner & Encoder
// ============================================================
// Gives every word its final integer id and rewrites the corpus.
//
// Id layout:
//
//   0 .. known            known words, in embedding-table order
//                         (0 = <NULL>, 1 = <UNK>)
//   known .. all          every other corpus word, in the order
//                         the spelling table first saw it
//
// so the embedding matrix has exactly `known` rows and row i is
// the vector of word i. Ids at or past `known` have no row.
//
// The char-index matrix has one row per id (all of them) holding
// the word's char ids, right-padded with <NULL> to the longest row.
//
// Encoding is a straight lookup. A word without an id can only
// mean the vocabulary was built from a different corpus than the
// one being encoded, so it aborts the run.
//
// Reference: Rust Book §8 (Hash Maps), §9 (Error Handling)

use anyhow::{anyhow, Result};

use crate::domain::dataset::EmbeddingMatrix;
use crate::domain::example::SplitData;
use crate::domain::index_map::IndexBijection;
use crate::vocab::chars::{pad_row, SpellingTable};
use crate::vocab::embeddings::WordEmbeddings;

/// The final word-level vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalVocab {
    pub word2idx:      IndexBijection<String>,
    pub emb_mat:       EmbeddingMatrix,
    pub char_idxs:     Vec<Vec<usize>>,
    pub max_word_size: usize,
}

impl FinalVocab {
    /// Words with an embedding row.
    pub fn known_size(&self) -> usize {
        self.emb_mat.rows()
    }

    /// All words, known or not.
    pub fn total_size(&self) -> usize {
        self.word2idx.len()
    }
}

/// Lay out ids: known words first, then the rest of the corpus.
pub fn assign_ids(embeddings: WordEmbeddings, spelling: &SpellingTable) -> Result<FinalVocab> {
    let (mut word2idx, vectors) = embeddings.into_parts();
    let known = word2idx.len();

    for word in spelling.words() {
        word2idx.insert(word.clone());
    }

    let rows = word2idx
        .keys()
        .map(|word| {
            spelling
                .get(word)
                .ok_or_else(|| anyhow!("known word '{word}' is missing from the spelling table"))
        })
        .collect::<Result<Vec<&[usize]>>>()?;

    let max_word_size = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    let char_idxs     = rows.iter().map(|r| pad_row(r, max_word_size)).collect();

    tracing::info!(
        "Vocabulary: {} known words, {} unknown words, max word size {}",
        known,
        word2idx.len() - known,
        max_word_size
    );

    Ok(FinalVocab {
        word2idx,
        emb_mat: EmbeddingMatrix { emb_mat: vectors },
        char_idxs,
        max_word_size,
    })
}

/// Replace every word of a split by its id.
pub fn encode(word2idx: &IndexBijection<String>, data: SplitData<String>) -> Result<SplitData<usize>> {
    data.try_map(|word| {
        word2idx
            .index_of(word.as_str())
            .ok_or_else(|| anyhow!("word '{word}' has no id in the final vocabulary"))
    })
}

/// Inverse of `encode`.
#[cfg(test)]
pub fn decode(word2idx: &IndexBijection<String>, data: SplitData<usize>) -> Result<SplitData<String>> {
    data.try_map(|id| {
        word2idx
            .key(id)
            .cloned()
            .ok_or_else(|| anyhow!("id {id} is outside the vocabulary"))
    })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::example::{AnswerSpan, Example, ParagraphRef, Passages, TokenCoord};
    use crate::infra::glove::GloveReader;
    use crate::vocab::chars::CharVocab;
    use crate::vocab::embeddings::{build_word_embeddings, WordCounts};
    use crate::vocab::{NULL, NULL_ID, UNK, UNK_ID};
    use rand::{rngs::StdRng, SeedableRng};
    use std::io::Cursor;

    fn split(passage: &[&str], question: &[&str]) -> SplitData<String> {
        let owned = |ws: &[&str]| ws.iter().map(|w| w.to_string()).collect::<Vec<_>>();
        SplitData {
            passages: Passages { articles: vec![vec![vec![owned(passage)]]] },
            examples: vec![Example {
                reference: ParagraphRef { article: 0, paragraph: 0 },
                question:  owned(question),
                answer:    AnswerSpan { start: TokenCoord::new(0, 0), stop: TokenCoord::new(0, 0) },
                id:        "q".into(),
            }],
        }
    }

    fn vocab_for(train: &SplitData<String>, dev: &SplitData<String>, glove: &str) -> FinalVocab {
        let counts     = WordCounts::from_words(train.words());
        let reader     = GloveReader::from_reader(Cursor::new(glove.to_string()), 2);
        let embeddings = build_word_embeddings(reader, &counts, 1, &mut StdRng::seed_from_u64(3)).unwrap();
        let chars      = CharVocab::build(train.words(), 1);
        let spelling   = SpellingTable::build(&chars, train.words().chain(dev.words()), 16);
        assign_ids(embeddings, &spelling).unwrap()
    }

    #[test]
    fn test_known_words_take_the_lowest_ids() {
        let train = split(&["paris", "is", "nice"], &["what", "is", "nice"]);
        let dev   = split(&["rome", "is", "old"], &["why"]);
        let vocab = vocab_for(&train, &dev, "nice 1 1\nparis 2 2\n");

        assert_eq!(vocab.word2idx.index_of(NULL), Some(NULL_ID));
        assert_eq!(vocab.word2idx.index_of(UNK), Some(UNK_ID));
        assert_eq!(vocab.word2idx.index_of("nice"), Some(2));
        assert_eq!(vocab.word2idx.index_of("paris"), Some(3));
        assert_eq!(vocab.known_size(), 4);

        // every other word sits in [known, total)
        for word in ["is", "what", "rome", "old", "why"] {
            let id = vocab.word2idx.index_of(word).unwrap();
            assert!((vocab.known_size()..vocab.total_size()).contains(&id), "{word} -> {id}");
        }
        assert_eq!(vocab.total_size(), 9);
    }

    #[test]
    fn test_char_matrix_is_rectangular() {
        let train = split(&["a", "abcd"], &["ab"]);
        let vocab = vocab_for(&train, &SplitData::default(), "a 1 1\n");

        assert_eq!(vocab.char_idxs.len(), vocab.total_size());
        assert_eq!(vocab.max_word_size, 4);
        assert!(vocab.char_idxs.iter().all(|row| row.len() == 4));
        assert_eq!(vocab.char_idxs[NULL_ID], vec![NULL_ID; 4]);
    }

    #[test]
    fn test_encode_then_decode_round_trips() {
        let train = split(&["paris", "is", "nice", "."], &["what", "is", "nice", "?"]);
        let dev   = split(&["rome", "is", "old", "."], &["why", "?"]);
        let vocab = vocab_for(&train, &dev, "nice 1 1\n");

        for data in [train, dev] {
            let encoded = encode(&vocab.word2idx, data.clone()).unwrap();
            assert!(encoded.words().all(|&id| id < vocab.total_size()));
            assert_eq!(decode(&vocab.word2idx, encoded).unwrap(), data);
        }
    }

    #[test]
    fn test_encoding_an_unseen_word_fails() {
        let train = split(&["paris"], &["what"]);
        let vocab = vocab_for(&train, &SplitData::default(), "paris 1 1\n");
        let other = split(&["berlin"], &["what"]);
        assert!(encode(&vocab.word2idx, other).is_err());
    }
}
