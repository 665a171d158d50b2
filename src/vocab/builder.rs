// ============================================================
// Layer 5 — Vocabulary Builder
// ============================================================
// Runs the vocabulary steps in order:
//
//   Step 1: word counts over TRAIN passages + questions
//   Step 2: merge frequent words with pretrained vectors
//   Step 3: char vocabulary over TRAIN words
//   Step 4: spelling table over TRAIN + DEV words
//   Step 5: final ids (known first) + char-index matrix
//
// Frequency decisions only ever look at the training split. Dev
// words still end up in the vocabulary through the spelling table,
// as unknown words.
//
// Reference: Rust Book §13 (Iterators)

use std::io::BufRead;

use anyhow::Result;
use rand::Rng;

use crate::domain::example::SplitData;
use crate::domain::index_map::IndexBijection;
use crate::infra::glove::GloveReader;
use crate::vocab::chars::{CharVocab, SpellingTable};
use crate::vocab::embeddings::{build_word_embeddings, WordCounts};
use crate::vocab::encoder::{assign_ids, FinalVocab};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VocabParams {
    /// Minimum training count for a word to get a pretrained vector
    pub count_th:      usize,
    /// Minimum training count for a char to get its own id
    pub char_count_th: usize,
    /// Longest spelling kept per word, in chars
    pub word_size_th:  usize,
}

/// Everything the encoder and the serializer need.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    pub words:    FinalVocab,
    pub char2idx: IndexBijection<String>,
}

pub struct VocabBuilder {
    params: VocabParams,
}

impl VocabBuilder {
    pub fn new(params: VocabParams) -> Self {
        Self { params }
    }

    pub fn build<R: BufRead>(
        &self,
        train: &SplitData<String>,
        dev:   &SplitData<String>,
        glove: GloveReader<R>,
        rng:   &mut impl Rng,
    ) -> Result<Vocabulary> {
        let p = &self.params;

        let counts     = WordCounts::from_words(train.words());
        let embeddings = build_word_embeddings(glove, &counts, p.count_th, rng)?;

        let chars    = CharVocab::build(train.words(), p.char_count_th);
        let spelling = SpellingTable::build(&chars, train.words().chain(dev.words()), p.word_size_th);

        let words = assign_ids(embeddings, &spelling)?;
        Ok(Vocabulary { words, char2idx: chars.into_index() })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ingester::{CorpusIngester, IngestLimits};
    use crate::data::span_locator::OffsetLocator;
    use crate::data::tokenizer::Tokenizer;
    use crate::domain::corpus::SquadDocument;
    use rand::{rngs::StdRng, SeedableRng};
    use std::io::Cursor;

    fn ingest(json: &str, offset: usize) -> SplitData<String> {
        let doc: SquadDocument = serde_json::from_str(json).unwrap();
        let limits = IngestLimits { para_size_th: 8, sent_size_th: 64, first_article_only: false };
        CorpusIngester::new(Tokenizer::new(), Box::new(OffsetLocator), limits)
            .ingest(&doc, offset)
            .unwrap()
            .data
    }

    const TRAIN: &str = r#"{"data": [{"paragraphs": [{"context": "Paris is nice. Paris is big.",
        "qas": [{"id": "t1", "question": "What is nice?", "answers": [{"text": "Paris", "answer_start": 0}]}]}]}]}"#;
    const DEV: &str = r#"{"data": [{"paragraphs": [{"context": "Zürich is calm.",
        "qas": [{"id": "d1", "question": "Which city?", "answers": [{"text": "Zürich", "answer_start": 0}]}]}]}]}"#;

    fn build(params: VocabParams, glove: &str) -> (SplitData<String>, SplitData<String>, Vocabulary) {
        let train  = ingest(TRAIN, 0);
        let dev    = ingest(DEV, 1);
        let reader = GloveReader::from_reader(Cursor::new(glove.to_string()), 2);
        let vocab  = VocabBuilder::new(params)
            .build(&train, &dev, reader, &mut StdRng::seed_from_u64(11))
            .unwrap();
        (train, dev, vocab)
    }

    const PARAMS: VocabParams = VocabParams { count_th: 2, char_count_th: 1, word_size_th: 16 };

    #[test]
    fn test_every_corpus_word_has_an_id_and_a_spelling() {
        let (train, dev, vocab) = build(PARAMS, "paris 1 2\nis 3 4\nnice 5 6\n");
        for word in train.words().chain(dev.words()) {
            let id = vocab.words.word2idx.index_of(word.as_str());
            assert!(id.is_some(), "no id for {word}");
            assert_eq!(vocab.words.char_idxs[id.unwrap()].len(), vocab.words.max_word_size);
        }
    }

    #[test]
    fn test_frequency_only_counts_training_words() {
        // "big" occurs once in train: below count_th = 2
        let (_, _, vocab) = build(PARAMS, "paris 1 2\nis 3 4\nbig 5 6\ncalm 7 8\n");
        assert_eq!(vocab.words.known_size(), 4);
        let big = vocab.words.word2idx.index_of("big").unwrap();
        assert!(big >= vocab.words.known_size());
        // "calm" only occurs in dev
        let calm = vocab.words.word2idx.index_of("calm").unwrap();
        assert!(calm >= vocab.words.known_size());
    }

    #[test]
    fn test_dev_only_chars_are_unknown() {
        let (_, _, vocab) = build(PARAMS, "paris 1 2\n");
        assert!(vocab.char2idx.index_of("ü").is_none());
        let zurich = vocab.words.word2idx.index_of("zürich").unwrap();
        assert_eq!(vocab.words.char_idxs[zurich][1], crate::vocab::UNK_ID);
    }
}
