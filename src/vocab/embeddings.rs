// ============================================================
// Layer 5 — Word Frequencies and Embedding Merge
// ============================================================
// Builds the table of "known" words: words frequent enough in the
// TRAINING split that also have a pretrained vector.
//
//   1. Count every word of the training passages + questions.
//   2. Keep words counted at least `count_th` times.
//   3. Seed the table with the two reserved placeholders
//      (<NULL>, <UNK>) and freshly sampled vectors.
//   4. Scan the embedding file once; every kept word found there
//      gets its vector, in file order.
//
// Frequent words missing from the file stay unresolved here. They
// still get an id later (after all known words) but no vector.
//
// Reference: GloVe (Pennington et al., 2014)
//            rand crate documentation (Rng::gen)

use std::collections::HashMap;
use std::io::BufRead;

use anyhow::Result;
use rand::Rng;

use crate::domain::index_map::IndexBijection;
use crate::infra::glove::GloveReader;
use crate::vocab::{NULL, UNK};

/// How many words each diagnostic list shows.
const REPORT_SIZE: usize = 10;

// ─── WordCounts ───────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordCounts {
    counts: HashMap<String, usize>,
}

impl WordCounts {
    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a String>) -> Self {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for word in words {
            *counts.entry(word.clone()).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn get(&self, word: &str) -> usize {
        self.counts.get(word).copied().unwrap_or(0)
    }

    /// Only the words seen at least `min_count` times.
    pub fn at_least(&self, min_count: usize) -> WordCounts {
        Self {
            counts: self
                .counts
                .iter()
                .filter(|(_, &n)| n >= min_count)
                .map(|(w, &n)| (w.clone(), n))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &usize)> {
        self.counts.iter()
    }
}

// ─── WordEmbeddings ───────────────────────────────────────────────────────────
/// Known words in insertion order with one vector each.
#[derive(Debug, Clone, PartialEq)]
pub struct WordEmbeddings {
    words:   IndexBijection<String>,
    vectors: Vec<Vec<f32>>,
}

impl WordEmbeddings {
    /// An empty table holding only the reserved placeholders.
    pub fn with_placeholders(dim: usize, rng: &mut impl Rng) -> Self {
        let mut table = Self { words: IndexBijection::new(), vectors: Vec::new() };
        for reserved in [NULL, UNK] {
            let vector = (0..dim).map(|_| rng.gen::<f32>()).collect();
            table.set(reserved.to_string(), vector);
        }
        table
    }

    /// Insert a word, or overwrite its vector if already present.
    fn set(&mut self, word: String, vector: Vec<f32>) {
        let idx = self.words.insert(word);
        if idx == self.vectors.len() {
            self.vectors.push(vector);
        } else {
            self.vectors[idx] = vector;
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[cfg(test)]
    pub fn words(&self) -> &IndexBijection<String> {
        &self.words
    }

    #[cfg(test)]
    pub fn vector(&self, word: &str) -> Option<&[f32]> {
        self.words.index_of(word).map(|idx| self.vectors[idx].as_slice())
    }

    pub fn into_parts(self) -> (IndexBijection<String>, Vec<Vec<f32>>) {
        (self.words, self.vectors)
    }
}

/// Merge frequent training words with the pretrained vectors.
pub fn build_word_embeddings<R: BufRead>(
    glove:     GloveReader<R>,
    counts:    &WordCounts,
    min_count: usize,
    rng:       &mut impl Rng,
) -> Result<WordEmbeddings> {
    let frequent  = counts.at_least(min_count);
    let dim       = glove.dim();
    tracing::info!(
        "{} of {} distinct training words seen at least {} times",
        frequent.len(),
        counts.len(),
        min_count
    );
    let mut table = WordEmbeddings::with_placeholders(dim, rng);

    let summary = glove.scan(
        |word| frequent.get(word) > 0,
        |word, vector| table.set(word, vector),
    )?;
    if summary.kept == 0 {
        tracing::warn!("No frequent word was found in the embedding file");
    }

    let report = CoverageReport::new(&frequent, &table);
    report.log();
    Ok(table)
}

// ─── CoverageReport ───────────────────────────────────────────────────────────
/// How much of the frequent vocabulary the embedding file covered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageReport {
    /// Occurrences of frequent words that got a vector
    pub known_tokens:     usize,
    /// Occurrences of frequent words without one
    pub unknown_tokens:   usize,
    /// Rows in the embedding table (placeholders included)
    pub distinct_known:   usize,
    pub distinct_unknown: usize,
    /// Most frequent words without a vector
    pub top_unknown:      Vec<String>,
    /// Longest frequent words, shortest first
    pub longest:          Vec<String>,
}

impl CoverageReport {
    pub fn new(frequent: &WordCounts, table: &WordEmbeddings) -> Self {
        let mut unknown: Vec<(&String, usize)> = frequent
            .iter()
            .filter(|(w, _)| !table.contains(w.as_str()))
            .map(|(w, &n)| (w, n))
            .collect();
        unknown.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        let mut by_len: Vec<&String> = frequent.iter().map(|(w, _)| w).collect();
        by_len.sort_by(|a, b| a.chars().count().cmp(&b.chars().count()).then_with(|| a.cmp(b)));
        let longest = by_len[by_len.len().saturating_sub(REPORT_SIZE)..]
            .iter()
            .map(|w| w.to_string())
            .collect();

        let total_tokens: usize = frequent.iter().map(|(_, &n)| n).sum();
        let unknown_tokens: usize = unknown.iter().map(|(_, n)| n).sum();

        Self {
            known_tokens:     total_tokens - unknown_tokens,
            unknown_tokens,
            distinct_known:   table.len(),
            distinct_unknown: unknown.len(),
            top_unknown:      unknown.iter().take(REPORT_SIZE).map(|(w, _)| w.to_string()).collect(),
            longest,
        }
    }

    pub fn log(&self) {
        tracing::info!(
            "# known words: {}, # unk words: {}",
            self.known_tokens,
            self.unknown_tokens
        );
        tracing::info!(
            "# distinct known words: {}, # distinct unk words: {}",
            self.distinct_known,
            self.distinct_unknown
        );
        tracing::info!("Top unk words: {}", self.top_unknown.join(", "));
        tracing::info!("Longest words: {}", self.longest.join(", "));
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::io::Cursor;

    fn counts(words: &[&str]) -> WordCounts {
        let owned: Vec<String> = words.iter().map(|w| w.to_string()).collect();
        WordCounts::from_words(&owned)
    }

    fn glove(text: &str, dim: usize) -> GloveReader<Cursor<String>> {
        GloveReader::from_reader(Cursor::new(text.to_string()), dim)
    }

    #[test]
    fn test_counts() {
        let c = counts(&["a", "b", "a", "a"]);
        assert_eq!(c.get("a"), 3);
        assert_eq!(c.get("z"), 0);
        assert_eq!(c.at_least(2).len(), 1);
    }

    #[test]
    fn test_placeholders_come_first() {
        let mut rng = StdRng::seed_from_u64(7);
        let c       = counts(&["paris", "rome"]);
        let table   = build_word_embeddings(glove("rome 1 2\nparis 3 4\n", 2), &c, 1, &mut rng).unwrap();

        let order: Vec<&str> = table.words().keys().map(String::as_str).collect();
        assert_eq!(order, [NULL, UNK, "rome", "paris"]);
        assert_eq!(table.vector("paris"), Some(&[3.0, 4.0][..]));
        assert_eq!(table.vector(NULL).map(<[f32]>::len), Some(2));
    }

    #[test]
    fn test_rare_and_missing_words_stay_unresolved() {
        let mut rng = StdRng::seed_from_u64(7);
        let c       = counts(&["paris", "paris", "rome", "berlin", "berlin"]);
        let table   = build_word_embeddings(
            glove("rome 1 2\nparis 3 4\n", 2), &c, 2, &mut rng,
        )
        .unwrap();

        assert!(table.contains("paris"));
        assert!(!table.contains("rome"), "below the frequency minimum");
        assert!(!table.contains("berlin"), "not in the embedding file");
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_placeholder_vectors_are_seeded() {
        let a = WordEmbeddings::with_placeholders(4, &mut StdRng::seed_from_u64(1));
        let b = WordEmbeddings::with_placeholders(4, &mut StdRng::seed_from_u64(1));
        assert_eq!(a, b);
        assert!(a.vector(UNK).unwrap().iter().all(|v| (0.0..1.0).contains(v)));
    }

    #[test]
    fn test_coverage_report() {
        let mut rng = StdRng::seed_from_u64(0);
        let c       = counts(&["a", "a", "a", "bb", "bb", "ccc"]);
        let table   = build_word_embeddings(glove("a 1\n", 1), &c, 1, &mut rng).unwrap();
        let report  = CoverageReport::new(&c.at_least(1), &table);

        assert_eq!(report.known_tokens, 3);
        assert_eq!(report.unknown_tokens, 3);
        assert_eq!(report.distinct_unknown, 2);
        assert_eq!(report.top_unknown, vec!["bb", "ccc"]);
        assert_eq!(report.longest.last().map(String::as_str), Some("ccc"));
    }
}
