// ============================================================
// Layer 5 — Char Vocabulary and Word Spelling Table
// ============================================================
// Character-level view of the vocabulary, so the model can still
// say something about words it has no vector for.
//
// Char vocabulary (training split only):
//   - count every char of every training word (passages + questions)
//   - keep chars seen at least `char_count_th` times, in the order
//     they were first seen
//   - ids 0 and 1 are always <NULL> and <UNK>
//
// Spelling table (BOTH splits):
//   - every word of either split → its char ids
//   - chars outside the char vocabulary map to <UNK>
//   - truncated to `word_size_th` chars
//   - <NULL> and <UNK> themselves spell as nothing
//
// Example (all chars known):
//   "paris" → [p, a, r, i, s] → [5, 2, 7, 3, 4]
//
// Reference: Kim et al. (2016) Character-Aware Neural Language Models
//            Rust Book §8 (Strings: chars)

use crate::domain::index_map::IndexBijection;
use crate::vocab::{NULL, NULL_ID, UNK, UNK_ID};

// ─── CharVocab ────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharVocab {
    index: IndexBijection<String>,
}

impl CharVocab {
    /// Count chars over `words` and keep those seen `min_count` times.
    pub fn build<'a>(words: impl IntoIterator<Item = &'a String>, min_count: usize) -> Self {
        let mut seen:   IndexBijection<char> = IndexBijection::new();
        let mut counts: Vec<usize>           = Vec::new();

        for word in words {
            for c in word.chars() {
                let idx = seen.insert(c);
                if idx == counts.len() {
                    counts.push(0);
                }
                counts[idx] += 1;
            }
        }

        let mut index = IndexBijection::new();
        index.insert(NULL.to_string());
        index.insert(UNK.to_string());
        for (c, &n) in seen.keys().zip(&counts) {
            if n >= min_count {
                index.insert(c.to_string());
            }
        }

        tracing::info!(
            "Char vocabulary: {} of {} distinct chars kept (min count {})",
            index.len() - 2,
            seen.len(),
            min_count
        );
        Self { index }
    }

    /// Id of `c`, or the <UNK> id when `c` was filtered out.
    pub fn id(&self, c: char) -> usize {
        let mut buf = [0u8; 4];
        self.index.index_of(c.encode_utf8(&mut buf) as &str).unwrap_or(UNK_ID)
    }

    /// Char ids of `word`, at most `max_len` of them.
    pub fn spell(&self, word: &str, max_len: usize) -> Vec<usize> {
        word.chars().take(max_len).map(|c| self.id(c)).collect()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[cfg(test)]
    pub fn index(&self) -> &IndexBijection<String> {
        &self.index
    }

    pub fn into_index(self) -> IndexBijection<String> {
        self.index
    }
}

// ─── SpellingTable ────────────────────────────────────────────────────────────
/// Every word of the corpus (first-seen order) with its char ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellingTable {
    words:     IndexBijection<String>,
    spellings: Vec<Vec<usize>>,
}

impl SpellingTable {
    pub fn build<'a>(
        chars:        &CharVocab,
        words:        impl IntoIterator<Item = &'a String>,
        word_size_th: usize,
    ) -> Self {
        let mut table = Self { words: IndexBijection::new(), spellings: Vec::new() };

        for reserved in [NULL, UNK] {
            table.words.insert(reserved.to_string());
            table.spellings.push(Vec::new());
        }
        for word in words {
            if table.words.contains(word.as_str()) {
                continue;
            }
            table.words.insert(word.clone());
            table.spellings.push(chars.spell(word, word_size_th));
        }

        tracing::debug!("Spelling table covers {} words", table.words.len());
        table
    }

    pub fn get(&self, word: &str) -> Option<&[usize]> {
        self.words.index_of(word).map(|idx| self.spellings[idx].as_slice())
    }

    /// Words in first-seen order (reserved symbols first).
    pub fn words(&self) -> impl Iterator<Item = &String> {
        self.words.keys()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.words.len()
    }
}

/// Pad `row` with <NULL> ids up to `width`.
pub fn pad_row(row: &[usize], width: usize) -> Vec<usize> {
    let mut out = row.to_vec();
    out.resize(width.max(row.len()), NULL_ID);
    out
}
