// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// This layer handles everything from raw SQuAD JSON files up to
// the merged, id-encoded dataset.
//
// The pipeline flows in this order:
//
//   <split>-v<version>.json
//       │
//       ▼
//   SquadLoader       → reads the file, deserialises the corpus
//       │
//       ▼
//   Tokenizer         → paragraphs → sentences → words (+ offsets)
//       │
//       ▼
//   SpanLocator       → char span of an answer → token coordinates
//       │
//       ▼
//   CorpusIngester    → filters, builds passages + examples
//       │
//       ▼
//   (vocab layer: ids and embeddings)
//       │
//       ▼
//   merger            → concatenates splits, records ranges
//
// Each module is responsible for exactly one step.
// This makes each step independently testable and replaceable.
//
// Reference: Rust Book §13 (Iterators and Closures)

/// Reads SQuAD JSON files with serde_json
pub mod loader;

/// Sentence splitting and word tokenization with char offsets
pub mod tokenizer;

/// Maps answer char spans to (sentence, word) coordinates
pub mod span_locator;

/// Turns a corpus document into passages and example records
pub mod ingester;

/// Concatenates encoded splits and records split ranges
pub mod merger;
