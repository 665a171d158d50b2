// ============================================================
// Layer 5 — Vocabulary Layer
// ============================================================
// Everything that turns words into numbers:
//
//   embeddings.rs — word counts, pretrained-vector merge and the
//                   coverage report
//
//   chars.rs      — char vocabulary and the word → char-ids
//                   spelling table
//
//   encoder.rs    — final id layout (known words first), embedding
//                   matrix, char-index matrix, encode / decode
//
//   builder.rs    — runs the steps above in order
//
// Every vocabulary-shaped table reserves the same two symbols at
// the same ids.
//
// Reference: Rust Book §7 (Modules)

/// Padding placeholder.
pub const NULL: &str = "<NULL>";
/// Unknown-word / unknown-char placeholder.
pub const UNK: &str = "<UNK>";

pub const NULL_ID: usize = 0;
pub const UNK_ID: usize = 1;

pub mod embeddings;

pub mod chars;

pub mod encoder;

pub mod builder;
