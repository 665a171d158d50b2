// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Handles file formats that don't belong in any specific
// business layer:
//
//   glove.rs          — Pretrained word vectors
//                       Locates the GloVe text file for a corpus
//                       tier and dimension, and streams it line
//                       by line without loading it into memory.
//
//   artifact_store.rs — Output artifacts
//                       Writes every preprocessed JSON artifact
//                       (plus the run configuration) into the
//                       target directory, all or nothing.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// GloVe vector file reader
pub mod glove;

/// Writes the preprocessed dataset to disk
pub mod artifact_store;
