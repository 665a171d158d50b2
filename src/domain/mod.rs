// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust structs and traits that define what the pipeline
// works with. No file I/O and no tokenizer code lives here.
//
//   corpus     — raw SQuAD-style JSON shape
//   example    — tokenized passages and example records
//   index_map  — ordered key ↔ index bijection
//   dataset    — the numeric output artifacts
//   traits     — CorpusSource and SpanLocator seams
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

pub mod corpus;

pub mod example;

pub mod index_map;

pub mod dataset;

pub mod traits;
