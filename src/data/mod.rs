// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between a corpus on disk and clean, labelled,
// partitioned text ready for vectorization.
//
//   CSV corpus
//       │
//       ▼
//   CsvCorpusLoader   → reads (review, sentiment) records
//       │
//       ▼
//   Preprocessor      → strips markup and URLs
//       │
//       ▼
//   split_stratified  → seeded train / evaluation partitions
//
// The same Preprocessor runs again at inference time, so
// training and serving see identically normalised text.

/// Reads labelled reviews from CSV or memory
pub mod loader;

/// Removes HTML-like tags and URLs from raw text
pub mod preprocessor;

/// Reproducible, label-stratified train/evaluation split
pub mod splitter;
