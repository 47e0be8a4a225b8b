// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types and traits describing what the system
// works with: labelled reviews, sentiment, errors, and the
// two seams other layers plug into.
//
// Rules for this layer:
//   - NO file I/O
//   - NO vectorizer or classifier math
//   - Only structs, enums and traits

/// A review text paired with its sentiment label
pub mod review;

/// The typed error kinds every public operation maps into
pub mod error;

/// Corpus and classifier abstractions
pub mod traits;
