// ============================================================
// Layer 3 — Error Kinds
// ============================================================
// Every failure a caller can observe maps into exactly one of
// these four kinds. Low-level errors (I/O, CSV, JSON) are
// converted at the module that encounters them and never leak
// out as their original type.
//
//   InvalidInput      — text rejected before reaching the model
//   ModelUnavailable  — no usable artifact loaded
//   CorpusError       — malformed training input, aborts training
//   PersistenceError  — artifact write failed, aborts training

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SentimentError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("corpus error: {0}")]
    CorpusError(String),

    #[error("persistence error: {0}")]
    PersistenceError(String),
}
