// ============================================================
// Layer 3 — Core Traits
// ============================================================
// The two seams of the system:
//   - CorpusSource: where labelled training reviews come from
//     (CSV file, in-memory list, ...)
//   - SentimentClassifier: what the review-storage layer calls.
//     It codes against this trait, not against the concrete
//     InferenceService.

use crate::domain::error::SentimentError;
use crate::domain::review::LabeledReview;

// ─── CorpusSource ─────────────────────────────────────────────────────────────
/// Any component that can supply the labelled training corpus.
///
/// Implementations:
///   - CsvCorpusLoader  → IMDB-style CSV file
///   - InMemoryCorpus   → a Vec held by the caller
pub trait CorpusSource {
    /// Load every labelled review, in a stable order.
    /// Any malformed record is a `CorpusError`.
    fn load_all(&self) -> Result<Vec<LabeledReview>, SentimentError>;
}

// ─── SentimentClassifier ──────────────────────────────────────────────────────
/// Classifies one review text. `true` means positive.
///
/// Implementations must be idempotent and safe to call from many
/// threads at once.
pub trait SentimentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<bool, SentimentError>;
}
