// ============================================================
// review-sentiment
// ============================================================
// Positive/negative sentiment for free-text movie reviews.
//
//   train     — offline: corpus → normalise → split → fit
//               vocabulary + linear SVM → evaluate → persist
//   classify  — online: load the persisted artifact once,
//               then classify(text) -> bool for any caller
//
// Layers (outermost first):
//   1. cli          — argument parsing, printing
//   2. application  — use cases (training pipeline, inference service)
//   3. domain       — plain types, errors and traits
//   4. data         — normalisation, corpus loading, splitting
//   5. ml           — vectorizer, classifier state, SVM trainer
//   6. infra        — artifact persistence, metrics

pub mod cli;
pub mod application;
pub mod domain;
pub mod data;
pub mod ml;
pub mod infra;

pub use application::classify_use_case::{InferenceService, InputPolicy, ServiceConfig};
pub use application::train_use_case::{TrainConfig, TrainReport, TrainUseCase};
pub use domain::error::SentimentError;
pub use domain::review::{LabeledReview, Sentiment};
pub use domain::traits::SentimentClassifier;
