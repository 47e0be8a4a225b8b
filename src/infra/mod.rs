// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
//   artifact_store.rs — Saves and loads the ModelArtifact (the
//                       vocabulary and classifier as one unit).
//                       Writes go through a temp file + rename,
//                       so readers see the old pair or the new
//                       pair, never a mix.
//
//   metrics.rs        — Evaluation report (accuracy, precision,
//                       recall, F1) and a CSV log with one row
//                       per training run.

/// Atomic model artifact persistence
pub mod artifact_store;

/// Evaluation metrics and the training-run CSV log
pub mod metrics;
