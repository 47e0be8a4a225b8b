// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the lower layers; computes nothing itself.
//
// Rules for this layer:
//   - No vectorizer or SVM math (Layer 5)
//   - No printing (Layer 1)
//   - No direct file formats (Layers 4 and 6)

/// Offline training pipeline: corpus → persisted ModelArtifact
pub mod train_use_case;

/// Online inference service: ModelArtifact → classify(text)
pub mod classify_use_case;
