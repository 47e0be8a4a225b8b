// ============================================================
// Layer 5 — ML Layer
// ============================================================
// The algorithmic core. No file I/O, no CLI, no logging setup.
//
//   vectorizer.rs — Vocabulary (fit once on the training
//                   partition) and FeatureVector (token counts
//                   over that vocabulary)
//
//   model.rs      — ClassifierState: learned weights + bias +
//                   the hyperparameters that produced them;
//                   scores and predicts a FeatureVector
//
//   trainer.rs    — Linear SVM fitting by dual coordinate
//                   descent, seeded for reproducibility
//
// Reference: Hsieh et al. (2008) A Dual Coordinate Descent
//            Method for Large-scale Linear SVM

/// Bag-of-words vocabulary and count vectors
pub mod vectorizer;

/// Fitted linear classifier state and prediction
pub mod model;

/// Linear SVM training loop
pub mod trainer;
