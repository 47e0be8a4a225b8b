// ============================================================
// Layer 2 — Inference Service
// ============================================================
// The single entry point the review-storage layer calls:
//
//   classify(text) -> Result<bool, SentimentError>
//
// Built once at process start and shared by reference (or
// Arc) with whoever needs it. Loading never fails: a missing
// or corrupt artifact puts the service into the Unavailable
// state, and every classify call then returns
// ModelUnavailable. The host process keeps running.
//
// Per call:
//   1. model loaded?          else ModelUnavailable
//   2. input policy           else InvalidInput
//   3. normalise (Layer 4)
//   4. vectorize + predict (Layer 5)
//
// Nothing is mutated after construction, so concurrent calls
// need no locking. No I/O happens inside classify.

use serde::{Deserialize, Serialize};

use crate::data::preprocessor::Preprocessor;
use crate::domain::error::SentimentError;
use crate::domain::review::Sentiment;
use crate::domain::traits::SentimentClassifier;
use crate::infra::artifact_store::{ArtifactStore, ModelArtifact};

/// Where the service looks for its artifact, and the input policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub model_dir:  String,
    /// Shortest accepted review, in characters after trimming
    pub min_length: usize,
    /// Longest accepted review; unbounded when absent
    #[serde(default)]
    pub max_length: Option<usize>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model_dir:  "models".to_string(),
            min_length: InputPolicy::DEFAULT_MIN_LENGTH,
            max_length: None,
        }
    }
}

// ─── InputPolicy ──────────────────────────────────────────────────────────────
/// Product rule for which texts are worth classifying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputPolicy {
    min_length: usize,
    max_length: Option<usize>,
}

impl InputPolicy {
    pub const DEFAULT_MIN_LENGTH: usize = 10;

    pub fn new(min_length: usize) -> Self {
        Self { min_length, max_length: None }
    }

    /// Also reject texts longer than `max_length` characters.
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    /// Reject blank text and text outside `min_length..=max_length`
    /// characters.
    pub fn validate(&self, text: &str) -> Result<(), SentimentError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(SentimentError::InvalidInput("review text is empty".to_string()));
        }
        let len = trimmed.chars().count();
        if len < self.min_length {
            return Err(SentimentError::InvalidInput(format!(
                "review text is too short to classify ({len} characters, minimum {})",
                self.min_length
            )));
        }
        if let Some(max) = self.max_length.filter(|&max| len > max) {
            return Err(SentimentError::InvalidInput(format!(
                "review text is too long to classify ({len} characters, maximum {max})"
            )));
        }
        Ok(())
    }
}

impl Default for InputPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN_LENGTH)
    }
}

// ─── ModelState ───────────────────────────────────────────────────────────────
/// Whether the service has a usable model.
#[derive(Debug, Clone)]
pub enum ModelState {
    Ready(ModelArtifact),
    /// Loading failed; the reason is repeated in every error
    Unavailable(String),
}

// ─── InferenceService ─────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct InferenceService {
    state:        ModelState,
    policy:       InputPolicy,
    preprocessor: Preprocessor,
}

impl InferenceService {
    /// Load the artifact from `config.model_dir`.
    pub fn load(config: &ServiceConfig) -> Self {
        let store = ArtifactStore::new(&config.model_dir);
        let policy = InputPolicy::new(config.min_length);
        let policy = match config.max_length {
            Some(max) => policy.with_max_length(max),
            None      => policy,
        };
        Self::from_store(&store, policy)
    }

    pub fn from_store(store: &ArtifactStore, policy: InputPolicy) -> Self {
        let state = match store.load() {
            Ok(artifact) => {
                tracing::info!(
                    "Sentiment model ready ({} terms) from '{}'",
                    artifact.vocabulary().len(),
                    store.artifact_path().display()
                );
                ModelState::Ready(artifact)
            }
            Err(e) => {
                tracing::warn!("Sentiment model unavailable, classification disabled: {e}");
                ModelState::Unavailable(e.to_string())
            }
        };
        Self::with_state(state, policy)
    }

    /// Serve an artifact already in memory.
    pub fn from_artifact(artifact: ModelArtifact, policy: InputPolicy) -> Self {
        Self::with_state(ModelState::Ready(artifact), policy)
    }

    fn with_state(state: ModelState, policy: InputPolicy) -> Self {
        Self { state, policy, preprocessor: Preprocessor::new() }
    }

    pub fn state(&self) -> &ModelState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ModelState::Ready(_))
    }

    pub fn policy(&self) -> InputPolicy {
        self.policy
    }

    /// Classify one review; true means positive.
    pub fn classify(&self, text: &str) -> Result<bool, SentimentError> {
        let artifact   = self.ready_artifact()?;
        self.policy.validate(text)?;
        let normalized = self.preprocessor.normalize(text);
        Ok(artifact.predict(&normalized))
    }

    pub fn classify_sentiment(&self, text: &str) -> Result<Sentiment, SentimentError> {
        self.classify(text).map(Sentiment::from)
    }

    /// Raw decision score (>= 0 is positive).
    pub fn score(&self, text: &str) -> Result<f64, SentimentError> {
        let artifact = self.ready_artifact()?;
        self.policy.validate(text)?;
        let features = artifact.vectorize(&self.preprocessor.normalize(text));
        Ok(artifact.classifier().decision_function(&features))
    }

    fn ready_artifact(&self) -> Result<&ModelArtifact, SentimentError> {
        match &self.state {
            ModelState::Ready(artifact) => Ok(artifact),
            ModelState::Unavailable(reason) => Err(SentimentError::ModelUnavailable(reason.clone())),
        }
    }
}

impl SentimentClassifier for InferenceService {
    fn classify(&self, text: &str) -> Result<bool, SentimentError> {
        InferenceService::classify(self, text)
    }
}
