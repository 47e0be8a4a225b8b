// ============================================================
// Layer 6 — Model Artifact Store
// ============================================================
// Persists the fitted vocabulary and classifier as ONE file,
// so they can only ever be loaded as a matched pair.
//
// File layout:
//   <model_dir>/
//     model_artifact.json   ← { format_version, vectorizer, classifier }
//     train_config.json     ← config of the run that produced it
//     metrics.csv           ← one row per training run
//
// Saving:
//   1. serialise to <model_dir>/model_artifact.json.tmp
//   2. fsync the temp file
//   3. rename over model_artifact.json
//   4. fsync the directory so the rename survives a crash (unix)
// A failure at any step removes the temp file and leaves the
// previous artifact untouched.
//
// Loading checks the format version, that the weight count
// matches the vocabulary size, and that every number is finite.
// Any problem is reported as ModelUnavailable.
//
// Reference: serde_json documentation

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::error::SentimentError;
use crate::ml::model::ClassifierState;
use crate::ml::vectorizer::{FeatureVector, Vocabulary};

pub const ARTIFACT_FILE: &str = "model_artifact.json";
pub const CONFIG_FILE: &str = "train_config.json";

/// Bumped whenever the on-disk layout changes incompatibly.
pub const FORMAT_VERSION: u32 = 1;

// ─── ModelArtifact ────────────────────────────────────────────────────────────
/// A vocabulary and the classifier trained on its vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelArtifact {
    vocabulary: Vocabulary,
    classifier: ClassifierState,
}

impl ModelArtifact {
    /// Pair a vocabulary with a classifier. Fails if they disagree on
    /// the feature dimension or the classifier holds non-finite numbers.
    pub fn new(vocabulary: Vocabulary, classifier: ClassifierState) -> Result<Self, SentimentError> {
        if vocabulary.len() != classifier.dim() {
            return Err(SentimentError::ModelUnavailable(format!(
                "vectorizer has {} terms but classifier expects {} features",
                vocabulary.len(),
                classifier.dim()
            )));
        }
        if !classifier.is_finite() {
            return Err(SentimentError::ModelUnavailable(
                "classifier contains non-finite weights".to_string(),
            ));
        }
        Ok(Self { vocabulary, classifier })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn classifier(&self) -> &ClassifierState {
        &self.classifier
    }

    pub fn vectorize(&self, text: &str) -> FeatureVector {
        self.vocabulary.transform(text)
    }

    /// Vectorize and predict an already-normalised text.
    pub fn predict(&self, normalized: &str) -> bool {
        self.classifier.predict(&self.vectorize(normalized))
    }
}

/// On-disk shape for writing, borrowing from the artifact.
#[derive(Serialize)]
struct ArtifactFileRef<'a> {
    format_version: u32,
    vectorizer:     &'a Vocabulary,
    classifier:     &'a ClassifierState,
}

/// On-disk shape for reading.
#[derive(Deserialize)]
struct ArtifactFile {
    format_version: u32,
    vectorizer:     Vocabulary,
    classifier:     ClassifierState,
}

// ─── ArtifactStore ────────────────────────────────────────────────────────────
/// Reads and writes model artifacts in one directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.dir.join(ARTIFACT_FILE)
    }

    /// Atomically replace the stored artifact.
    pub fn save(&self, artifact: &ModelArtifact) -> Result<(), SentimentError> {
        let file = ArtifactFileRef {
            format_version: FORMAT_VERSION,
            vectorizer:     &artifact.vocabulary,
            classifier:     &artifact.classifier,
        };
        let bytes = serde_json::to_vec(&file).map_err(|e| {
            SentimentError::PersistenceError(format!("cannot serialise model artifact: {e}"))
        })?;

        self.write_atomic(ARTIFACT_FILE, &bytes)?;

        tracing::info!(
            "Saved model artifact to '{}' ({} terms)",
            self.artifact_path().display(),
            artifact.vocabulary.len()
        );
        Ok(())
    }

    /// Load and validate the stored artifact.
    pub fn load(&self) -> Result<ModelArtifact, SentimentError> {
        let path = self.artifact_path();

        let bytes = fs::read(&path).map_err(|e| {
            SentimentError::ModelUnavailable(format!(
                "cannot read '{}': {e}. Has a training run completed?",
                path.display()
            ))
        })?;

        let file: ArtifactFile = serde_json::from_slice(&bytes).map_err(|e| {
            SentimentError::ModelUnavailable(format!("corrupt artifact '{}': {e}", path.display()))
        })?;

        if file.format_version != FORMAT_VERSION {
            return Err(SentimentError::ModelUnavailable(format!(
                "artifact format version {} is not supported (expected {})",
                file.format_version, FORMAT_VERSION
            )));
        }

        let artifact = ModelArtifact::new(file.vectorizer, file.classifier)?;
        tracing::debug!("Loaded model artifact from '{}'", path.display());
        Ok(artifact)
    }

    /// Write any serialisable config next to the artifact as pretty JSON.
    pub fn save_config<T: Serialize>(&self, config: &T) -> Result<(), SentimentError> {
        let json = serde_json::to_vec_pretty(config).map_err(|e| {
            SentimentError::PersistenceError(format!("cannot serialise config: {e}"))
        })?;
        self.write_atomic(CONFIG_FILE, &json)?;
        tracing::debug!("Saved training config to '{}'", self.dir.join(CONFIG_FILE).display());
        Ok(())
    }

    /// Write `bytes` to `<dir>/<name>` via a temp file and rename.
    fn write_atomic(&self, name: &str, bytes: &[u8]) -> Result<(), SentimentError> {
        let target = self.dir.join(name);
        let temp   = self.dir.join(format!("{name}.tmp"));

        let result = fs::create_dir_all(&self.dir)
            .and_then(|_| {
                let mut f = File::create(&temp)?;
                f.write_all(bytes)?;
                f.sync_all()
            })
            .and_then(|_| fs::rename(&temp, &target));

        result.map_err(|e| {
            // Best effort: the temp file may not exist at all
            let _ = fs::remove_file(&temp);
            SentimentError::PersistenceError(format!("cannot write '{}': {e}", target.display()))
        })?;

        // The new file is already in place; only durability is at stake
        if let Err(e) = sync_dir(&self.dir) {
            tracing::warn!("Could not sync directory '{}': {e}", self.dir.display());
        }
        Ok(())
    }
}

/// Flush directory entries (renames) to disk.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> std::io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}
