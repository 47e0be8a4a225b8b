// ============================================================
// Layer 4 — Corpus Loader
// ============================================================
// Reads labelled reviews for training.
//
// The CSV layout is the one the IMDB 50k review dataset ships
// with: a header row, then one record per review.
//
//   review,sentiment
//   "One of the other reviewers has mentioned...",positive
//   "A wonderful little production. <br /><br />...",positive
//   "Basically there's a family where a little boy...",negative
//
// Fields may be quoted and contain commas and newlines; the
// csv crate handles that. The label column must be exactly
// "positive" or "negative". Anything else aborts loading.
//
// Reference: csv crate documentation (serde deserialization)

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::error::SentimentError;
use crate::domain::review::{LabeledReview, Sentiment};
use crate::domain::traits::CorpusSource;

/// One raw CSV row before label validation.
#[derive(Debug, Deserialize)]
struct CorpusRecord {
    review:    String,
    sentiment: String,
}

/// Loads a review corpus from a CSV file with `review` and
/// `sentiment` columns.
pub struct CsvCorpusLoader {
    path: PathBuf,
}

impl CsvCorpusLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CorpusSource for CsvCorpusLoader {
    fn load_all(&self) -> Result<Vec<LabeledReview>, SentimentError> {
        let mut reader = csv::Reader::from_path(&self.path).map_err(|e| {
            SentimentError::CorpusError(format!(
                "cannot open corpus '{}': {e}",
                self.path.display()
            ))
        })?;

        let mut reviews = Vec::new();

        for (idx, result) in reader.deserialize::<CorpusRecord>().enumerate() {
            // Records are numbered from 1, not counting the header
            let record = result.map_err(|e| {
                SentimentError::CorpusError(format!(
                    "malformed record {} in '{}': {e}",
                    idx + 1,
                    self.path.display()
                ))
            })?;

            let sentiment = Sentiment::from_label(&record.sentiment).map_err(|e| {
                SentimentError::CorpusError(format!("record {}: {e}", idx + 1))
            })?;

            reviews.push(LabeledReview::new(record.review, sentiment));
        }

        tracing::info!(
            "Loaded {} reviews from '{}'",
            reviews.len(),
            self.path.display()
        );
        Ok(reviews)
    }
}

/// A corpus already held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCorpus {
    reviews: Vec<LabeledReview>,
}

impl InMemoryCorpus {
    pub fn new(reviews: Vec<LabeledReview>) -> Self {
        Self { reviews }
    }

    /// Build from (text, label) pairs using the corpus label literals.
    pub fn from_labeled<'a>(
        rows: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, SentimentError> {
        let reviews = rows
            .into_iter()
            .map(|(text, label)| Ok(LabeledReview::new(text, Sentiment::from_label(label)?)))
            .collect::<Result<Vec<_>, SentimentError>>()?;
        Ok(Self { reviews })
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }
}

impl CorpusSource for InMemoryCorpus {
    fn load_all(&self) -> Result<Vec<LabeledReview>, SentimentError> {
        Ok(self.reviews.clone())
    }
}
