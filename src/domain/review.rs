// ============================================================
// Layer 3 — Review Domain Types
// ============================================================
// A labelled training review, and the two-valued sentiment
// the whole pipeline predicts.
//
// The classifier contract is boolean (true = positive), so
// Sentiment converts to and from bool losslessly.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::SentimentError;

/// Literal used for positive reviews in the training corpus
pub const POSITIVE_LABEL: &str = "positive";

/// Literal used for negative reviews in the training corpus
pub const NEGATIVE_LABEL: &str = "negative";

/// Binary sentiment of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
}

impl Sentiment {
    /// Parse a corpus label. Only the two fixed literals are accepted.
    pub fn from_label(label: &str) -> Result<Self, SentimentError> {
        match label {
            POSITIVE_LABEL => Ok(Sentiment::Positive),
            NEGATIVE_LABEL => Ok(Sentiment::Negative),
            other => Err(SentimentError::CorpusError(format!(
                "unknown sentiment label '{other}', expected '{POSITIVE_LABEL}' or '{NEGATIVE_LABEL}'"
            ))),
        }
    }

    /// The corpus literal for this sentiment
    pub fn label(self) -> &'static str {
        match self {
            Sentiment::Positive => POSITIVE_LABEL,
            Sentiment::Negative => NEGATIVE_LABEL,
        }
    }

    pub fn is_positive(self) -> bool {
        self == Sentiment::Positive
    }
}

impl From<bool> for Sentiment {
    fn from(positive: bool) -> Self {
        if positive { Sentiment::Positive } else { Sentiment::Negative }
    }
}

impl From<Sentiment> for bool {
    fn from(s: Sentiment) -> Self {
        s.is_positive()
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One training example: raw review text and its label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledReview {
    /// Review text as supplied, before normalisation
    pub text: String,

    pub sentiment: Sentiment,
}

impl LabeledReview {
    /// Accepts &str or String for the text.
    pub fn new(text: impl Into<String>, sentiment: Sentiment) -> Self {
        Self {
            text: text.into(),
            sentiment,
        }
    }

    /// The boolean label the classifier trains on
    pub fn label(&self) -> bool {
        self.sentiment.is_positive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_both_labels() {
        assert_eq!(Sentiment::from_label("positive").unwrap(), Sentiment::Positive);
        assert_eq!(Sentiment::from_label("negative").unwrap(), Sentiment::Negative);
    }

    #[test]
    fn test_rejects_other_labels() {
        // Labels are exact literals, no case folding
        for bad in ["Positive", "neutral", "", "1"] {
            let err = Sentiment::from_label(bad).unwrap_err();
            assert!(matches!(err, SentimentError::CorpusError(_)), "label {bad:?}");
        }
    }

    #[test]
    fn test_bool_conversion() {
        assert_eq!(Sentiment::from(true), Sentiment::Positive);
        assert!(!bool::from(Sentiment::Negative));
        assert_eq!(Sentiment::Negative.to_string(), "negative");
    }

    #[test]
    fn test_review_label() {
        let r = LabeledReview::new("great film", Sentiment::Positive);
        assert!(r.label());
    }
}
