// ============================================================
// Layer 5 — Vocabulary / Vectorizer
// ============================================================
// Bag-of-words counts over a fixed vocabulary.
//
// Tokens are maximal ASCII-letter runs bounded by word
// boundaries (`\b[a-zA-Z]+\b`): "10/10", "!!!" and "abc123"
// produce no tokens. Matching is case-sensitive unless the
// vocabulary was fitted with `lowercase = true`; that flag is
// part of the vocabulary so inference always tokenises the
// way training did.
//
// fit:
//   1. count every token occurrence across the corpus
//   2. order by count (descending), ties by first appearance
//   3. keep the first `max_features`; position = index
//
// transform:
//   count vocabulary tokens in one text, ignore the rest.
//   Vectors are stored sparsely but always have length |V|.

use std::borrow::Cow;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-zA-Z]+\b").expect("token pattern is valid"));

/// Iterate over the raw tokens of `text`, in order.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    TOKEN_REGEX.find_iter(text).map(|m| m.as_str())
}

// ─── FeatureVector ────────────────────────────────────────────────────────────
/// Token counts for one text under one vocabulary.
///
/// Only non-zero entries are stored, sorted by index; `len()` is
/// always the vocabulary size.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    dim:     usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    /// The all-zero vector of length `dim`.
    pub fn zeros(dim: usize) -> Self {
        Self { dim, entries: Vec::new() }
    }

    /// Build from a dense slice; zeros are dropped.
    pub fn from_dense(values: &[f64]) -> Self {
        let entries = values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0.0)
            .map(|(i, v)| (i, *v))
            .collect();
        Self { dim: values.len(), entries }
    }

    /// Fixed length, equal to the vocabulary size
    pub fn len(&self) -> usize {
        self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.dim == 0
    }

    /// Number of non-zero entries
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value at `index` (0.0 when absent or out of range)
    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |&(i, _)| i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// Non-zero (index, value) pairs in index order
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dim];
        for &(i, v) in &self.entries {
            dense[i] = v;
        }
        dense
    }

    pub fn squared_norm(&self) -> f64 {
        self.entries.iter().map(|&(_, v)| v * v).sum()
    }

    /// Dot product with a dense weight slice. Indices beyond the
    /// slice contribute nothing.
    pub fn dot(&self, weights: &[f64]) -> f64 {
        self.entries
            .iter()
            .map(|&(i, v)| weights.get(i).map_or(0.0, |w| w * v))
            .sum()
    }
}

// ─── Vocabulary ───────────────────────────────────────────────────────────────
/// Serialised form: the ordered term list is the whole mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct VocabularyRecord {
    lowercase: bool,
    terms:     Vec<String>,
}

/// Ordered, immutable token → index mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "VocabularyRecord", into = "VocabularyRecord")]
pub struct Vocabulary {
    terms:     Vec<String>,
    index:     HashMap<String, usize>,
    lowercase: bool,
}

impl Vocabulary {
    /// Learn a vocabulary of at most `max_features` tokens from `corpus`.
    ///
    /// Deterministic for a fixed corpus order, `max_features` and
    /// `lowercase`.
    pub fn fit<S: AsRef<str>>(corpus: &[S], max_features: usize, lowercase: bool) -> Self {
        // token -> (occurrences, first-seen rank)
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();

        for doc in corpus {
            for token in tokenize(doc.as_ref()) {
                let token = fold_case(token, lowercase);
                let next_rank = counts.len();
                counts
                    .entry(token.into_owned())
                    .or_insert((0, next_rank))
                    .0 += 1;
            }
        }

        let mut ranked: Vec<(String, (usize, usize))> = counts.into_iter().collect();
        ranked.sort_by_key(|(_, (count, first_seen))| (Reverse(*count), *first_seen));
        ranked.truncate(max_features);

        let terms: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();

        tracing::debug!(
            "Fitted vocabulary: {} terms (max_features={}, lowercase={})",
            terms.len(),
            max_features,
            lowercase
        );

        Self::from_ordered(terms, lowercase)
    }

    fn from_ordered(terms: Vec<String>, lowercase: bool) -> Self {
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Self { terms, index, lowercase }
    }

    /// Count vocabulary tokens in `text`. Unknown tokens are ignored;
    /// empty or fully unmatched text gives the all-zero vector.
    pub fn transform(&self, text: &str) -> FeatureVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();

        for token in tokenize(text) {
            let token = fold_case(token, self.lowercase);
            if let Some(&idx) = self.index.get(&*token) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        FeatureVector {
            dim:     self.terms.len(),
            entries: counts.into_iter().collect(),
        }
    }

    /// Vectorize many texts with this vocabulary.
    pub fn transform_all<S: AsRef<str>>(&self, texts: &[S]) -> Vec<FeatureVector> {
        texts.iter().map(|t| self.transform(t.as_ref())).collect()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Index of `token`, folded the same way `transform` folds it.
    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.index.get(&*fold_case(token, self.lowercase)).copied()
    }

    /// Terms in index order
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn lowercase(&self) -> bool {
        self.lowercase
    }
}

fn fold_case(token: &str, lowercase: bool) -> Cow<'_, str> {
    if lowercase {
        Cow::Owned(token.to_ascii_lowercase())
    } else {
        Cow::Borrowed(token)
    }
}

impl From<Vocabulary> for VocabularyRecord {
    fn from(v: Vocabulary) -> Self {
        Self { lowercase: v.lowercase, terms: v.terms }
    }
}

impl TryFrom<VocabularyRecord> for Vocabulary {
    type Error = String;

    fn try_from(record: VocabularyRecord) -> Result<Self, Self::Error> {
        let vocab = Vocabulary::from_ordered(record.terms, record.lowercase);
        if vocab.index.len() != vocab.terms.len() {
            return Err("vocabulary contains duplicate terms".to_string());
        }
        if let Some(bad) = vocab.terms.iter().find(|t| !is_token(t)) {
            return Err(format!("vocabulary term '{bad}' is not a valid token"));
        }
        if vocab.lowercase {
            if let Some(bad) = vocab.terms.iter().find(|t| t.bytes().any(|b| b.is_ascii_uppercase())) {
                return Err(format!("vocabulary term '{bad}' is not lowercase"));
            }
        }
        Ok(vocab)
    }
}

fn is_token(term: &str) -> bool {
    !term.is_empty() && term.bytes().all(|b| b.is_ascii_alphabetic())
}
