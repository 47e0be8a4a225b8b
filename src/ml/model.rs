// ============================================================
// Layer 5 — Classifier State
// ============================================================
// A fitted linear classifier:
//
//   score(x) = w · x + b
//   predict(x) = score(x) >= 0      (true = positive)
//
// The state also records the hyperparameters it was trained
// with and how the optimiser finished, so a persisted model
// fully describes the run that produced it.

use serde::{Deserialize, Serialize};

use crate::ml::vectorizer::FeatureVector;

/// Loss minimised by the SVM.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Loss {
    /// max(0, 1 - y·score)
    Hinge,
    /// max(0, 1 - y·score)²
    #[default]
    SquaredHinge,
}

/// Hyperparameters fixed at training time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvmParams {
    /// C. Smaller means stronger regularisation.
    pub penalty: f64,

    /// Upper bound on passes over the training set
    pub max_iterations: usize,

    /// Stop once no dual coordinate violates optimality by more than this
    pub tolerance: f64,

    pub loss: Loss,

    /// Seeds the per-pass permutation of training examples
    pub seed: u64,
}

impl Default for SvmParams {
    fn default() -> Self {
        Self {
            penalty:        0.001,
            max_iterations: 2000,
            tolerance:      1e-4,
            loss:           Loss::SquaredHinge,
            seed:           42,
        }
    }
}

impl SvmParams {
    /// Check ranges. Returns a message describing the first bad value.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.penalty.is_finite() && self.penalty > 0.0) {
            return Err(format!("penalty must be positive and finite, got {}", self.penalty));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(format!("tolerance must be positive and finite, got {}", self.tolerance));
        }
        Ok(())
    }
}

/// Learned weights, bias and training provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierState {
    weights:    Vec<f64>,
    bias:       f64,
    params:     SvmParams,
    iterations: usize,
    converged:  bool,
}

impl ClassifierState {
    /// Assemble a state from known weights, e.g. one trained elsewhere.
    pub fn new(weights: Vec<f64>, bias: f64, params: SvmParams) -> Self {
        Self { weights, bias, params, iterations: 0, converged: true }
    }

    pub(crate) fn with_outcome(mut self, iterations: usize, converged: bool) -> Self {
        self.iterations = iterations;
        self.converged  = converged;
        self
    }

    /// Signed distance-like score; positive side means positive sentiment.
    ///
    /// Feature indices beyond the weight vector contribute nothing.
    pub fn decision_function(&self, feature: &FeatureVector) -> f64 {
        feature.dot(&self.weights) + self.bias
    }

    /// `true` when the score is non-negative.
    pub fn predict(&self, feature: &FeatureVector) -> bool {
        self.decision_function(feature) >= 0.0
    }

    /// Number of features the weights expect
    pub fn dim(&self) -> usize {
        self.weights.len()
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn params(&self) -> &SvmParams {
        &self.params
    }

    /// Passes over the data the optimiser actually ran
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Whether all weights and the bias are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.bias.is_finite() && self.weights.iter().all(|w| w.is_finite())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn state(weights: Vec<f64>, bias: f64) -> ClassifierState {
        ClassifierState::new(weights, bias, SvmParams::default())
    }

    #[test]
    fn test_predict_uses_sign_of_score() {
        let s = state(vec![1.0, -2.0], 0.0);
        assert!(s.predict(&FeatureVector::from_dense(&[3.0, 1.0])));
        assert!(!s.predict(&FeatureVector::from_dense(&[1.0, 1.0])));
    }

    #[test]
    fn test_zero_score_is_positive() {
        let s = state(vec![1.0, -1.0], 0.0);
        assert_eq!(s.decision_function(&FeatureVector::from_dense(&[2.0, 2.0])), 0.0);
        assert!(s.predict(&FeatureVector::from_dense(&[2.0, 2.0])));
    }

    #[test]
    fn test_zero_vector_falls_back_to_bias() {
        let s = state(vec![5.0, 5.0, 5.0], -0.25);
        let zero = FeatureVector::zeros(3);
        assert_eq!(s.decision_function(&zero), -0.25);
        assert!(!s.predict(&zero));
    }

    #[test]
    fn test_mismatched_dimension_ignores_extra_features() {
        let s = state(vec![2.0], -1.0);
        let wider = FeatureVector::from_dense(&[1.0, 5.0, 5.0]);
        assert_eq!(s.decision_function(&wider), 1.0);
        assert_eq!(s.decision_function(&FeatureVector::zeros(0)), -1.0);
    }

    #[test]
    fn test_params_validation() {
        assert!(SvmParams::default().validate().is_ok());

        let bad = SvmParams { penalty: 0.0, ..SvmParams::default() };
        assert!(bad.validate().is_err());

        let bad = SvmParams { tolerance: f64::NAN, ..SvmParams::default() };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_loss_serialises_snake_case() {
        assert_eq!(serde_json::to_string(&Loss::SquaredHinge).unwrap(), "\"squared_hinge\"");
    }
}
