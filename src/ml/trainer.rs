// ============================================================
// Layer 5 — Linear SVM Trainer
// ============================================================
// Fits w, b minimising
//
//   ½‖w‖² + ½b² + C · Σ loss(yᵢ (w·xᵢ + b))      yᵢ ∈ {-1, +1}
//
// by coordinate descent on the dual:
//
//   for each pass (order shuffled with a seeded StdRng):
//     for each example i:
//       G  = yᵢ (w·xᵢ + b) - 1 + Dᵢᵢ αᵢ
//       PG = G projected onto the box [0, U]
//       αᵢ ← clamp(αᵢ - G / Qᵢᵢ, 0, U)
//       w  += Δαᵢ yᵢ xᵢ ;  b += Δαᵢ yᵢ
//     stop when max |PG| <= tolerance
//
//   hinge:          U = C, Dᵢᵢ = 0
//   squared hinge:  U = ∞, Dᵢᵢ = 1 / 2C
//   Qᵢᵢ = Dᵢᵢ + ‖xᵢ‖² + 1     (the +1 is the bias feature)
//
// The intercept is treated as one more feature fixed at 1.0,
// so it is regularised like any weight.
//
// Running out of passes is not an error: the current weights
// are returned, marked as not converged, with a warning.
//
// Reference: Hsieh, Chang, Lin, Keerthi, Sundararajan (2008)

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::domain::error::SentimentError;
use crate::ml::model::{ClassifierState, Loss, SvmParams};
use crate::ml::vectorizer::FeatureVector;

/// PG magnitudes below this are treated as zero (no update).
const UPDATE_EPSILON: f64 = 1e-12;

/// Fit a linear SVM on `features` with boolean `labels` (true = positive).
///
/// Fails only on unusable input: mismatched lengths, an empty set,
/// a single class, or vectors of differing length.
pub fn train_linear_svm(
    features: &[FeatureVector],
    labels:   &[bool],
    params:   &SvmParams,
) -> Result<ClassifierState, SentimentError> {
    params
        .validate()
        .map_err(|e| SentimentError::InvalidInput(format!("invalid SVM parameters: {e}")))?;
    validate_training_set(features, labels)?;

    let n   = features.len();
    let dim = features[0].len();

    let (upper, diag) = match params.loss {
        Loss::Hinge        => (params.penalty, 0.0),
        Loss::SquaredHinge => (f64::INFINITY, 0.5 / params.penalty),
    };

    let y:  Vec<f64> = labels.iter().map(|&l| if l { 1.0 } else { -1.0 }).collect();
    let qd: Vec<f64> = features.iter().map(|x| diag + x.squared_norm() + 1.0).collect();

    let mut alpha   = vec![0.0f64; n];
    let mut weights = vec![0.0f64; dim];
    let mut bias    = 0.0f64;

    let mut rng   = StdRng::seed_from_u64(params.seed);
    let mut order: Vec<usize> = (0..n).collect();

    let mut iterations = 0usize;
    let mut converged  = false;

    while iterations < params.max_iterations {
        iterations += 1;
        order.shuffle(&mut rng);

        let mut max_violation = 0.0f64;

        for &i in &order {
            let x = &features[i];
            let g = y[i] * (x.dot(&weights) + bias) - 1.0 + diag * alpha[i];

            let pg = if alpha[i] <= 0.0 {
                g.min(0.0)
            } else if alpha[i] >= upper {
                g.max(0.0)
            } else {
                g
            };
            max_violation = max_violation.max(pg.abs());

            if pg.abs() > UPDATE_EPSILON {
                let old  = alpha[i];
                alpha[i] = (old - g / qd[i]).clamp(0.0, upper);

                let delta = (alpha[i] - old) * y[i];
                for (j, v) in x.iter() {
                    weights[j] += delta * v;
                }
                bias += delta;
            }
        }

        tracing::trace!("pass {}: max violation {:.3e}", iterations, max_violation);

        if max_violation <= params.tolerance {
            converged = true;
            break;
        }
    }

    if converged {
        tracing::debug!("SVM converged after {} passes", iterations);
    } else {
        tracing::warn!(
            "SVM did not converge within {} iterations; returning current weights \
             (consider raising max_iterations)",
            params.max_iterations
        );
    }

    Ok(ClassifierState::new(weights, bias, params.clone()).with_outcome(iterations, converged))
}

fn validate_training_set(features: &[FeatureVector], labels: &[bool]) -> Result<(), SentimentError> {
    if features.len() != labels.len() {
        return Err(SentimentError::CorpusError(format!(
            "{} feature vectors but {} labels",
            features.len(),
            labels.len()
        )));
    }
    if features.is_empty() {
        return Err(SentimentError::CorpusError("training set is empty".to_string()));
    }

    let positives = labels.iter().filter(|&&l| l).count();
    if positives == 0 || positives == labels.len() {
        return Err(SentimentError::CorpusError(
            "training set must contain both positive and negative reviews".to_string(),
        ));
    }

    let dim = features[0].len();
    if let Some(bad) = features.iter().find(|f| f.len() != dim) {
        return Err(SentimentError::CorpusError(format!(
            "feature vectors differ in length ({} vs {})",
            dim,
            bad.len()
        )));
    }
    Ok(())
}
