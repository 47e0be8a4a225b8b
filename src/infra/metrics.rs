// ============================================================
// Layer 6 — Evaluation Metrics and Run Log
// ============================================================
// ClassificationReport summarises predictions on the
// evaluation partition (positive = true):
//
//   accuracy  = (tp + tn) / total
//   precision = tp / (tp + fp)
//   recall    = tp / (tp + fn)
//   f1        = 2 · precision · recall / (precision + recall)
//
// Undefined ratios (zero denominator) are reported as 0.0.
//
// MetricsLogger appends one row per training run to
// <model_dir>/metrics.csv, writing the header only when the
// file is new.
//
//   train_size,eval_size,vocabulary_size,penalty,iterations,converged,accuracy,precision,recall,f1
//   40000,10000,5000,0.001,187,true,0.8731,0.8692,0.8784,0.8738

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Confusion counts and derived scores for binary predictions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub true_positives:  usize,
    pub false_positives: usize,
    pub true_negatives:  usize,
    pub false_negatives: usize,
}

impl ClassificationReport {
    /// Tally `predictions` against `labels`, pairwise.
    pub fn from_predictions(predictions: &[bool], labels: &[bool]) -> Self {
        debug_assert_eq!(predictions.len(), labels.len());
        let mut r = Self {
            true_positives:  0,
            false_positives: 0,
            true_negatives:  0,
            false_negatives: 0,
        };
        for (&p, &l) in predictions.iter().zip(labels) {
            match (p, l) {
                (true,  true)  => r.true_positives  += 1,
                (true,  false) => r.false_positives += 1,
                (false, false) => r.true_negatives  += 1,
                (false, true)  => r.false_negatives += 1,
            }
        }
        r
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positives + self.true_negatives, self.total())
    }

    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r == 0.0 { 0.0 } else { 2.0 * p * r / (p + r) }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

/// One CSV row describing a finished training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    pub train_size:      usize,
    pub eval_size:       usize,
    pub vocabulary_size: usize,
    pub penalty:         f64,
    pub iterations:      usize,
    pub converged:       bool,
    /// Empty when the run had no evaluation partition
    pub accuracy:        Option<f64>,
    pub precision:       Option<f64>,
    pub recall:          Option<f64>,
    pub f1:              Option<f64>,
}

/// Appends RunMetrics rows to a CSV file.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Log into `<dir>/metrics.csv`, creating `dir` if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create metrics directory '{}'", dir.display()))?;
        Ok(Self { csv_path: dir.join("metrics.csv") })
    }

    pub fn log(&self, m: &RunMetrics) -> Result<()> {
        let is_new = !self.csv_path.exists();

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(is_new)
            .from_writer(file);
        writer.serialize(m)?;
        writer.flush()?;

        tracing::debug!("Logged run metrics to '{}'", self.csv_path.display());
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_report_scores() {
        let preds  = [true, true, false, false, true];
        let labels = [true, false, false, true, true];
        let r      = ClassificationReport::from_predictions(&preds, &labels);

        assert_eq!(r.true_positives,  2);
        assert_eq!(r.false_positives, 1);
        assert_eq!(r.true_negatives,  1);
        assert_eq!(r.false_negatives, 1);
        assert_eq!(r.total(), 5);
        assert!((r.accuracy()  - 0.6).abs() < 1e-12);
        assert!((r.precision() - 2.0 / 3.0).abs() < 1e-12);
        assert!((r.recall()    - 2.0 / 3.0).abs() < 1e-12);
        assert!((r.f1()        - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_report_is_all_zero() {
        let r = ClassificationReport::from_predictions(&[], &[]);
        assert_eq!(r.accuracy(), 0.0);
        assert_eq!(r.f1(), 0.0);
    }

    fn row(accuracy: Option<f64>) -> RunMetrics {
        RunMetrics {
            train_size:      8,
            eval_size:       2,
            vocabulary_size: 30,
            penalty:         0.001,
            iterations:      12,
            converged:       true,
            accuracy,
            precision:       None,
            recall:          None,
            f1:              None,
        }
    }

    #[test]
    fn test_logger_writes_header_once() {
        let dir    = tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path()).unwrap();

        logger.log(&row(Some(0.5))).unwrap();
        logger.log(&row(None)).unwrap();

        let text  = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("train_size,eval_size"));
        assert_eq!(lines[1], "8,2,30,0.001,12,true,0.5,,,");
        assert_eq!(lines[2], "8,2,30,0.001,12,true,,,,");
    }
}
