// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Runs the full training pipeline in order:
//
//   Step 1: Load labelled reviews         (Layer 4 - data)
//   Step 2: Normalise text, drop empties  (Layer 4 - data)
//   Step 3: Stratified, seeded split      (Layer 4 - data)
//   Step 4: Fit vocabulary on train only  (Layer 5 - ml)
//   Step 5: Vectorize both partitions     (Layer 5 - ml)
//   Step 6: Fit the linear SVM            (Layer 5 - ml)
//   Step 7: Evaluate on held-out reviews  (Layer 6 - infra)
//   Step 8: Persist the ModelArtifact     (Layer 6 - infra)
//   Step 9: Record config and metrics     (Layer 6 - infra)
//
// Steps 1–8 are all-or-nothing: any error aborts the run and
// the previously stored artifact stays in place. Step 9 is
// diagnostic only; its failures are logged and ignored.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::data::loader::CsvCorpusLoader;
use crate::data::preprocessor::Preprocessor;
use crate::data::splitter::split_stratified;
use crate::domain::error::SentimentError;
use crate::domain::traits::CorpusSource;
use crate::infra::artifact_store::{ArtifactStore, ModelArtifact};
use crate::infra::metrics::{ClassificationReport, MetricsLogger, RunMetrics};
use crate::ml::model::{Loss, SvmParams};
use crate::ml::trainer::train_linear_svm;
use crate::ml::vectorizer::Vocabulary;

// ─── Training Configuration ──────────────────────────────────────────────────
// Every knob of a training run. Serialisable so the effective
// configuration can be stored next to the artifact it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub corpus_path:    String,
    pub model_dir:      String,
    pub max_features:   usize,
    pub lowercase:      bool,
    pub penalty:        f64,
    pub max_iterations: usize,
    pub tolerance:      f64,
    pub loss:           Loss,
    pub seed:           u64,
    pub eval_fraction:  f64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            corpus_path:    "data/IMDB Dataset.csv".to_string(),
            model_dir:      "models".to_string(),
            max_features:   5000,
            lowercase:      false,
            penalty:        0.001,
            max_iterations: 2000,
            tolerance:      1e-4,
            loss:           Loss::SquaredHinge,
            seed:           42,
            eval_fraction:  0.2,
        }
    }
}

impl TrainConfig {
    pub fn svm_params(&self) -> SvmParams {
        SvmParams {
            penalty:        self.penalty,
            max_iterations: self.max_iterations,
            tolerance:      self.tolerance,
            loss:           self.loss,
            seed:           self.seed,
        }
    }

    pub fn validate(&self) -> Result<(), SentimentError> {
        if !(0.0..1.0).contains(&self.eval_fraction) {
            return Err(SentimentError::InvalidInput(format!(
                "eval_fraction must be in [0, 1), got {}",
                self.eval_fraction
            )));
        }
        self.svm_params()
            .validate()
            .map_err(|e| SentimentError::InvalidInput(format!("invalid training configuration: {e}")))
    }
}

// ─── TrainReport ─────────────────────────────────────────────────────────────
/// What a finished training run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainReport {
    /// Reviews read from the corpus
    pub total_reviews:   usize,
    /// Reviews left empty by normalisation and skipped
    pub dropped_empty:   usize,
    pub train_size:      usize,
    pub eval_size:       usize,
    pub vocabulary_size: usize,
    pub iterations:      usize,
    pub converged:       bool,
    /// None when `eval_fraction` left no evaluation reviews
    pub evaluation:      Option<ClassificationReport>,
    pub artifact_path:   PathBuf,
}

impl TrainReport {
    pub fn accuracy(&self) -> Option<f64> {
        self.evaluation.map(|e| e.accuracy())
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// Train on the CSV corpus at `config.corpus_path`.
    pub fn execute(&self) -> Result<TrainReport, SentimentError> {
        let loader = CsvCorpusLoader::new(&self.config.corpus_path);
        self.execute_with(&loader)
    }

    /// Train on reviews from any corpus source.
    pub fn execute_with(&self, source: &dyn CorpusSource) -> Result<TrainReport, SentimentError> {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Step 1: Load labelled reviews ────────────────────────────────────
        let reviews       = source.load_all()?;
        let total_reviews = reviews.len();
        if total_reviews == 0 {
            return Err(SentimentError::CorpusError("corpus contains no reviews".to_string()));
        }

        // ── Step 2: Normalise; a review with nothing left is not a sample ────
        let preprocessor = Preprocessor::new();
        let samples: Vec<(String, bool)> = reviews
            .iter()
            .map(|r| (preprocessor.normalize(&r.text), r.label()))
            .filter(|(text, _)| !text.is_empty())
            .collect();
        let dropped_empty = total_reviews - samples.len();
        if dropped_empty > 0 {
            tracing::warn!("Skipped {} reviews that were empty after normalisation", dropped_empty);
        }

        // ── Step 3: Stratified split ─────────────────────────────────────────
        let (train, eval) = split_stratified(samples, cfg.eval_fraction, cfg.seed, |s| s.1);
        tracing::info!("Split: {} train, {} evaluation", train.len(), eval.len());

        let (train_texts, train_labels): (Vec<String>, Vec<bool>) = train.into_iter().unzip();
        let (eval_texts,  eval_labels):  (Vec<String>, Vec<bool>) = eval.into_iter().unzip();

        // ── Step 4: Vocabulary from the training partition only ──────────────
        let vocabulary = Vocabulary::fit(&train_texts, cfg.max_features, cfg.lowercase);
        tracing::info!("Vocabulary: {} terms", vocabulary.len());

        // ── Step 5: Vectorize ────────────────────────────────────────────────
        let train_x = vocabulary.transform_all(&train_texts);
        let eval_x  = vocabulary.transform_all(&eval_texts);

        // ── Step 6: Fit the classifier ───────────────────────────────────────
        tracing::info!(
            "Training linear SVM (C={}, loss={:?}, max_iterations={})",
            cfg.penalty,
            cfg.loss,
            cfg.max_iterations
        );
        let classifier = train_linear_svm(&train_x, &train_labels, &cfg.svm_params())?;

        // ── Step 7: Evaluate ─────────────────────────────────────────────────
        let evaluation = if eval_x.is_empty() {
            None
        } else {
            let predictions: Vec<bool> = eval_x.iter().map(|x| classifier.predict(x)).collect();
            let report = ClassificationReport::from_predictions(&predictions, &eval_labels);
            tracing::info!(
                "Evaluation: accuracy={:.4} precision={:.4} recall={:.4} f1={:.4}",
                report.accuracy(),
                report.precision(),
                report.recall(),
                report.f1()
            );
            Some(report)
        };

        // ── Step 8: Persist vocabulary + classifier as one artifact ──────────
        let iterations = classifier.iterations();
        let converged  = classifier.converged();
        let artifact   = ModelArtifact::new(vocabulary, classifier)
            .map_err(|e| SentimentError::PersistenceError(format!("refusing to persist: {e}")))?;

        let store = ArtifactStore::new(&cfg.model_dir);
        store.save(&artifact)?;

        let report = TrainReport {
            total_reviews,
            dropped_empty,
            train_size: train_labels.len(),
            eval_size: eval_labels.len(),
            vocabulary_size: artifact.vocabulary().len(),
            iterations,
            converged,
            evaluation,
            artifact_path: store.artifact_path(),
        };

        // ── Step 9: Diagnostics ──────────────────────────────────────────────
        if let Err(e) = store.save_config(cfg) {
            tracing::warn!("Could not record training config: {e}");
        }
        if let Err(e) = log_run(&cfg.model_dir, cfg.penalty, &report) {
            tracing::warn!("Could not record run metrics: {e:#}");
        }

        Ok(report)
    }
}

fn log_run(dir: &str, penalty: f64, report: &TrainReport) -> anyhow::Result<()> {
    let eval = report.evaluation;
    MetricsLogger::new(dir)?.log(&RunMetrics {
        train_size:      report.train_size,
        eval_size:       report.eval_size,
        vocabulary_size: report.vocabulary_size,
        penalty,
        iterations:      report.iterations,
        converged:       report.converged,
        accuracy:        eval.map(|e| e.accuracy()),
        precision:       eval.map(|e| e.precision()),
        recall:          eval.map(|e| e.recall()),
        f1:              eval.map(|e| e.f1()),
    })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::classify_use_case::{InferenceService, InputPolicy, ServiceConfig};
    use crate::data::loader::InMemoryCorpus;
    use crate::infra::artifact_store::ARTIFACT_FILE;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn four_reviews() -> InMemoryCorpus {
        InMemoryCorpus::from_labeled([
            ("great film loved it", "positive"),
            ("terrible waste of time", "negative"),
            ("amazing performances", "positive"),
            ("awful boring plot", "negative"),
        ])
        .unwrap()
    }

    fn config(model_dir: &Path) -> TrainConfig {
        TrainConfig {
            model_dir: model_dir.display().to_string(),
            max_features: 50,
            eval_fraction: 0.0,
            ..TrainConfig::default()
        }
    }

    /// Ten clearly positive and ten clearly negative reviews.
    fn twenty_reviews() -> InMemoryCorpus {
        let pos = ["wonderful", "brilliant", "moving", "superb", "delightful"];
        let neg = ["dreadful", "boring", "clumsy", "tedious", "awful"];
        let mut rows = Vec::new();
        for i in 0..10 {
            rows.push((format!("a {} and {} film<br />", pos[i % 5], pos[(i + 1) % 5]), "positive"));
            rows.push((format!("a {} and {} film http://x.co", neg[i % 5], neg[(i + 2) % 5]), "negative"));
        }
        InMemoryCorpus::from_labeled(rows.iter().map(|(t, l)| (t.as_str(), *l))).unwrap()
    }

    #[test]
    fn test_four_review_scenario_classifies_new_text() {
        let dir    = tempdir().unwrap();
        let report = TrainUseCase::new(config(dir.path()))
            .execute_with(&four_reviews())
            .unwrap();

        assert_eq!(report.train_size, 4);
        assert_eq!(report.eval_size, 0);
        assert!(report.evaluation.is_none());
        assert!(report.vocabulary_size <= 50);
        assert!(report.converged);

        let service = InferenceService::load(&ServiceConfig {
            model_dir:  dir.path().display().to_string(),
            min_length: 10,
            max_length: None,
        });
        assert!(service.classify("loved the amazing performances").unwrap());
        assert!(!service.classify("awful terrible waste").unwrap());
    }

    #[test]
    fn test_short_input_rejected_before_model() {
        let dir = tempdir().unwrap();
        TrainUseCase::new(config(dir.path()))
            .execute_with(&four_reviews())
            .unwrap();

        let store   = ArtifactStore::new(dir.path());
        let service = InferenceService::from_store(&store, InputPolicy::default());
        let err     = service.classify("ok").unwrap_err();
        assert!(matches!(err, SentimentError::InvalidInput(_)));
    }

    #[test]
    fn test_corrupted_artifact_disables_service() {
        let dir = tempdir().unwrap();
        TrainUseCase::new(config(dir.path()))
            .execute_with(&four_reviews())
            .unwrap();

        fs::write(dir.path().join(ARTIFACT_FILE), b"not json at all").unwrap();
        let service = InferenceService::load(&ServiceConfig {
            model_dir:  dir.path().display().to_string(),
            min_length: 10,
            max_length: None,
        });
        assert!(!service.is_ready());
        for text in ["loved the amazing performances", "ok", ""] {
            assert!(matches!(
                service.classify(text),
                Err(SentimentError::ModelUnavailable(_))
            ));
        }

        fs::remove_file(dir.path().join(ARTIFACT_FILE)).unwrap();
        let service = InferenceService::load(&ServiceConfig {
            model_dir:  dir.path().display().to_string(),
            min_length: 10,
            max_length: None,
        });
        assert!(matches!(
            service.classify("loved the amazing performances"),
            Err(SentimentError::ModelUnavailable(_))
        ));
    }

    #[test]
    fn test_refitting_is_reproducible() {
        let dir_a = tempdir().unwrap();
        let dir_b = tempdir().unwrap();
        let mut cfg_a = config(dir_a.path());
        cfg_a.eval_fraction = 0.2;
        let mut cfg_b = config(dir_b.path());
        cfg_b.eval_fraction = 0.2;

        TrainUseCase::new(cfg_a).execute_with(&twenty_reviews()).unwrap();
        TrainUseCase::new(cfg_b).execute_with(&twenty_reviews()).unwrap();

        let a = fs::read(dir_a.path().join(ARTIFACT_FILE)).unwrap();
        let b = fs::read(dir_b.path().join(ARTIFACT_FILE)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_evaluates_held_out_reviews() {
        let dir = tempdir().unwrap();
        let cfg = TrainConfig { eval_fraction: 0.2, ..config(dir.path()) };

        let report = TrainUseCase::new(cfg).execute_with(&twenty_reviews()).unwrap();
        assert_eq!(report.train_size, 16);
        assert_eq!(report.eval_size, 4);

        let eval = report.evaluation.unwrap();
        assert_eq!(eval.total(), 4);
        assert_eq!(eval.true_positives + eval.false_negatives, 2);
        assert!(report.accuracy().is_some());

        // Diagnostics sit next to the artifact
        assert!(dir.path().join("train_config.json").exists());
        assert!(dir.path().join("metrics.csv").exists());
    }

    #[test]
    fn test_vocabulary_ignores_evaluation_reviews() {
        // Every review carries its own marker token, e.g. "tagab"
        let marker = |i: usize| {
            format!("tag{}{}", (b'a' + (i / 26) as u8) as char, (b'a' + (i % 26) as u8) as char)
        };
        let rows: Vec<(String, &str)> = (0..30)
            .map(|i| {
                if i % 2 == 0 {
                    (format!("a superb moving film {}", marker(i)), "positive")
                } else {
                    (format!("a dreadful tedious film {}", marker(i)), "negative")
                }
            })
            .collect();
        let corpus = InMemoryCorpus::from_labeled(rows.iter().map(|(t, l)| (t.as_str(), *l))).unwrap();

        let dir = tempdir().unwrap();
        let cfg = TrainConfig { eval_fraction: 0.2, max_features: 1000, ..config(dir.path()) };
        let report = TrainUseCase::new(cfg.clone()).execute_with(&corpus).unwrap();
        assert_eq!(report.eval_size, 6);

        // Same seed, same samples: the same partition the run used
        let preprocessor = Preprocessor::new();
        let samples: Vec<(String, bool)> = rows
            .iter()
            .map(|(t, l)| (preprocessor.normalize(t), *l == "positive"))
            .collect();
        let (train, eval) = split_stratified(samples, cfg.eval_fraction, cfg.seed, |s| s.1);
        assert_eq!(eval.len(), 6);

        let marker_of = |text: &str| text.rsplit(' ').next().unwrap().to_string();
        let artifact  = ArtifactStore::new(dir.path()).load().unwrap();
        let terms     = artifact.vocabulary().terms();

        for (text, _) in &eval {
            let m = marker_of(text);
            assert!(!terms.contains(&m), "evaluation-only token {m} leaked into the vocabulary");
        }
        for (text, _) in &train {
            let m = marker_of(text);
            assert!(terms.contains(&m), "training token {m} missing from the vocabulary");
        }
    }

    #[test]
    fn test_markup_only_reviews_are_dropped() {
        let dir    = tempdir().unwrap();
        let mut rows: Vec<(&str, &str)> = vec![("<br /><br />", "positive"), ("https://spam.example", "negative")];
        rows.extend([
            ("great film loved it", "positive"),
            ("terrible waste of time", "negative"),
        ]);
        let corpus = InMemoryCorpus::from_labeled(rows).unwrap();

        let report = TrainUseCase::new(config(dir.path())).execute_with(&corpus).unwrap();
        assert_eq!(report.total_reviews, 4);
        assert_eq!(report.dropped_empty, 2);
        assert_eq!(report.train_size, 2);
    }

    #[test]
    fn test_corpus_error_aborts_and_keeps_previous_artifact() {
        let dir = tempdir().unwrap();
        TrainUseCase::new(config(dir.path()))
            .execute_with(&four_reviews())
            .unwrap();
        let before = fs::read(dir.path().join(ARTIFACT_FILE)).unwrap();

        let csv_path = dir.path().join("bad.csv");
        fs::write(&csv_path, "review,sentiment\nnice movie,positive\nhmm,mixed\n").unwrap();
        let cfg = TrainConfig {
            corpus_path: csv_path.display().to_string(),
            ..config(dir.path())
        };

        let err = TrainUseCase::new(cfg).execute().unwrap_err();
        assert!(matches!(err, SentimentError::CorpusError(_)));
        assert_eq!(fs::read(dir.path().join(ARTIFACT_FILE)).unwrap(), before);
    }

    #[test]
    fn test_single_class_corpus_is_rejected() {
        let dir    = tempdir().unwrap();
        let corpus = InMemoryCorpus::from_labeled([("good fun film", "positive"), ("nice one", "positive")]).unwrap();
        let err    = TrainUseCase::new(config(dir.path())).execute_with(&corpus).unwrap_err();
        assert!(matches!(err, SentimentError::CorpusError(_)));
        assert!(!dir.path().join(ARTIFACT_FILE).exists());
    }

    #[test]
    fn test_empty_corpus_is_rejected() {
        let dir = tempdir().unwrap();
        let err = TrainUseCase::new(config(dir.path()))
            .execute_with(&InMemoryCorpus::default())
            .unwrap_err();
        assert!(matches!(err, SentimentError::CorpusError(_)));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let dir = tempdir().unwrap();
        let cfg = TrainConfig { eval_fraction: 1.0, ..config(dir.path()) };
        assert!(matches!(
            TrainUseCase::new(cfg).execute_with(&four_reviews()),
            Err(SentimentError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_trains_from_csv_file() {
        let dir      = tempdir().unwrap();
        let csv_path = dir.path().join("reviews.csv");
        fs::write(
            &csv_path,
            "review,sentiment\n\
             \"great film, loved it\",positive\n\
             terrible waste of time,negative\n\
             amazing performances,positive\n\
             \"awful <i>boring</i> plot\",negative\n",
        )
        .unwrap();

        let cfg = TrainConfig {
            corpus_path: csv_path.display().to_string(),
            ..config(&dir.path().join("models"))
        };
        let report = TrainUseCase::new(cfg).execute().unwrap();
        assert_eq!(report.total_reviews, 4);
        assert!(report.artifact_path.exists());
    }
}
