// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Two subcommands: `train` and `classify`.
//
// clap's derive macros generate --help text, missing-argument
// errors and string → number conversion.

use clap::{Args, Subcommand, ValueEnum};

use crate::application::classify_use_case::{InputPolicy, ServiceConfig};
use crate::application::train_use_case::TrainConfig;
use crate::ml::model::Loss;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the sentiment model on a labelled review CSV
    Train(TrainArgs),

    /// Classify review text with a trained model
    Classify(ClassifyArgs),
}

/// Loss function choices exposed on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LossArg {
    Hinge,
    SquaredHinge,
}

impl From<LossArg> for Loss {
    fn from(a: LossArg) -> Self {
        match a {
            LossArg::Hinge        => Loss::Hinge,
            LossArg::SquaredHinge => Loss::SquaredHinge,
        }
    }
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// CSV file with `review` and `sentiment` columns
    #[arg(long, default_value = "data/IMDB Dataset.csv")]
    pub corpus: String,

    /// Directory to write the model artifact, config and metrics to
    #[arg(long, default_value = "models")]
    pub model_dir: String,

    /// Keep at most this many of the most frequent tokens
    #[arg(long, default_value_t = 5000)]
    pub max_features: usize,

    /// Lowercase tokens before counting (applied again at inference)
    #[arg(long)]
    pub lowercase: bool,

    /// SVM penalty C; smaller means stronger regularisation
    #[arg(long, default_value_t = 0.001)]
    pub penalty: f64,

    /// Maximum optimiser passes over the training set
    #[arg(long, default_value_t = 2000)]
    pub max_iterations: usize,

    /// Convergence tolerance on the dual optimality violation
    #[arg(long, default_value_t = 1e-4)]
    pub tolerance: f64,

    #[arg(long, value_enum, default_value_t = LossArg::SquaredHinge)]
    pub loss: LossArg,

    /// Seed for the split and the optimiser's example order
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Fraction of each label held out for evaluation
    #[arg(long, default_value_t = 0.2)]
    pub eval_fraction: f64,
}

/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            corpus_path:    a.corpus,
            model_dir:      a.model_dir,
            max_features:   a.max_features,
            lowercase:      a.lowercase,
            penalty:        a.penalty,
            max_iterations: a.max_iterations,
            tolerance:      a.tolerance,
            loss:           a.loss.into(),
            seed:           a.seed,
            eval_fraction:  a.eval_fraction,
        }
    }
}

/// All arguments for the `classify` command.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Review text; when omitted, each non-empty stdin line is classified
    #[arg(long)]
    pub text: Option<String>,

    /// Directory holding the trained model artifact
    #[arg(long, default_value = "models")]
    pub model_dir: String,

    /// Reject reviews shorter than this many characters
    #[arg(long, default_value_t = InputPolicy::DEFAULT_MIN_LENGTH)]
    pub min_length: usize,

    /// Reject reviews longer than this many characters
    #[arg(long)]
    pub max_length: Option<usize>,
}

impl From<&ClassifyArgs> for ServiceConfig {
    fn from(a: &ClassifyArgs) -> Self {
        ServiceConfig {
            model_dir:  a.model_dir.clone(),
            min_length: a.min_length,
            max_length: a.max_length,
        }
    }
}
