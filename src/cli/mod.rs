// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and hands off to Layer 2.
//
//   train     — fit and persist a model from a review CSV
//   classify  — load the model and label review text

pub mod commands;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use commands::{ClassifyArgs, Commands, TrainArgs};

use crate::application::classify_use_case::{InferenceService, ServiceConfig};
use crate::application::train_use_case::{TrainConfig, TrainUseCase};
use crate::domain::error::SentimentError;
use crate::domain::review::Sentiment;

#[derive(Parser, Debug)]
#[command(
    name = "review-sentiment",
    version,
    about = "Train a bag-of-words linear SVM on movie reviews, then classify review sentiment."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case; this layer only routes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)    => run_train(args),
            Commands::Classify(args) => run_classify(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    let config: TrainConfig = args.into();
    tracing::info!("Starting training on corpus '{}'", config.corpus_path);

    let report = TrainUseCase::new(config)
        .execute()
        .context("Training failed")?;

    println!(
        "Trained on {} reviews ({} held out, {} skipped as empty); vocabulary {} terms.",
        report.train_size, report.eval_size, report.dropped_empty, report.vocabulary_size
    );
    if !report.converged {
        println!("Warning: optimiser stopped after {} iterations without converging.", report.iterations);
    }
    if let Some(eval) = report.evaluation {
        println!(
            "Held-out accuracy: {:.4} (precision {:.4}, recall {:.4}, f1 {:.4})",
            eval.accuracy(),
            eval.precision(),
            eval.recall(),
            eval.f1()
        );
    }
    println!("Model saved to {}", report.artifact_path.display());
    Ok(())
}

fn run_classify(args: ClassifyArgs) -> Result<()> {
    let service = InferenceService::load(&ServiceConfig::from(&args));

    if let Some(text) = args.text.as_deref() {
        let sentiment = service.classify_sentiment(text)?;
        println!("{sentiment}");
        return Ok(());
    }

    let stdin  = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = line.context("Cannot read stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        writeln!(out, "{}", render(service.classify_sentiment(&line)))?;
    }
    Ok(())
}

fn render(result: Result<Sentiment, SentimentError>) -> String {
    match result {
        Ok(sentiment) => sentiment.to_string(),
        Err(e)        => format!("error: {e}"),
    }
}
