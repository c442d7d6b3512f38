//! `mobilenet-classify` — run a MobileNet WASI module over a directory of images.
//!
//! Loads the compiled module, the model payload, and the label table once,
//! then classifies every file in the input directory and prints one line (or
//! JSON row) per item. Exits non-zero if the batch aborted or any item failed.

mod cli;
mod report;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use mobilenet_hostapi::{DirSource, LabelTable, ModelPayload};
use mobilenet_sandbox::{Classifier, Sandbox};
use tracing_subscriber::EnvFilter;

use crate::cli::Args;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let labels = LabelTable::from_file(&args.labels)
        .with_context(|| format!("loading labels from {}", args.labels.display()))?;
    let model = ModelPayload::from_file(&args.model)
        .with_context(|| format!("loading model from {}", args.model.display()))?;
    let sandbox = Sandbox::from_file(&args.module, args.sandbox_config())
        .with_context(|| format!("loading module {}", args.module.display()))?;

    let classifier = Classifier::new(sandbox, model, Arc::new(labels));
    let source = DirSource::new(&args.inputs);
    let report = classifier
        .classify_batch(&source, args.batch_config())
        .with_context(|| format!("classifying {}", args.inputs.display()))?;

    let stdout = std::io::stdout();
    report::render(&report, args.format, &mut stdout.lock())?;

    report::check(&report)
}
