//! Classification orchestration.
//!
//! `Classifier` ties the sandbox to the two process-wide resources (model
//! payload and label table) and runs the per-item sequence:
//!
//! 1. write the model bytes into guest memory
//! 2. write the input bytes into guest memory
//! 3. call `infer_from_ptrs` with both regions
//! 4. resolve the returned index against the label table
//!
//! No retries and no timeouts. How instances are shared and what a failure
//! does to the rest of a batch is decided by [`BatchConfig`].

use std::sync::Arc;
use std::time::Instant;

use mobilenet_hostapi::{
    BatchConfig, FailurePolicy, InputSource, Isolation, LabelTable, ModelPayload, Prediction,
};

use crate::bridge::GuestInstance;
use crate::error::SandboxError;
use crate::runtime::Sandbox;

/// Result of classifying one batch item.
#[derive(Debug)]
pub struct ItemOutcome {
    /// Item name as reported by the input source.
    pub name: String,
    pub result: Result<Prediction, SandboxError>,
}

/// Outcomes of a batch, in processing order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<ItemOutcome>,
    /// True if the batch stopped early under `FailurePolicy::Abort`.
    pub aborted: bool,
}

impl BatchReport {
    /// Items that produced a prediction.
    pub fn predictions(&self) -> impl Iterator<Item = (&str, &Prediction)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(|p| (o.name.as_str(), p)))
    }

    /// Items that failed.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &SandboxError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.name.as_str(), e)))
    }

    /// True if every processed item succeeded and the batch ran to the end.
    pub fn is_success(&self) -> bool {
        !self.aborted && self.failures().next().is_none()
    }
}

/// Runs the inference module over inputs.
pub struct Classifier {
    sandbox: Sandbox,
    model: ModelPayload,
    labels: Arc<LabelTable>,
}

impl Classifier {
    pub fn new(sandbox: Sandbox, model: ModelPayload, labels: Arc<LabelTable>) -> Self {
        tracing::info!(
            model_size = model.len(),
            model_digest = %model.short_digest(),
            labels = labels.len(),
            "classifier ready"
        );
        Self {
            sandbox,
            model,
            labels,
        }
    }

    pub fn sandbox(&self) -> &Sandbox {
        &self.sandbox
    }

    pub fn model(&self) -> &ModelPayload {
        &self.model
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    /// Classify one input in a fresh, isolated guest instance.
    pub fn classify(&self, input: &[u8]) -> Result<Prediction, SandboxError> {
        let mut instance = self.sandbox.instantiate()?;
        self.classify_with(&mut instance, input)
    }

    /// Classify one input using an existing instance.
    ///
    /// Copies the model again on every call; regions from earlier calls are
    /// neither reused nor freed.
    pub fn classify_with(
        &self,
        instance: &mut GuestInstance,
        input: &[u8],
    ) -> Result<Prediction, SandboxError> {
        instance.refuel()?;
        let model = instance.write(self.model.bytes())?;
        let input = instance.write(input)?;

        let start = Instant::now();
        let index = instance.infer(model, input)?;
        let elapsed = start.elapsed();
        tracing::debug!(index, elapsed = ?elapsed, "inference finished");

        let label = self.labels.resolve(index)?.to_owned();
        Ok(Prediction {
            index,
            label,
            elapsed,
        })
    }

    /// Classify every item of `source`.
    ///
    /// Returns `Err` only if the source cannot be enumerated. Per-item
    /// failures are recorded in the report; under `FailurePolicy::Abort` the
    /// first one also ends the batch.
    pub fn classify_batch(
        &self,
        source: &dyn InputSource,
        config: BatchConfig,
    ) -> Result<BatchReport, SandboxError> {
        let names = source.names()?;
        tracing::info!(
            items = names.len(),
            isolation = ?config.isolation,
            failure_policy = ?config.failure_policy,
            "starting batch"
        );

        let mut report = BatchReport::default();
        let mut shared: Option<GuestInstance> = None;

        for name in names {
            let result = self.run_item(source, &name, config.isolation, &mut shared);
            match &result {
                Ok(prediction) => tracing::info!(
                    item = %name,
                    index = prediction.index,
                    label = %prediction.label,
                    elapsed = ?prediction.elapsed,
                    "classified"
                ),
                Err(err) => tracing::warn!(item = %name, error = %err, "item failed"),
            }

            let failed = result.is_err();
            report.outcomes.push(ItemOutcome { name, result });
            if failed && config.failure_policy == FailurePolicy::Abort {
                report.aborted = true;
                break;
            }
        }

        Ok(report)
    }

    fn run_item(
        &self,
        source: &dyn InputSource,
        name: &str,
        isolation: Isolation,
        shared: &mut Option<GuestInstance>,
    ) -> Result<Prediction, SandboxError> {
        let bytes = source.read(name)?;
        match isolation {
            Isolation::PerItem => self.classify(&bytes),
            Isolation::PerBatch => {
                let mut instance = match shared.take() {
                    Some(instance) if !instance.is_poisoned() => instance,
                    _ => self.sandbox.instantiate()?,
                };
                let result = self.classify_with(&mut instance, &bytes);
                *shared = Some(instance);
                result
            }
        }
    }
}
