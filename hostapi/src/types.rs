//! Batch configuration and result types.
//!
//! `BatchConfig` decides how guest instances are shared between items and
//! what happens when an item fails. Defaults favour isolation and fail-fast.

use std::time::Duration;

/// How guest instances are assigned to batch items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Isolation {
    /// Fresh instance for every item. A trap or corrupted guest heap cannot
    /// leak into the next item; each item pays one instantiation.
    #[default]
    PerItem,
    /// One instance reused across the batch. Guest memory only grows, since
    /// the host never frees what it allocated.
    PerBatch,
}

/// What a batch does when one item fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop the batch at the first failing item.
    #[default]
    Abort,
    /// Record the failure and move on to the next item.
    Continue,
}

/// Per-batch execution settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchConfig {
    pub isolation: Isolation,
    pub failure_policy: FailurePolicy,
}

/// A resolved prediction for one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
    /// Raw 1-based class index returned by the guest.
    pub index: i32,
    /// Label at `index` in the label table.
    pub label: String,
    /// Wall-clock time spent inside the inference export.
    pub elapsed: Duration,
}
