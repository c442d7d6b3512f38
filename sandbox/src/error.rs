//! Sandbox error types.

use mobilenet_hostapi::HostError;

/// Top-level error type for the sandbox crate.
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    /// Wasmtime engine, compilation, linking, or instantiation error.
    #[error("wasmtime error: {0}")]
    Wasmtime(#[from] anyhow::Error),

    /// Module does not satisfy the classifier export contract.
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Host-side failure (label resolution, input read).
    #[error("host error: {0}")]
    HostError(#[from] HostError),

    /// The guest allocator could not satisfy a request.
    #[error("guest allocation of {requested} bytes failed: {reason}")]
    AllocationFailure { requested: usize, reason: String },

    /// A guest region does not fit inside the current linear memory.
    #[error("guest region [{offset}, {offset}+{len}) exceeds memory size {memory_size}")]
    BoundsFailure {
        offset: u32,
        len: usize,
        memory_size: usize,
    },

    /// Fuel exhausted during a guest call.
    #[error("fuel exhausted (instruction limit)")]
    FuelExhausted,

    /// WASM guest trapped.
    #[error("guest trapped: {0}")]
    GuestTrapped(String),
}

impl SandboxError {
    /// Returns true if the guest returned a result code with no label.
    pub fn is_index_out_of_range(&self) -> bool {
        matches!(self, Self::HostError(e) if e.is_index_out_of_range())
    }
}
