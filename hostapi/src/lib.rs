//! `mobilenet-hostapi` — host-side types for the MobileNet WASI classifier.
//!
//! Everything here lives on the host side of the sandbox boundary and never
//! touches wasmtime:
//!
//! - `LabelTable` — 1-indexed class labels and the prediction resolver
//! - `ModelPayload` — shared, immutable model bytes with a BLAKE3 digest
//! - `InputSource` trait — where batch items come from
//! - `DirSource` / `MemSource` — directory-backed and in-memory sources
//! - `BatchConfig` — isolation and failure policy for a batch
//! - `HostError` — host-side error type

pub mod error;
pub mod types;
pub mod labels;
pub mod payload;
pub mod input_source;
pub mod dir_source;
pub mod mem_source;

// Re-export commonly used types at the crate root.
pub use error::HostError;
pub use types::{BatchConfig, FailurePolicy, Isolation, Prediction};
pub use labels::{resolve, LabelTable};
pub use payload::ModelPayload;
pub use input_source::InputSource;
pub use dir_source::DirSource;
pub use mem_source::MemSource;
