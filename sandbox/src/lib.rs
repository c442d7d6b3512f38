//! `mobilenet-sandbox` — Wasmtime host for a WASI image-classification module.
//!
//! This crate loads a compiled inference module, checks that it exposes the
//! pointer-and-length ABI the host drives, and runs it inside a Wasmtime
//! sandbox:
//!
//! - **ABI validation:** `memory`, `alloc(i32) -> i32` and
//!   `infer_from_ptrs(i32, i32, i32, i32) -> i32` must be exported
//! - **WASI shim:** only `wasi_snapshot_preview1` imports are linked
//! - **Memory bridge:** host buffers are copied in through the guest's own
//!   allocator and addressed as bounds-checked `GuestRegion`s
//! - **Limits:** bounded linear memory growth, optional fuel metering
//!
//! The primary entry points are [`Classifier::classify`] and
//! [`Classifier::classify_batch`].

pub mod error;
pub mod config;
pub mod memory;
pub mod host_impl;
pub mod validation;
pub mod linker;
pub mod bridge;
pub mod runtime;
pub mod classifier;

pub use error::SandboxError;
pub use config::SandboxConfig;
pub use memory::GuestRegion;
pub use bridge::GuestInstance;
pub use runtime::Sandbox;
pub use classifier::{BatchReport, Classifier, ItemOutcome};
