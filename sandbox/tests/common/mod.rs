//! Shared test helpers for integration tests.
//!
//! Provides WAT stub modules implementing the classifier ABI, label tables,
//! and sandbox/classifier factories. Wasmtime compiles the WAT text directly.

#![allow(dead_code)]

use std::sync::Arc;

use mobilenet_hostapi::{LabelTable, ModelPayload};
use mobilenet_sandbox::{Classifier, Sandbox, SandboxConfig};

// ── Allocator ──

/// Bump allocator starting at offset 1024 that grows memory on demand and
/// returns 0 when `memory.grow` is refused.
const GROWING_ALLOC: &str = r#"
    (memory (export "memory") 1)
    (global $next (mut i32) (i32.const 1024))
    (func (export "alloc") (param $size i32) (result i32)
        (local $ptr i32)
        (local $end i32)
        (local $have i32)
        (local.set $ptr (global.get $next))
        (local.set $end (i32.add (local.get $ptr) (local.get $size)))
        (local.set $have (i32.shl (memory.size) (i32.const 16)))
        (if (i32.gt_u (local.get $end) (local.get $have))
            (then
                (if (i32.eq
                        (memory.grow
                            (i32.shr_u
                                (i32.add
                                    (i32.sub (local.get $end) (local.get $have))
                                    (i32.const 65535))
                                (i32.const 16)))
                        (i32.const -1))
                    (then (return (i32.const 0))))))
        (global.set $next (local.get $end))
        (local.get $ptr))
"#;

fn with_infer(infer_body: &str) -> String {
    format!(
        r#"(module
            {alloc}
            (func (export "infer_from_ptrs")
                (param $model_ptr i32) (param $model_len i32)
                (param $input_ptr i32) (param $input_len i32)
                (result i32)
                {body})
        )"#,
        alloc = GROWING_ALLOC,
        body = infer_body
    )
}

// ── Stub Modules ──

/// `infer_from_ptrs` ignores its inputs and returns `result`.
pub fn constant_module(result: i32) -> String {
    with_infer(&format!("i32.const {}", result))
}

/// `infer_from_ptrs` returns the first input byte, or 0 for empty input.
pub fn first_input_byte_module() -> String {
    with_infer(
        r#"(if (result i32) (i32.eqz (local.get $input_len))
            (then (i32.const 0))
            (else (i32.load8_u (local.get $input_ptr))))"#,
    )
}

/// `infer_from_ptrs` returns the model length.
pub fn model_len_module() -> String {
    with_infer("local.get $model_len")
}

/// Like `first_input_byte_module`, but traps when the first byte is 0xFF.
pub fn trap_on_ff_module() -> String {
    with_infer(
        r#"(if (i32.eq (i32.load8_u (local.get $input_ptr)) (i32.const 255))
            (then unreachable))
        (i32.load8_u (local.get $input_ptr))"#,
    )
}

/// `infer_from_ptrs` never returns.
pub fn spinning_module() -> String {
    with_infer(
        r#"(loop $spin (br $spin))
        i32.const 0"#,
    )
}

/// `alloc` always reports out-of-memory.
pub const NULL_ALLOC_MODULE: &str = r#"
    (module
        (memory (export "memory") 1)
        (func (export "alloc") (param i32) (result i32)
            i32.const 0)
        (func (export "infer_from_ptrs") (param i32 i32 i32 i32) (result i32)
            i32.const 1)
    )
"#;

/// `alloc` aborts the way a Rust guest does on allocation failure.
pub const TRAPPING_ALLOC_MODULE: &str = r#"
    (module
        (memory (export "memory") 1)
        (func (export "alloc") (param i32) (result i32)
            unreachable)
        (func (export "infer_from_ptrs") (param i32 i32 i32 i32) (result i32)
            i32.const 1)
    )
"#;

/// `alloc` hands out an offset past the end of memory.
pub const LYING_ALLOC_MODULE: &str = r#"
    (module
        (memory (export "memory") 1)
        (func (export "alloc") (param i32) (result i32)
            i32.const 131072)
        (func (export "infer_from_ptrs") (param i32 i32 i32 i32) (result i32)
            i32.const 1)
    )
"#;

/// `alloc` returns -1, a sentinel some allocators use for failure.
pub const NEGATIVE_ALLOC_MODULE: &str = r#"
    (module
        (memory (export "memory") 1)
        (func (export "alloc") (param i32) (result i32)
            i32.const -1)
        (func (export "infer_from_ptrs") (param i32 i32 i32 i32) (result i32)
            i32.const 1)
    )
"#;

// ── Resources ──

/// The three-label table used across tests.
pub fn animals() -> Arc<LabelTable> {
    Arc::new(LabelTable::from_text("cat\ndog\nfish\n"))
}

/// A small stand-in for the serialized model.
pub fn model() -> ModelPayload {
    ModelPayload::new(b"frozen-graph-bytes".to_vec())
}

// ── Factories ──

pub fn sandbox(wat: &str) -> Sandbox {
    sandbox_with_config(wat, SandboxConfig::default())
}

pub fn sandbox_with_config(wat: &str, config: SandboxConfig) -> Sandbox {
    let config = SandboxConfig {
        inherit_stdio: false,
        ..config
    };
    Sandbox::new(wat.as_bytes(), config).expect("stub module must load")
}

pub fn classifier(wat: &str) -> Classifier {
    Classifier::new(sandbox(wat), model(), animals())
}

pub fn classifier_with_config(wat: &str, config: SandboxConfig) -> Classifier {
    Classifier::new(sandbox_with_config(wat, config), model(), animals())
}
