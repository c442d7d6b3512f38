//! WASM module validation — classifier ABI checks.
//!
//! Validates that a compiled module can be driven by the bridge before the
//! sandbox accepts it. Checks:
//!
//! 1. `memory` export present
//! 2. `alloc` and `infer_from_ptrs` exported with i32-only signatures
//! 3. Every import is a function from `wasi_snapshot_preview1`

use wasmtime::{ExternType, Module, ValType};

use crate::error::SandboxError;

/// Guest allocator export: `alloc(size) -> offset`.
pub const ALLOC_FN: &str = "alloc";
/// Guest inference export: `infer_from_ptrs(model_ptr, model_len, input_ptr, input_len) -> index`.
pub const INFER_FN: &str = "infer_from_ptrs";
/// Guest linear memory export.
pub const MEMORY: &str = "memory";
/// Optional WASI reactor initializer.
pub const INITIALIZE_FN: &str = "_initialize";

/// Expected export: (name, param_count_of_i32, result_count_of_i32).
const REQUIRED_EXPORTS: &[(&str, usize, usize)] = &[(ALLOC_FN, 1, 1), (INFER_FN, 4, 1)];

/// The only import module the linker provides.
const ALLOWED_IMPORT_MODULE: &str = "wasi_snapshot_preview1";

fn is_i32(vt: &ValType) -> bool {
    matches!(vt, ValType::I32)
}

/// Validate that a module meets the classifier ABI.
pub fn validate_module(module: &Module) -> Result<(), SandboxError> {
    validate_exports(module)?;
    validate_imports(module)?;
    Ok(())
}

fn validate_exports(module: &Module) -> Result<(), SandboxError> {
    let has_memory = module
        .exports()
        .any(|e| e.name() == MEMORY && matches!(e.ty(), ExternType::Memory(_)));
    if !has_memory {
        return Err(SandboxError::ValidationError(format!(
            "module must export '{}'",
            MEMORY
        )));
    }

    for &(name, expected_param_count, expected_result_count) in REQUIRED_EXPORTS {
        let export = module
            .exports()
            .find(|e| e.name() == name)
            .ok_or_else(|| {
                SandboxError::ValidationError(format!("missing required export: {}", name))
            })?;

        let func_ty = match export.ty() {
            ExternType::Func(ft) => ft,
            _ => {
                return Err(SandboxError::ValidationError(format!(
                    "export '{}' must be a function",
                    name
                )));
            }
        };

        let params: Vec<ValType> = func_ty.params().collect();
        let results: Vec<ValType> = func_ty.results().collect();

        if params.len() != expected_param_count || !params.iter().all(is_i32) {
            return Err(SandboxError::ValidationError(format!(
                "export '{}' has wrong param signature: expected {} i32 params, got {} params",
                name,
                expected_param_count,
                params.len()
            )));
        }

        if results.len() != expected_result_count || !results.iter().all(is_i32) {
            return Err(SandboxError::ValidationError(format!(
                "export '{}' has wrong result signature: expected {} i32 results, got {} results",
                name,
                expected_result_count,
                results.len()
            )));
        }
    }

    Ok(())
}

fn validate_imports(module: &Module) -> Result<(), SandboxError> {
    for import in module.imports() {
        let module_name = import.module();

        if module_name != ALLOWED_IMPORT_MODULE {
            return Err(SandboxError::ValidationError(format!(
                "import from unknown module '{}' (only '{}' allowed): {}",
                module_name,
                ALLOWED_IMPORT_MODULE,
                import.name()
            )));
        }

        if !matches!(import.ty(), ExternType::Func(_)) {
            return Err(SandboxError::ValidationError(format!(
                "non-function import not allowed: {}::{}",
                module_name,
                import.name()
            )));
        }
    }

    Ok(())
}
