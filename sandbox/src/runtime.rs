//! Sandbox runtime — Wasmtime engine, module loading, and instantiation.
//!
//! `Sandbox` compiles and validates the inference module once, pre-links it
//! against the WASI shim, and then stamps out fresh [`GuestInstance`]s on
//! demand. Each instance owns its own `Store`, so instances never share
//! linear memory.

use std::path::Path;
use std::time::Instant;

use wasmtime::{Config, Engine, InstancePre, Module, Store, Trap};

use crate::bridge::GuestInstance;
use crate::config::SandboxConfig;
use crate::error::SandboxError;
use crate::host_impl::HostState;
use crate::linker::build_linker;
use crate::validation::{validate_module, ALLOC_FN, INFER_FN, INITIALIZE_FN, MEMORY};

/// The compiled, validated inference module.
///
/// Cheap to instantiate repeatedly: compilation and import resolution happen
/// once in [`Sandbox::new`].
pub struct Sandbox {
    engine: Engine,
    module: Module,
    pre: InstancePre<HostState>,
    config: SandboxConfig,
}

impl Sandbox {
    /// Create a new sandbox from WASM bytecode (binary or text format).
    ///
    /// Validates the module's exports and imports before accepting.
    pub fn new(wasm_bytes: &[u8], config: SandboxConfig) -> Result<Self, SandboxError> {
        let engine = create_engine(&config)?;
        let module = Module::new(&engine, wasm_bytes)?;
        Self::from_module(engine, module, config)
    }

    /// Load from a `.wasm` file path.
    pub fn from_file(path: &Path, config: SandboxConfig) -> Result<Self, SandboxError> {
        let start = Instant::now();
        let engine = create_engine(&config)?;
        let module = Module::from_file(&engine, path)?;
        tracing::info!(
            path = %path.display(),
            elapsed = ?start.elapsed(),
            "compiled guest module"
        );
        Self::from_module(engine, module, config)
    }

    fn from_module(
        engine: Engine,
        module: Module,
        config: SandboxConfig,
    ) -> Result<Self, SandboxError> {
        validate_module(&module)?;
        let linker = build_linker(&engine)?;
        let pre = linker.instantiate_pre(&module)?;
        Ok(Self {
            engine,
            module,
            pre,
            config,
        })
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    /// Create a fresh guest instance with its own store and memory.
    ///
    /// Runs the module's `_initialize` export if it has one.
    pub fn instantiate(&self) -> Result<GuestInstance, SandboxError> {
        let start = Instant::now();

        let mut store = Store::new(&self.engine, HostState::new(&self.config));
        store.limiter(|state| &mut state.limits);
        if let Some(fuel) = self.config.fuel_limit {
            store.set_fuel(fuel)?;
        }

        let instance = handle_trap(self.pre.instantiate(&mut store))?;

        let memory = instance
            .get_memory(&mut store, MEMORY)
            .ok_or_else(|| SandboxError::ValidationError("no memory export".into()))?;
        let alloc = instance.get_typed_func::<i32, i32>(&mut store, ALLOC_FN)?;
        let infer =
            instance.get_typed_func::<(i32, i32, i32, i32), i32>(&mut store, INFER_FN)?;

        if let Some(init) = instance.get_func(&mut store, INITIALIZE_FN) {
            let init = init.typed::<(), ()>(&store)?;
            handle_trap(init.call(&mut store, ()))?;
        }

        tracing::debug!(elapsed = ?start.elapsed(), "instantiated guest module");
        Ok(GuestInstance::new(
            store,
            memory,
            alloc,
            infer,
            self.config.fuel_limit,
        ))
    }
}

/// Create a Wasmtime engine for the configured limits.
fn create_engine(config: &SandboxConfig) -> Result<Engine, SandboxError> {
    let mut wasm_config = Config::new();

    // Fuel metering only when a limit is set; metering slows tight loops.
    wasm_config.consume_fuel(config.fuel_limit.is_some());

    // The bridge addresses a single exported memory.
    wasm_config.wasm_multi_memory(false);

    Ok(Engine::new(&wasm_config)?)
}

/// Convert a guest call result, classifying traps.
///
/// Fuel exhaustion → `SandboxError::FuelExhausted`
/// Other traps → `SandboxError::GuestTrapped`
pub(crate) fn handle_trap<R>(result: Result<R, anyhow::Error>) -> Result<R, SandboxError> {
    result.map_err(|e| match e.downcast_ref::<Trap>() {
        Some(Trap::OutOfFuel) => SandboxError::FuelExhausted,
        _ => SandboxError::GuestTrapped(format!("{:#}", e)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        (module
            (memory (export "memory") 1)
            (func (export "alloc") (param i32) (result i32)
                i32.const 1024)
            (func (export "infer_from_ptrs") (param i32 i32 i32 i32) (result i32)
                i32.const 1)
        )
    "#;

    #[test]
    fn test_create_engine() {
        assert!(create_engine(&SandboxConfig::default()).is_ok());
        let metered = SandboxConfig {
            fuel_limit: Some(1_000),
            ..SandboxConfig::default()
        };
        assert!(create_engine(&metered).is_ok());
    }

    #[test]
    fn test_sandbox_rejects_empty_wasm() {
        let result = Sandbox::new(&[], SandboxConfig::default());
        assert!(matches!(result, Err(SandboxError::Wasmtime(_))));
    }

    #[test]
    fn test_sandbox_accepts_minimal_valid_module() {
        let sandbox = Sandbox::new(MINIMAL.as_bytes(), SandboxConfig::default());
        assert!(sandbox.is_ok());
    }

    #[test]
    fn test_sandbox_keeps_config() {
        let config = SandboxConfig {
            max_memory_pages: 16,
            fuel_limit: Some(10_000),
            inherit_stdio: false,
        };
        let sandbox = Sandbox::new(MINIMAL.as_bytes(), config).unwrap();
        assert_eq!(sandbox.config().max_memory_pages, 16);
        assert_eq!(sandbox.config().fuel_limit, Some(10_000));
        assert!(sandbox.module().get_export("infer_from_ptrs").is_some());
    }

    #[test]
    fn test_sandbox_rejects_missing_export() {
        let wat = r#"
            (module
                (memory (export "memory") 1)
                (func (export "alloc") (param i32) (result i32)
                    i32.const 1024)
            )
        "#;
        let result = Sandbox::new(wat.as_bytes(), SandboxConfig::default());
        assert!(matches!(result, Err(SandboxError::ValidationError(_))));
    }

    #[test]
    fn test_instances_do_not_share_memory() {
        let sandbox = Sandbox::new(MINIMAL.as_bytes(), SandboxConfig::default()).unwrap();
        let mut first = sandbox.instantiate().unwrap();
        let second = sandbox.instantiate().unwrap();

        let region = first.write(b"only in the first instance").unwrap();
        assert_eq!(first.read(region).unwrap(), b"only in the first instance");
        assert_eq!(second.read(region).unwrap(), vec![0u8; region.len as usize]);
    }

    #[test]
    fn test_initialize_runs_on_instantiate() {
        let wat = r#"
            (module
                (memory (export "memory") 1)
                (global $ready (mut i32) (i32.const 0))
                (func (export "_initialize")
                    i32.const 1
                    global.set $ready)
                (func (export "alloc") (param i32) (result i32)
                    i32.const 1024)
                (func (export "infer_from_ptrs") (param i32 i32 i32 i32) (result i32)
                    global.get $ready)
            )
        "#;
        let sandbox = Sandbox::new(wat.as_bytes(), SandboxConfig::default()).unwrap();
        let mut instance = sandbox.instantiate().unwrap();
        let region = instance.write(&[]).unwrap();
        assert_eq!(instance.infer(region, region).unwrap(), 1);
    }

    #[test]
    fn test_trapping_initialize() {
        let wat = r#"
            (module
                (memory (export "memory") 1)
                (func (export "_initialize") unreachable)
                (func (export "alloc") (param i32) (result i32)
                    i32.const 1024)
                (func (export "infer_from_ptrs") (param i32 i32 i32 i32) (result i32)
                    i32.const 1)
            )
        "#;
        let sandbox = Sandbox::new(wat.as_bytes(), SandboxConfig::default()).unwrap();
        assert!(matches!(
            sandbox.instantiate(),
            Err(SandboxError::GuestTrapped(_))
        ));
    }
}
