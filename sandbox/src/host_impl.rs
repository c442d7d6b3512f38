//! Per-instance state held in the Wasmtime Store.
//!
//! `HostState` carries the WASI preview1 context the guest's system calls run
//! against, plus the resource limiter that caps linear memory growth. One is
//! created for every guest instance and dropped with it.

use wasmtime::{StoreLimits, StoreLimitsBuilder};
use wasmtime_wasi::preview1::WasiP1Ctx;
use wasmtime_wasi::WasiCtxBuilder;

use crate::config::SandboxConfig;

/// Per-instance state held in the Wasmtime `Store`.
pub struct HostState {
    /// WASI preview1 context. No preopened directories, no environment.
    pub wasi: WasiP1Ctx,
    /// Memory ceiling enforced on `memory.grow`.
    pub limits: StoreLimits,
}

impl HostState {
    /// Create state for a fresh instance.
    pub fn new(config: &SandboxConfig) -> Self {
        let mut builder = WasiCtxBuilder::new();
        if config.inherit_stdio {
            builder.inherit_stdio();
        }
        let limits = StoreLimitsBuilder::new()
            .memory_size(config.max_memory_bytes())
            .instances(1)
            .build();
        Self {
            wasi: builder.build_p1(),
            limits,
        }
    }
}
