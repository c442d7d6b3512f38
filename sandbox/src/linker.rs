//! Linker setup — the WASI shim the guest is instantiated against.
//!
//! The inference module is built for `wasm32-wasi` and imports a handful of
//! `wasi_snapshot_preview1` functions (clock, random, fd_write for panics).
//! Nothing else is provided; validation rejects modules importing anything
//! outside that namespace.

use wasmtime::{Engine, Linker};
use wasmtime_wasi::preview1;

use crate::error::SandboxError;
use crate::host_impl::HostState;

/// Build a linker with WASI preview1 registered.
pub fn build_linker(engine: &Engine) -> Result<Linker<HostState>, SandboxError> {
    let mut linker = Linker::new(engine);
    preview1::add_to_linker_sync(&mut linker, |state: &mut HostState| &mut state.wasi)?;
    Ok(linker)
}
