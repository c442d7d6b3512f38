//! Guest memory bridge — moving host buffers across the sandbox boundary.
//!
//! A `GuestInstance` is one live instantiation of the inference module. The
//! host copies a buffer in by asking the guest's own `alloc` export for space
//! and writing into the returned region; the resulting `GuestRegion`s are
//! what `infer_from_ptrs` receives.
//!
//! The host never frees guest memory. Every region stays valid for the rest
//! of the instance's life, and two writes never alias.

use wasmtime::{Memory, Store, TypedFunc};

use crate::error::SandboxError;
use crate::host_impl::HostState;
use crate::memory::{self, GuestRegion};
use crate::runtime::handle_trap;

/// A live guest instance with its exported allocator, memory, and entry point.
///
/// Not shareable between callers: all access goes through `&mut self`.
pub struct GuestInstance {
    store: Store<HostState>,
    memory: Memory,
    alloc: TypedFunc<i32, i32>,
    infer: TypedFunc<(i32, i32, i32, i32), i32>,
    fuel_limit: Option<u64>,
    poisoned: bool,
}

impl GuestInstance {
    pub(crate) fn new(
        store: Store<HostState>,
        memory: Memory,
        alloc: TypedFunc<i32, i32>,
        infer: TypedFunc<(i32, i32, i32, i32), i32>,
        fuel_limit: Option<u64>,
    ) -> Self {
        Self {
            store,
            memory,
            alloc,
            infer,
            fuel_limit,
            poisoned: false,
        }
    }

    /// Copy `bytes` into guest memory and return the region holding them.
    ///
    /// Asks the guest allocator for `bytes.len()` bytes, then validates the
    /// returned offset against the memory size as it is after the call,
    /// since allocation may grow memory.
    pub fn write(&mut self, bytes: &[u8]) -> Result<GuestRegion, SandboxError> {
        let requested = bytes.len();
        let len = u32::try_from(requested)
            .ok()
            .filter(|len| *len <= i32::MAX as u32)
            .ok_or_else(|| SandboxError::AllocationFailure {
                requested,
                reason: "larger than the 32-bit guest address space".into(),
            })?;

        let offset = match handle_trap(self.alloc.call(&mut self.store, len as i32)) {
            Ok(ptr) => ptr as u32,
            Err(SandboxError::GuestTrapped(msg)) => {
                self.poisoned = true;
                return Err(SandboxError::AllocationFailure {
                    requested,
                    reason: format!("allocator trapped: {}", msg),
                });
            }
            Err(e) => {
                self.poisoned = true;
                return Err(e);
            }
        };

        // Only null means out-of-memory; any other bad offset fails the
        // bounds check below.
        if offset == 0 && len > 0 {
            return Err(SandboxError::AllocationFailure {
                requested,
                reason: "allocator returned null".into(),
            });
        }

        let data = self.memory.data_mut(&mut self.store);
        if let Err(e) = memory::write_bytes(data, offset, bytes) {
            // The allocator handed out space it does not have.
            self.poisoned = true;
            return Err(e);
        }

        Ok(GuestRegion::new(offset, len))
    }

    /// Copy a region back out of guest memory.
    pub fn read(&self, region: GuestRegion) -> Result<Vec<u8>, SandboxError> {
        memory::read_bytes(self.memory.data(&self.store), region)
    }

    /// Current linear memory size in bytes.
    pub fn memory_size(&self) -> usize {
        self.memory.data_size(&self.store)
    }

    /// Call `infer_from_ptrs` with the model and input regions.
    ///
    /// Returns the raw result code. Both regions are re-validated first.
    pub fn infer(&mut self, model: GuestRegion, input: GuestRegion) -> Result<i32, SandboxError> {
        let size = self.memory_size();
        memory::validate_range(size, model.offset, model.len as usize)?;
        memory::validate_range(size, input.offset, input.len as usize)?;

        let (model_ptr, model_len) = model.as_abi();
        let (input_ptr, input_len) = input.as_abi();
        let result = handle_trap(
            self.infer
                .call(&mut self.store, (model_ptr, model_len, input_ptr, input_len)),
        );
        if result.is_err() {
            self.poisoned = true;
        }
        result
    }

    /// Restore the fuel budget before the next unit of work.
    /// No-op when the sandbox runs unmetered.
    pub fn refuel(&mut self) -> Result<(), SandboxError> {
        if let Some(fuel) = self.fuel_limit {
            self.store.set_fuel(fuel)?;
        }
        Ok(())
    }

    /// True once a guest call has trapped or the allocator misbehaved.
    /// A poisoned instance should not be reused.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }
}
