//! Guest linear memory regions and bounds-checked access.
//!
//! Host code never holds raw pointers into guest memory. It holds a
//! `GuestRegion` (offset + length) and validates it against the memory's
//! size at the moment of access, because any guest call may grow (and so
//! move) the backing allocation.

use crate::error::SandboxError;

/// A `(offset, length)` span inside a guest's linear memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GuestRegion {
    /// Byte offset from the start of linear memory.
    pub offset: u32,
    /// Length in bytes.
    pub len: u32,
}

impl GuestRegion {
    pub fn new(offset: u32, len: u32) -> Self {
        Self { offset, len }
    }

    /// One past the last byte, computed without wrapping.
    pub fn end(&self) -> u64 {
        self.offset as u64 + self.len as u64
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True if both regions share at least one byte. Empty regions overlap
    /// nothing.
    pub fn overlaps(&self, other: &GuestRegion) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        (self.offset as u64) < other.end() && (other.offset as u64) < self.end()
    }

    /// The `(ptr, len)` pair as passed to guest exports.
    pub fn as_abi(&self) -> (i32, i32) {
        (self.offset as i32, self.len as i32)
    }
}

/// Check that `[offset, offset+len)` lies within a memory of `mem_size` bytes.
pub fn validate_range(mem_size: usize, offset: u32, len: usize) -> Result<(), SandboxError> {
    let end = (offset as usize).checked_add(len);
    match end {
        Some(end) if end <= mem_size => Ok(()),
        _ => Err(SandboxError::BoundsFailure {
            offset,
            len,
            memory_size: mem_size,
        }),
    }
}

/// Copy `region` out of guest memory.
pub fn read_bytes(mem: &[u8], region: GuestRegion) -> Result<Vec<u8>, SandboxError> {
    validate_range(mem.len(), region.offset, region.len as usize)?;
    let start = region.offset as usize;
    Ok(mem[start..start + region.len as usize].to_vec())
}

/// Copy `data` into guest memory at `offset`. Touches no byte outside
/// `[offset, offset+data.len())`.
pub fn write_bytes(mem: &mut [u8], offset: u32, data: &[u8]) -> Result<(), SandboxError> {
    validate_range(mem.len(), offset, data.len())?;
    let start = offset as usize;
    mem[start..start + data.len()].copy_from_slice(data);
    Ok(())
}
