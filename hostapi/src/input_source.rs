//! Input item storage abstraction.
//!
//! `InputSource` enumerates the items of a batch and reads their bytes on
//! demand, so a failing read only affects the item it belongs to.
//!
//! Implementations:
//! - `DirSource` (this crate): regular files in a directory
//! - `MemSource` (this crate): in-memory map for tests

use crate::error::HostError;

/// Abstraction over where batch inputs come from.
pub trait InputSource: Send + Sync {
    /// Names of all items, in processing order.
    fn names(&self) -> Result<Vec<String>, HostError>;

    /// Read the bytes of one item.
    fn read(&self, name: &str) -> Result<Vec<u8>, HostError>;

    /// Number of items. Default implementation uses `names()`.
    fn count(&self) -> Result<usize, HostError> {
        Ok(self.names()?.len())
    }
}
