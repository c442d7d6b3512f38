//! Host-side error types for the classification bridge.
//!
//! `HostError` covers failures that happen entirely on the host: resolving a
//! guest result code against the label table, decoding the label resource,
//! and reading input items. Sandbox-level failures (allocation, bounds,
//! traps) live in `mobilenet-sandbox`.

use std::fmt;

/// Host-side error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The guest returned a result code with no corresponding label.
    ///
    /// Valid codes are `1..=len`. Zero and negative codes are rejected too.
    IndexOutOfRange {
        /// Raw result code returned by the guest.
        index: i32,
        /// Number of labels in the table.
        len: usize,
    },
    /// The label resource could not be decoded.
    InvalidLabels(String),
    /// An input source failed to enumerate or read an item.
    Source(String),
}

impl HostError {
    /// Create an out-of-range error for `index` against a table of `len` labels.
    pub fn index_out_of_range(index: i32, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Returns true if this is an `IndexOutOfRange` error.
    pub fn is_index_out_of_range(&self) -> bool {
        matches!(self, Self::IndexOutOfRange { .. })
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => write!(
                f,
                "prediction index {} out of range (label table has {} entries, valid range is 1..={})",
                index, len, len
            ),
            Self::InvalidLabels(msg) => write!(f, "invalid label table: {}", msg),
            Self::Source(msg) => write!(f, "input source error: {}", msg),
        }
    }
}

impl std::error::Error for HostError {}
