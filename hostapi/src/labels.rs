//! Label table and prediction resolver.
//!
//! The guest's inference export returns the 1-based index of the predicted
//! class, which is also the line number of that class in the labels resource.
//! `LabelTable` holds those lines; [`LabelTable::resolve`] maps a raw result
//! code back to its label.

use std::path::Path;

use crate::error::HostError;

/// Ordered, 1-indexed sequence of class labels.
///
/// Loaded once and never mutated; share it behind an `Arc`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    /// Build a table from owned labels. `labels[0]` is label 1.
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// Parse newline-separated text.
    ///
    /// Both `\n` and `\r\n` terminate a line. A trailing newline does not
    /// produce an extra empty label. Lines are otherwise kept verbatim.
    pub fn from_text(text: &str) -> Self {
        Self {
            labels: text.lines().map(str::to_owned).collect(),
        }
    }

    /// Parse a UTF-8 labels resource.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HostError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| HostError::InvalidLabels(format!("not valid UTF-8: {}", e)))?;
        Ok(Self::from_text(text))
    }

    /// Read and parse a labels file.
    pub fn from_file(path: &Path) -> Result<Self, HostError> {
        let bytes = std::fs::read(path).map_err(|e| {
            HostError::InvalidLabels(format!("cannot read {}: {}", path.display(), e))
        })?;
        let table = Self::from_bytes(&bytes)?;
        tracing::debug!(path = %path.display(), labels = table.len(), "loaded label table");
        Ok(table)
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns true if the table has no labels.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label for a 1-based `index`, or `None` outside `1..=len`.
    pub fn get(&self, index: i32) -> Option<&str> {
        if index < 1 {
            return None;
        }
        self.labels.get(index as usize - 1).map(String::as_str)
    }

    /// Resolve a raw guest result code to its label.
    ///
    /// Fails with `IndexOutOfRange` when `index < 1` or `index > len`.
    pub fn resolve(&self, index: i32) -> Result<&str, HostError> {
        self.get(index)
            .ok_or_else(|| HostError::index_out_of_range(index, self.len()))
    }

    /// Iterate labels in order (label 1 first).
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

/// Resolve `index` against `table`. See [`LabelTable::resolve`].
pub fn resolve(index: i32, table: &LabelTable) -> Result<String, HostError> {
    table.resolve(index).map(str::to_owned)
}
