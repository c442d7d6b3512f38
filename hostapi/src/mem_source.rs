//! In-memory input source for testing.
//!
//! `MemSource` implements `InputSource` using a `BTreeMap`, so items come
//! out sorted by name just like `DirSource`.

use std::collections::BTreeMap;

use crate::error::HostError;
use crate::input_source::InputSource;

/// In-memory input source backed by `BTreeMap`.
#[derive(Debug, Clone, Default)]
pub struct MemSource {
    items: BTreeMap<String, Vec<u8>>,
}

impl MemSource {
    /// Create a new empty source.
    pub fn new() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }

    /// Create a source pre-populated with items.
    pub fn with_items(items: BTreeMap<String, Vec<u8>>) -> Self {
        Self { items }
    }

    /// Insert an item.
    pub fn insert(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.items.insert(name.into(), bytes);
    }

    /// Remove an item.
    pub fn remove(&mut self, name: &str) {
        self.items.remove(name);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl InputSource for MemSource {
    fn names(&self) -> Result<Vec<String>, HostError> {
        Ok(self.items.keys().cloned().collect())
    }

    fn read(&self, name: &str) -> Result<Vec<u8>, HostError> {
        self.items
            .get(name)
            .cloned()
            .ok_or_else(|| HostError::Source(format!("no such item: {}", name)))
    }

    fn count(&self) -> Result<usize, HostError> {
        Ok(self.items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_source() {
        let source = MemSource::new();
        assert!(source.is_empty());
        assert!(source.names().unwrap().is_empty());
        assert_eq!(source.count().unwrap(), 0);
    }

    #[test]
    fn test_names_are_sorted() {
        let mut source = MemSource::new();
        source.insert("b.jpg", vec![2]);
        source.insert("a.jpg", vec![1]);
        source.insert("c.jpg", vec![3]);

        assert_eq!(source.names().unwrap(), vec!["a.jpg", "b.jpg", "c.jpg"]);
    }

    #[test]
    fn test_read_and_missing() {
        let mut source = MemSource::new();
        source.insert("a.jpg", vec![0xff, 0xd8]);

        assert_eq!(source.read("a.jpg").unwrap(), vec![0xff, 0xd8]);
        assert!(matches!(source.read("b.jpg"), Err(HostError::Source(_))));
    }

    #[test]
    fn test_with_items() {
        let items = BTreeMap::from([
            ("b.jpg".to_string(), vec![2]),
            ("a.jpg".to_string(), vec![1]),
        ]);
        let source = MemSource::with_items(items);
        assert_eq!(source.len(), 2);
        assert_eq!(source.names().unwrap(), vec!["a.jpg", "b.jpg"]);
        assert_eq!(source.read("b.jpg").unwrap(), vec![2]);
    }

    #[test]
    fn test_remove() {
        let mut source = MemSource::new();
        source.insert("a.jpg", vec![1]);
        source.remove("a.jpg");
        assert!(source.is_empty());
    }

    #[test]
    fn test_empty_item() {
        let mut source = MemSource::new();
        source.insert("empty.bin", vec![]);
        assert_eq!(source.read("empty.bin").unwrap(), Vec::<u8>::new());
    }
}
