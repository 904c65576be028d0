//! In-memory storage backend.

use crate::error::Result;
use crate::storage::StorageBackend;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Volatile backend; contents live as long as the value does.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<()> {
        self.entries.write().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_read_remove() {
        let backend = MemoryBackend::new();
        assert!(backend.read("k").unwrap().is_none());

        backend.write("k", b"one").unwrap();
        backend.write("k", b"two").unwrap();
        assert_eq!(backend.read("k").unwrap().as_deref(), Some(&b"two"[..]));
        assert_eq!(backend.len(), 1);

        backend.remove("k").unwrap();
        backend.remove("k").unwrap();
        assert!(backend.is_empty());
    }
}
