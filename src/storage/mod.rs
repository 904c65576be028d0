//! Keyed blob storage behind the ledger.
//!
//! Each key holds one opaque value that is always written in full. The file
//! backend keeps one JSON file per key in the ledger directory; the memory
//! backend is used for session-scoped handoff and for tests.

mod file;
mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

use crate::error::Result;

/// A place to keep whole values under string keys.
pub trait StorageBackend: Send + Sync {
    /// Read the value under `key`, or `None` if nothing was ever written.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replace the value under `key`.
    fn write(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
