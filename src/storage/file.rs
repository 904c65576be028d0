//! Directory-backed storage.

use crate::error::{LedgerError, Result};
use crate::storage::StorageBackend;
use fs2::FileExt;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Name of the lock file held while the directory is open.
const LOCK_FILE: &str = "LOCK";

/// Stores each key as `<dir>/<key>.json`.
///
/// Holds an exclusive lock on the directory for its whole lifetime, so only
/// one backend per directory can be open at a time.
pub struct FileBackend {
    /// Base directory.
    path: PathBuf,

    /// Lock file for exclusive access.
    _lock_file: File,
}

impl FileBackend {
    /// Open the directory at `path`, creating it when allowed.
    pub fn open(path: impl AsRef<Path>, create_if_missing: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            if !create_if_missing {
                return Err(LedgerError::NotInitialized);
            }
            fs::create_dir_all(&path)?;
        }

        let lock_file = Self::acquire_lock(&path)?;

        Ok(Self {
            path,
            _lock_file: lock_file,
        })
    }

    /// Base directory of this backend.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.path.join(format!("{key}.json"))
    }

    fn acquire_lock(path: &Path) -> Result<File> {
        let lock_file = File::create(path.join(LOCK_FILE))?;

        lock_file
            .try_lock_exclusive()
            .map_err(|_| LedgerError::Locked)?;

        Ok(lock_file)
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.key_path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<()> {
        let final_path = self.key_path(key);
        let tmp_path = self.path.join(format!("{key}.json.tmp"));

        let mut file = File::create(&tmp_path)?;
        file.write_all(value)?;
        file.sync_all()?;

        // Readers only ever see the old or the new value.
        fs::rename(&tmp_path, &final_path)?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
