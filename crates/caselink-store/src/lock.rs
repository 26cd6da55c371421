//! Advisory run lock.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, warn};

use crate::error::{Result, StoreError};

/// File name of the lock inside the data directory.
pub const LOCK_FILE_NAME: &str = ".caselink.lock";

/// Held while a committing run writes linkages. Released on drop.
///
/// The lock is advisory: writes are idempotent, so the lock only keeps
/// two runs from repeating the same work.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    /// Creates the lock file, failing if it already exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LockHeld`] if another run holds the lock and
    /// [`StoreError::Io`] if the file cannot be created.
    pub fn acquire(path: &Path) -> Result<Self> {
        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                return Err(StoreError::LockHeld {
                    path: path.to_path_buf(),
                });
            }
            Err(source) => {
                return Err(StoreError::Io {
                    operation: "create",
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let owner = format!("pid={} started={}\n", std::process::id(), Utc::now().to_rfc3339());
        if let Err(err) = file.write_all(owner.as_bytes()) {
            warn!(path = %path.display(), error = %err, "could not record lock owner");
        }
        debug!(path = %path.display(), "acquired run lock");
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %err, "could not remove run lock");
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn second_acquire_fails_until_release() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(LOCK_FILE_NAME);

        let lock = RunLock::acquire(&path).unwrap();
        assert!(matches!(
            RunLock::acquire(&path).unwrap_err(),
            StoreError::LockHeld { .. }
        ));
        drop(lock);

        assert!(!path.exists());
        let _again = RunLock::acquire(&path).unwrap();
    }
}
