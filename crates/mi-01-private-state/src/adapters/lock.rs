//! # Directory Locking
//!
//! Prevents two processes from writing the same private state directory.
//!
//! Uses `fs2` for cross-platform file locking (flock on Unix, LockFile on Windows).

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use shared_types::IndexError;
use thiserror::Error;

/// Errors from directory locking
#[derive(Debug, Error)]
pub enum LockError {
    /// Lock file could not be created
    #[error("Failed to create lock file: {0}")]
    CreateFailed(io::Error),

    /// Directory is already locked by another store
    #[error("Private state directory already in use ({}), holder pid {:?}", .path.display(), .pid)]
    AlreadyLocked { pid: Option<u32>, path: PathBuf },

    /// Failed to write PID to lock file
    #[error("Failed to write PID to lock file: {0}")]
    WriteFailed(io::Error),
}

impl From<LockError> for IndexError {
    fn from(err: LockError) -> Self {
        IndexError::Storage(err.to_string())
    }
}

/// Exclusive lock on a private state directory.
///
/// Acquired when the store opens, released on drop.
#[derive(Debug)]
pub struct DirectoryLock {
    file: File,
    path: PathBuf,
    pid: u32,
}

impl DirectoryLock {
    /// Lock file name
    pub const LOCK_FILE: &'static str = "LOCK";

    /// Acquire an exclusive lock on `dir`.
    pub fn acquire(dir: &Path) -> Result<Self, LockError> {
        let lock_path = dir.join(Self::LOCK_FILE);

        // No truncation before the lock is held, so a holder's PID stays readable.
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(LockError::CreateFailed)?;

        if file.try_lock_exclusive().is_err() {
            return Err(LockError::AlreadyLocked {
                pid: Self::read_existing_pid(&lock_path),
                path: lock_path,
            });
        }

        let pid = std::process::id();
        file.set_len(0).map_err(LockError::WriteFailed)?;
        writeln!(file, "{pid}").map_err(LockError::WriteFailed)?;
        file.sync_all().map_err(LockError::WriteFailed)?;

        Ok(Self {
            file,
            path: lock_path,
            pid,
        })
    }

    /// PID of the process holding the lock
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Path to the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_existing_pid(path: &Path) -> Option<u32> {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| s.trim().parse().ok())
    }
}

impl Drop for DirectoryLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
        let _ = std::fs::remove_file(&self.path);
    }
}
