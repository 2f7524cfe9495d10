//! Advisory build lock.
//!
//! Rebuilding an index replaces both persisted artifacts. Two concurrent
//! rebuilds against the same paths would interleave those writes, so every
//! build holds an exclusive `fs2` lock on a file next to the artifacts.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Exclusive lock held for the duration of an index build.
#[derive(Debug)]
pub struct BuildLock {
    lock_file: File,
    lock_path: PathBuf,
}

/// Information about the lock holder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// Process ID of the lock holder
    pub pid: u32,
    /// When the lock was acquired
    pub acquired_at: DateTime<Utc>,
    /// Hostname of the machine
    pub hostname: String,
}

impl fmt::Display for LockInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pid {} on {} since {}",
            self.pid,
            self.hostname,
            self.acquired_at.to_rfc3339()
        )
    }
}

impl BuildLock {
    const LOCK_FILENAME: &'static str = ".build.lock";

    /// Try to acquire the lock without blocking; `Ok(None)` when held elsewhere.
    pub fn try_acquire(dir: &Path) -> io::Result<Option<Self>> {
        fs::create_dir_all(dir)?;
        let lock_path = dir.join(Self::LOCK_FILENAME);
        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        if let Err(err) = FileExt::try_lock_exclusive(&lock_file) {
            if err.kind() == fs2::lock_contended_error().kind() {
                return Ok(None);
            }
            return Err(err);
        }

        Self::write_lock_info(&lock_file)?;
        debug!(path = %lock_path.display(), "acquired build lock");

        Ok(Some(Self {
            lock_file,
            lock_path,
        }))
    }

    /// Acquire with timeout (polling)
    pub fn acquire_timeout(dir: &Path, timeout: Duration) -> io::Result<Option<Self>> {
        let start = Instant::now();
        let poll_interval = Duration::from_millis(50);

        loop {
            if let Some(lock) = Self::try_acquire(dir)? {
                return Ok(Some(lock));
            }
            if start.elapsed() >= timeout {
                return Ok(None);
            }
            std::thread::sleep(poll_interval);
        }
    }

    fn write_lock_info(file: &File) -> io::Result<()> {
        let info = LockInfo {
            pid: std::process::id(),
            acquired_at: Utc::now(),
            hostname: hostname::get()
                .ok()
                .and_then(|h| h.into_string().ok())
                .unwrap_or_else(|| "unknown".to_string()),
        };

        let mut file = file;
        file.set_len(0)?;
        let json = serde_json::to_string_pretty(&info).unwrap_or_default();
        file.write_all(json.as_bytes())?;
        file.sync_all()
    }

    /// Holder of the lock in `dir`, if it recorded itself.
    pub fn read_lock_info(dir: &Path) -> io::Result<Option<LockInfo>> {
        let lock_path = dir.join(Self::LOCK_FILENAME);
        if !lock_path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&lock_path)?;
        Ok(serde_json::from_str(&content).ok())
    }

    /// Get the lock file path
    pub fn path(&self) -> &Path {
        &self.lock_path
    }
}

impl Drop for BuildLock {
    fn drop(&mut self) {
        // Closing the handle releases the lock as well
        let _ = FileExt::unlock(&self.lock_file);
    }
}
