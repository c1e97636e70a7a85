//! Single-instance guard for a storage directory.
//!
//! Every command that touches the store holds an exclusive advisory lock on
//! `<root>/lock` for as long as it runs. A second process gets an
//! "already running" error instead of racing the first one.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use fs2::FileExt;
use tracing::debug;

use crate::config::LOCK_FILENAME;

#[derive(Debug)]
pub struct StorageLock {
    path: PathBuf,
    file: File,
}

impl StorageLock {
    /// Take the lock without blocking.
    ///
    /// # Errors
    ///
    /// Returns an error if another process holds the lock, or if the lock file
    /// cannot be created.
    pub fn acquire(root: &Path) -> Result<Self> {
        let path = root.join(LOCK_FILENAME);

        let mut options = OpenOptions::new();
        options.read(true).write(true).create(true).truncate(false);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let file = options
            .open(&path)
            .with_context(|| format!("Failed to open lock file: {}", path.display()))?;

        if let Err(e) = file.try_lock_exclusive() {
            if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() {
                bail!("scm is already running on {}", root.display());
            }
            return Err(e).with_context(|| format!("Failed to lock {}", path.display()));
        }

        debug!(path = %path.display(), "acquired storage lock");
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StorageLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
