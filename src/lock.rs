// -*- indent-tabs-mode: nil; tab-width: 4; -*-
// vim: set ts=4 sw=4 et ai :

//! Host-wide exclusive lock around agent calls.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::nix;
use nix::fcntl::{Flock, FlockArg};

/// Exclusive advisory lock on a file. Released on drop.
pub struct HostLock {
    _lock: Flock<File>,
    path: PathBuf,
}

impl HostLock {
    /// Take the lock, blocking until no other holder remains.
    pub fn acquire<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        Self::lock(path.as_ref(), FlockArg::LockExclusive)
    }

    /// Like `acquire`, but waits on tokio's blocking pool so the runtime
    /// thread is not parked on `flock`.
    pub async fn acquire_async(path: PathBuf) -> std::io::Result<Self> {
        tokio::task::spawn_blocking(move || Self::acquire(path))
            .await
            .map_err(std::io::Error::other)?
    }

    /// Take the lock if nobody holds it, failing with `WouldBlock` otherwise.
    pub fn try_acquire<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        Self::lock(path.as_ref(), FlockArg::LockExclusiveNonblock)
    }

    fn lock(path: &Path, arg: FlockArg) -> std::io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let lock = Flock::lock(file, arg).map_err(|(_, errno)| std::io::Error::from(errno))?;
        log::trace!("took host lock {}", path.display());
        Ok(Self { _lock: lock, path: path.to_path_buf() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for HostLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostLock").field("path", &self.path).finish()
    }
}
