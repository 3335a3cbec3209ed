//! File-based locking for single-writer safety.
//!
//! Кросс-платформенные advisory-локи (fs2) на корне стора:
//! - Exclusive: единственный писатель; очередь многописательный доступ
//!   не поддерживает вовсе, поэтому открытие стора на запись берёт его
//!   сразу и держит до Drop.
//!
//! Lock file path: <root>/LOCK

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

pub struct LockGuard {
    file: std::fs::File,
    path: PathBuf,
}

impl LockGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        // fs2 unlock errors on drop are ignored deliberately.
        let _ = self.file.unlock();
    }
}

fn lock_file_path(root: &Path) -> PathBuf {
    root.join("LOCK")
}

fn open_lock_file(root: &Path) -> Result<std::fs::File> {
    let path = lock_file_path(root);
    let f = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .open(&path)
        .with_context(|| format!("open lock file {}", path.display()))?;
    Ok(f)
}

/// Взять эксклюзивный лок, не блокируясь: занято — сразу ошибка.
pub fn try_acquire_exclusive_lock(root: &Path) -> Result<LockGuard> {
    let file = open_lock_file(root)?;
    file.try_lock_exclusive().with_context(|| {
        format!(
            "try_lock_exclusive failed: {}",
            lock_file_path(root).display()
        )
    })?;
    Ok(LockGuard {
        file,
        path: lock_file_path(root),
    })
}
