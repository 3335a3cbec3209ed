//! sink — append-only приёмник страниц/записей.
//!
//! Очередь зовёт append() ровно один раз на полную страницу и максимум ещё
//! раз на финальную частичную при commit. Короткая запись — фатальная
//! ошибка ввода-вывода (write_all), отката нет: уже записанные страницы
//! остаются валидными.

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub trait Sink {
    fn append(&mut self, buf: &[u8]) -> Result<()>;
}

/// Файловый sink: один append-only файл на колонку (или на row-store).
pub struct FileSink {
    file: File,
    path: PathBuf,
    fsync: bool,
}

impl FileSink {
    /// Открыть (создать) файл под дозапись. fsync на каждую страницу —
    /// по конфигу, как data_fsync.
    pub fn open(path: &Path, fsync: bool) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("open sink {}", path.display()))?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
            fsync,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Финальный fsync независимо от режима (зовётся на commit стора).
    pub fn sync(&mut self) -> Result<()> {
        self.file
            .sync_all()
            .with_context(|| format!("fsync sink {}", self.path.display()))
    }
}

impl Sink for FileSink {
    fn append(&mut self, buf: &[u8]) -> Result<()> {
        self.file
            .write_all(buf)
            .with_context(|| format!("append {} bytes to {}", buf.len(), self.path.display()))?;
        if self.fsync {
            self.file
                .sync_all()
                .with_context(|| format!("fsync sink {}", self.path.display()))?;
        }
        Ok(())
    }
}

/// Память как sink — для тестов и отладочных прогонов.
impl Sink for Vec<u8> {
    fn append(&mut self, buf: &[u8]) -> Result<()> {
        self.extend_from_slice(buf);
        Ok(())
    }
}
