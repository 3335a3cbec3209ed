//! store — персистентные приёмники декодированных записей.
//!
//! Два режима поверх одного корневого каталога:
//! - ColumnStore: по одному append-only файлу на поле записи, каждый со
//!   своей компрессирующей write-queue. Межколоночного порядка нет,
//!   внутри колонки — строгий FIFO.
//! - RowStore: один файл с целыми 64-байтовыми записями без фрейминга
//!   (низкий throughput, отладка).
//!
//! Оба берут эксклюзивный LOCK на корень: многописательный доступ не
//! поддерживается.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::IngestConfig;
use crate::consts::{COL_EXT, ROW_FILE};
use crate::lock::{try_acquire_exclusive_lock, LockGuard};
use crate::queue::codec::decode_page;
use crate::queue::sink::{FileSink, Sink};
use crate::queue::WriteQueue;
use crate::txn::{Txn, FIELDS, TXN_SIZE};

/// Общий шов для обоих режимов: инжест не знает, куда именно пишет.
pub trait TxnWrite {
    fn push_txn(&mut self, txn: &Txn) -> Result<()>;
    /// Дожать и сделать durable всё принятое. Идемпотентен.
    fn commit(&mut self) -> Result<()>;
}

/// Путь файла колонки по имени поля.
pub fn column_path(root: &Path, field: &str) -> PathBuf {
    root.join(format!("{}.{}", field, COL_EXT))
}

// ------------------------------- ColumnStore -------------------------------

pub struct ColumnStore {
    root: PathBuf,
    queues: Vec<WriteQueue<FileSink>>,
    _lock: LockGuard,
}

impl ColumnStore {
    /// Открыть (создать) колоночный стор под запись. Файлы колонок
    /// дозаписываются: стор append-only по построению.
    pub fn open(root: &Path, cfg: &IngestConfig) -> Result<Self> {
        fs::create_dir_all(root)
            .with_context(|| format!("create store root {}", root.display()))?;
        let lock = try_acquire_exclusive_lock(root)?;
        let mut queues = Vec::with_capacity(FIELDS.len());
        for f in FIELDS.iter() {
            let sink = FileSink::open(&column_path(root, f.name), cfg.data_fsync)?;
            queues.push(
                WriteQueue::with_params(sink, f.width, cfg.staging_capacity, cfg.page_size)
                    .with_context(|| format!("column queue for {}", f.name))?,
            );
        }
        Ok(Self {
            root: root.to_path_buf(),
            queues,
            _lock: lock,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TxnWrite for ColumnStore {
    fn push_txn(&mut self, txn: &Txn) -> Result<()> {
        let mut buf = [0u8; 8];
        for (idx, q) in self.queues.iter_mut().enumerate() {
            let width = txn.field_bytes(idx, &mut buf);
            q.push(&buf[..width])
                .with_context(|| format!("push field {}", FIELDS[idx].name))?;
        }
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        for (idx, q) in self.queues.iter_mut().enumerate() {
            q.commit()
                .with_context(|| format!("commit column {}", FIELDS[idx].name))?;
            q.sink_mut().sync()?;
        }
        Ok(())
    }
}

// -------------------------------- RowStore ---------------------------------

pub struct RowStore {
    sink: FileSink,
    _lock: LockGuard,
}

impl RowStore {
    pub fn open(root: &Path, cfg: &IngestConfig) -> Result<Self> {
        fs::create_dir_all(root)
            .with_context(|| format!("create store root {}", root.display()))?;
        let lock = try_acquire_exclusive_lock(root)?;
        let sink = FileSink::open(&root.join(ROW_FILE), cfg.data_fsync)?;
        Ok(Self { sink, _lock: lock })
    }
}

impl TxnWrite for RowStore {
    fn push_txn(&mut self, txn: &Txn) -> Result<()> {
        let mut buf = [0u8; TXN_SIZE];
        txn.encode_row(&mut buf);
        self.sink.append(&buf)
    }

    fn commit(&mut self) -> Result<()> {
        self.sink.sync()
    }
}

// -------------------------------- Readers ----------------------------------

/// Прочитать файл колонки целиком: постранично декомпрессировать и склеить
/// сырые байты элементов в исходном порядке push'ей.
pub fn read_column_file(path: &Path, ele_size: usize, page_size: usize) -> Result<Vec<u8>> {
    let bytes = fs::read(path).with_context(|| format!("read column {}", path.display()))?;
    anyhow::ensure!(
        page_size > 0 && bytes.len() % page_size == 0,
        "column {} is {} bytes, not a multiple of page size {}",
        path.display(),
        bytes.len(),
        page_size
    );
    let mut out = Vec::new();
    for (no, page) in bytes.chunks(page_size).enumerate() {
        let raw = decode_page(page, ele_size)
            .with_context(|| format!("page {} of {}", no, path.display()))?;
        out.extend_from_slice(&raw);
    }
    Ok(out)
}

/// Прочитать row-store файл обратно в записи.
pub fn read_row_file(path: &Path) -> Result<Vec<Txn>> {
    let bytes = fs::read(path).with_context(|| format!("read rows {}", path.display()))?;
    anyhow::ensure!(
        bytes.len() % TXN_SIZE == 0,
        "row file {} is {} bytes, not a multiple of record size {}",
        path.display(),
        bytes.len(),
        TXN_SIZE
    );
    Ok(bytes
        .chunks_exact(TXN_SIZE)
        .map(|c| Txn::decode_row(c.try_into().expect("chunk size")))
        .collect())
}
