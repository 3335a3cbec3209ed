// Базовые модули
pub mod calendar;
pub mod config;
pub mod consts;
pub mod lock;
pub mod metrics;
pub mod txn;

// Модульная раскладка (папки с mod.rs)
pub mod parse; // src/parse/{mod,cursor,decoder}.rs
pub mod queue; // src/queue/{mod,codec,sink}.rs
pub mod store; // src/store/mod.rs

// Драйвер дампа
pub mod ingest;

// Удобные реэкспорты
pub use config::IngestConfig;
pub use ingest::{ingest_dump, IngestReport};
pub use parse::{select_era, Era};
pub use queue::WriteQueue;
pub use store::{ColumnStore, RowStore, TxnWrite};
pub use txn::{Txn, Validity};
