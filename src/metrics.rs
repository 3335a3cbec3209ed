//! Lightweight global metrics for tickstore.
//!
//! Потокобезопасные атомарные счётчики для подсистем:
//! - декодер (принятые/отклонённые записи по классам)
//! - write-queue (вызовы/ретраи компрессора, страницы и байты в sink)

use std::sync::atomic::{AtomicU64, Ordering};

use crate::txn::Validity;

// ----- Decoder -----
static TXNS_ACCEPTED: AtomicU64 = AtomicU64::new(0);
static TXNS_BAD_TIME: AtomicU64 = AtomicU64::new(0);
static TXNS_BAD_BID: AtomicU64 = AtomicU64::new(0);
static TXNS_BAD_RANGE: AtomicU64 = AtomicU64::new(0);

// ----- Write-queue -----
static COMPRESS_CALLS: AtomicU64 = AtomicU64::new(0);
static COMPRESS_RETRIES: AtomicU64 = AtomicU64::new(0);
static PAGES_WRITTEN: AtomicU64 = AtomicU64::new(0);
static PAGE_BYTES_WRITTEN: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    pub txns_accepted: u64,
    pub txns_bad_time: u64,
    pub txns_bad_bid: u64,
    pub txns_bad_range: u64,

    pub compress_calls: u64,
    pub compress_retries: u64,
    pub pages_written: u64,
    pub page_bytes_written: u64,
}

impl MetricsSnapshot {
    pub fn txns_rejected(&self) -> u64 {
        self.txns_bad_time + self.txns_bad_bid + self.txns_bad_range
    }

    /// Сколько в среднем ретраев оценки destSize на один вызов компрессора.
    pub fn avg_compress_retries(&self) -> f64 {
        if self.compress_calls == 0 {
            0.0
        } else {
            self.compress_retries as f64 / self.compress_calls as f64
        }
    }
}

// ----- Recorders (decoder) -----
pub fn record_txn(validity: Validity) {
    match validity {
        Validity::Ok => TXNS_ACCEPTED.fetch_add(1, Ordering::Relaxed),
        Validity::BadTime => TXNS_BAD_TIME.fetch_add(1, Ordering::Relaxed),
        Validity::BadBid => TXNS_BAD_BID.fetch_add(1, Ordering::Relaxed),
        Validity::BadRange => TXNS_BAD_RANGE.fetch_add(1, Ordering::Relaxed),
    };
}

// ----- Recorders (write-queue) -----
pub fn record_compress_call() {
    COMPRESS_CALLS.fetch_add(1, Ordering::Relaxed);
}

pub fn record_compress_retry() {
    COMPRESS_RETRIES.fetch_add(1, Ordering::Relaxed);
}

pub fn record_page_write(bytes: usize) {
    PAGES_WRITTEN.fetch_add(1, Ordering::Relaxed);
    PAGE_BYTES_WRITTEN.fetch_add(bytes as u64, Ordering::Relaxed);
}

/// Снять срез всех счётчиков (для status/отчётов).
pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        txns_accepted: TXNS_ACCEPTED.load(Ordering::Relaxed),
        txns_bad_time: TXNS_BAD_TIME.load(Ordering::Relaxed),
        txns_bad_bid: TXNS_BAD_BID.load(Ordering::Relaxed),
        txns_bad_range: TXNS_BAD_RANGE.load(Ordering::Relaxed),
        compress_calls: COMPRESS_CALLS.load(Ordering::Relaxed),
        compress_retries: COMPRESS_RETRIES.load(Ordering::Relaxed),
        pages_written: PAGES_WRITTEN.load(Ordering::Relaxed),
        page_bytes_written: PAGE_BYTES_WRITTEN.load(Ordering::Relaxed),
    }
}
