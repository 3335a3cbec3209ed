//! Centralized configuration for tickstore ingestion.
//!
//! Goals:
//! - Single place to collect tunables instead of scattering env lookups.
//! - IngestConfig::from_env() reads TS_* variables; fluent with_* setters
//!   override individual fields programmatically.
//!
//! Performance-oriented defaults:
//! - data_fsync = false (durability point is the final commit, not every page)
//! - staging_capacity = 1024 elements per column queue
//! - strict = false (legacy tokenizer behavior, bit-exact reprocessing)

use std::fmt;

use crate::consts::{PAGE_SIZE, STAGING_CAPACITY};

/// Top-level configuration for ingestion and the stores.
#[derive(Clone, Debug)]
pub struct IngestConfig {
    /// Page capacity of every column write-queue, bytes.
    /// Env: TS_PAGE_SIZE (default 16384)
    pub page_size: usize,

    /// Staging buffer capacity, in elements, per column queue.
    /// Env: TS_STAGING_CAPACITY (default 1024)
    pub staging_capacity: usize,

    /// fsync column/row files on every page append (besides final commit).
    /// Env: TS_DATA_FSYNC (default false; "1|true|on|yes" => true)
    pub data_fsync: bool,

    /// Reject records whose line ended mid-field instead of silently
    /// accepting whatever the tokenizer accumulated.
    /// Env: TS_STRICT (default false — historical behavior)
    pub strict: bool,

    /// Sane bounds for the dump header year; outside => no decoder.
    /// Env: TS_YEAR_MIN / TS_YEAR_MAX (default 2000..=3000)
    pub year_min: u32,
    pub year_max: u32,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE,
            staging_capacity: STAGING_CAPACITY,
            data_fsync: false,
            strict: false,
            year_min: 2000,
            year_max: 3000,
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name).ok().map(|v| {
        let s = v.trim().to_ascii_lowercase();
        s == "1" || s == "true" || s == "yes" || s == "on"
    })
}

impl IngestConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        // Нулевые размеры из окружения игнорируются: на нуле страниц
        // делит status, а очередь такую геометрию всё равно отвергнет.
        if let Ok(v) = std::env::var("TS_PAGE_SIZE") {
            if let Ok(n) = v.trim().parse::<usize>() {
                if n > 0 {
                    cfg.page_size = n;
                }
            }
        }
        if let Ok(v) = std::env::var("TS_STAGING_CAPACITY") {
            if let Ok(n) = v.trim().parse::<usize>() {
                if n > 0 {
                    cfg.staging_capacity = n;
                }
            }
        }
        if let Some(b) = env_flag("TS_DATA_FSYNC") {
            cfg.data_fsync = b;
        }
        if let Some(b) = env_flag("TS_STRICT") {
            cfg.strict = b;
        }
        if let Ok(v) = std::env::var("TS_YEAR_MIN") {
            if let Ok(n) = v.trim().parse::<u32>() {
                cfg.year_min = n;
            }
        }
        if let Ok(v) = std::env::var("TS_YEAR_MAX") {
            if let Ok(n) = v.trim().parse::<u32>() {
                cfg.year_max = n;
            }
        }

        cfg
    }

    // ----- Fluent setters (builder-style) -----

    pub fn with_page_size(mut self, bytes: usize) -> Self {
        self.page_size = bytes;
        self
    }

    pub fn with_staging_capacity(mut self, elements: usize) -> Self {
        self.staging_capacity = elements;
        self
    }

    pub fn with_data_fsync(mut self, on: bool) -> Self {
        self.data_fsync = on;
        self
    }

    pub fn with_strict(mut self, on: bool) -> Self {
        self.strict = on;
        self
    }

    pub fn with_year_bounds(mut self, min: u32, max: u32) -> Self {
        self.year_min = min;
        self.year_max = max;
        self
    }
}

impl fmt::Display for IngestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IngestConfig {{ page_size: {}, staging_capacity: {}, data_fsync: {}, \
             strict: {}, years: [{}, {}] }}",
            self.page_size,
            self.staging_capacity,
            self.data_fsync,
            self.strict,
            self.year_min,
            self.year_max,
        )
    }
}
