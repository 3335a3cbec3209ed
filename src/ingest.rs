//! ingest — прогон одного дампа через декодер и валидатор в стор.
//!
//! Формат дампа: первая строка 'YYYY-MM-DD' (дата определяет эру и тем
//! самым декодер), вторая — текстовая шапка колонок (игнорируется), дальше
//! по транзакции на строку. Отклонённые записи логируются и пропускаются;
//! фатальны только ошибки формата заголовка и ошибки sink'а.

use anyhow::{bail, Context, Result};
use log::{info, warn};
use std::io::BufRead;

use crate::config::IngestConfig;
use crate::consts::{DUMP_DATE_LEN, MAX_LINE_LEN};
use crate::metrics::record_txn;
use crate::parse::select_era;
use crate::store::TxnWrite;
use crate::txn::Validity;

/// Итог обработки одного дампа.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub dump_date: String,
    pub lines: u64,
    pub accepted: u64,
    pub bad_time: u64,
    pub bad_bid: u64,
    pub bad_range: u64,
    /// Строки, оборванные посреди поля; ненулевое только в strict-режиме.
    pub truncated: u64,
}

impl IngestReport {
    pub fn rejected(&self) -> u64 {
        self.bad_time + self.bad_bid + self.bad_range + self.truncated
    }
}

/// 'YYYY-MM-DD' -> (year, month, day), позиционно, без libc-шных парсеров.
fn parse_header_date(line: &[u8]) -> Option<(u32, u32, u32)> {
    if line.len() < DUMP_DATE_LEN {
        return None;
    }
    let digit = |i: usize| -> Option<u32> {
        let c = line[i];
        c.is_ascii_digit().then(|| (c - b'0') as u32)
    };
    if line[4] != b'-' || line[7] != b'-' {
        return None;
    }
    let year = digit(0)? * 1000 + digit(1)? * 100 + digit(2)? * 10 + digit(3)?;
    let month = digit(5)? * 10 + digit(6)?;
    let day = digit(8)? * 10 + digit(9)?;
    Some((year, month, day))
}

/// Обработать дамп целиком: выбрать эру по заголовку, декодировать строки,
/// протолкнуть валидные записи в стор и закоммитить его.
pub fn ingest_dump<R: BufRead>(
    mut input: R,
    store: &mut dyn TxnWrite,
    cfg: &IngestConfig,
) -> Result<IngestReport> {
    let mut line = Vec::with_capacity(MAX_LINE_LEN);

    // Строка 1: дата дампа.
    input.read_until(b'\n', &mut line).context("read dump date header")?;
    let (year, month, day) = match parse_header_date(&line) {
        Some(d) => d,
        None => bail!(
            "dump header is not a YYYY-MM-DD date: {:?}",
            String::from_utf8_lossy(&line[..line.len().min(DUMP_DATE_LEN)])
        ),
    };
    let dump_date = format!("{:04}-{:02}-{:02}", year, month, day);
    let era = match select_era(year, month, day, cfg.year_min, cfg.year_max) {
        Some(e) => e,
        None => bail!(
            "no decoder for dump date {} (expected year in [{}, {}])",
            dump_date,
            cfg.year_min,
            cfg.year_max
        ),
    };

    // Строка 2: шапка колонок, не несёт данных.
    line.clear();
    input.read_until(b'\n', &mut line).context("skip column header")?;

    let mut report = IngestReport {
        dump_date: dump_date.clone(),
        ..IngestReport::default()
    };

    let mut line_no: u64 = 2;
    loop {
        line.clear();
        let n = input
            .read_until(b'\n', &mut line)
            .with_context(|| format!("read dump {} line {}", dump_date, line_no + 1))?;
        if n == 0 {
            break;
        }
        line_no += 1;
        if line.iter().all(|c| c.is_ascii_whitespace()) {
            continue;
        }
        report.lines += 1;

        let decoded = era.decode(&line);
        if cfg.strict && decoded.truncated {
            warn!("{} line {}: truncated record, skipped", dump_date, line_no);
            report.truncated += 1;
            continue;
        }
        record_txn(decoded.validity);
        match decoded.validity {
            Validity::Ok => {
                store
                    .push_txn(&decoded.txn)
                    .with_context(|| format!("store push, dump {} line {}", dump_date, line_no))?;
                report.accepted += 1;
            }
            Validity::BadTime => {
                warn!(
                    "{} line {}: bad time (issued={} > rtime={})",
                    dump_date, line_no, decoded.txn.issued, decoded.txn.rtime
                );
                report.bad_time += 1;
            }
            Validity::BadBid => {
                warn!("{} line {}: bad bid {}", dump_date, line_no, decoded.txn.bid);
                report.bad_bid += 1;
            }
            Validity::BadRange => {
                warn!("{} line {}: bad range", dump_date, line_no);
                report.bad_range += 1;
            }
        }
    }

    store
        .commit()
        .with_context(|| format!("commit store after dump {}", dump_date))?;

    info!(
        "finished dump {} ({:?}): {} lines, {} accepted, {} rejected",
        dump_date,
        era,
        report.lines,
        report.accepted,
        report.rejected()
    );
    Ok(report)
}
