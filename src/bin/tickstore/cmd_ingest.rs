use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use tickstore::{ingest_dump, ColumnStore, IngestConfig, IngestReport, RowStore, TxnWrite};

pub fn exec(store_root: PathBuf, dump: Option<PathBuf>, rows: bool) -> Result<()> {
    let cfg = IngestConfig::from_env();

    let report = if rows {
        let mut store = RowStore::open(&store_root, &cfg)?;
        run(dump, &mut store, &cfg)?
    } else {
        let mut store = ColumnStore::open(&store_root, &cfg)?;
        run(dump, &mut store, &cfg)?
    };

    println!(
        "dump {}: {} lines, {} accepted, {} bad-time, {} bad-bid, {} bad-range, {} truncated",
        report.dump_date,
        report.lines,
        report.accepted,
        report.bad_time,
        report.bad_bid,
        report.bad_range,
        report.truncated
    );
    Ok(())
}

fn run(
    dump: Option<PathBuf>,
    store: &mut dyn TxnWrite,
    cfg: &IngestConfig,
) -> Result<IngestReport> {
    match dump {
        Some(path) => {
            let f = File::open(&path).with_context(|| format!("open dump {}", path.display()))?;
            ingest_dump(BufReader::new(f), store, cfg)
        }
        None => ingest_dump(io::stdin().lock(), store, cfg),
    }
}
