use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use tickstore::metrics;
use tickstore::store::column_path;
use tickstore::txn::FIELDS;
use tickstore::IngestConfig;

/// Размеры файлов колонок + срез метрик процесса.
pub fn exec(store_root: PathBuf, json: bool) -> Result<()> {
    let cfg = IngestConfig::from_env();
    let m = metrics::snapshot();

    let mut cols = Vec::new();
    for f in FIELDS.iter() {
        let path = column_path(&store_root, f.name);
        let bytes = fs::metadata(&path).map(|md| md.len()).unwrap_or(0);
        cols.push((f.name, bytes, bytes / cfg.page_size as u64));
    }

    if json {
        let obj = serde_json::json!({
            "store": store_root.display().to_string(),
            "page_size": cfg.page_size,
            "columns": cols
                .iter()
                .map(|(name, bytes, pages)| {
                    serde_json::json!({ "field": name, "bytes": bytes, "pages": pages })
                })
                .collect::<Vec<_>>(),
            "metrics": {
                "txns_accepted": m.txns_accepted,
                "txns_bad_time": m.txns_bad_time,
                "txns_bad_bid": m.txns_bad_bid,
                "txns_bad_range": m.txns_bad_range,
                "compress_calls": m.compress_calls,
                "compress_retries": m.compress_retries,
                "pages_written": m.pages_written,
                "page_bytes_written": m.page_bytes_written,
            },
        });
        println!("{}", serde_json::to_string_pretty(&obj)?);
        return Ok(());
    }

    println!("store: {}", store_root.display());
    println!("page_size: {}", cfg.page_size);
    for (name, bytes, pages) in &cols {
        println!("  {:12} {:>12} bytes  {:>8} pages", name, bytes, pages);
    }
    println!(
        "metrics: accepted={} rejected={} pages_written={} compress_calls={} (avg retries {:.3})",
        m.txns_accepted,
        m.txns_rejected(),
        m.pages_written,
        m.compress_calls,
        m.avg_compress_retries()
    );
    Ok(())
}
