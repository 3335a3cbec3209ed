use anyhow::{anyhow, Result};
use byteorder::{ByteOrder, NativeEndian};
use std::path::PathBuf;

use tickstore::store::{column_path, read_column_file};
use tickstore::txn::FIELDS;
use tickstore::IngestConfig;

/// Распаковать колонку и напечатать значения по одному на строку.
pub fn exec(store_root: PathBuf, field: String, limit: Option<usize>) -> Result<()> {
    let cfg = IngestConfig::from_env();
    let spec = FIELDS
        .iter()
        .find(|f| f.name == field)
        .ok_or_else(|| anyhow!("unknown field '{}'", field))?;

    let raw = read_column_file(&column_path(&store_root, spec.name), spec.width, cfg.page_size)?;
    let total = raw.len() / spec.width;
    let take = limit.unwrap_or(total).min(total);

    for chunk in raw.chunks_exact(spec.width).take(take) {
        let v: u64 = match spec.width {
            8 => NativeEndian::read_u64(chunk),
            4 => NativeEndian::read_u32(chunk) as u64,
            2 => NativeEndian::read_u16(chunk) as u64,
            _ => chunk[0] as u64,
        };
        // range хранится как его байт; печатаем знаково для читабельности.
        if spec.name == "range" {
            println!("{}", v as u8 as i8);
        } else {
            println!("{}", v);
        }
    }
    eprintln!("{}: {} values ({} shown)", spec.name, total, take);
    Ok(())
}
