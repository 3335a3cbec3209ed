use anyhow::Result;
use byteorder::{ByteOrder, NativeEndian};
use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use tickstore::store::{column_path, read_column_file, read_row_file};
use tickstore::txn::FIELDS;
use tickstore::{ingest_dump, ColumnStore, IngestConfig, RowStore};

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("tickstore-{}-{}-{}", prefix, pid, t))
}

// Дамп последней эры: кавычки, 'day'-длительность, время уже в UTC.
const DUMP_2011: &str = "\
2011-06-01
orderid,regionid,systemid,stationid,typeid,bid,price,volmin,volremain,volenter,issued,duration,range,reportedby,reportedtime
\"101\",\"10000002\",\"30000142\",\"60003760\",\"34\",\"0\",\"5.25\",\"1\",\"400\",\"500\",\"2011-06-01 01:00:00\",\"90 day 0:00:00\",\"32767\",\"7\",\"2011-06-01 02:00:00\"
\"102\",\"10000002\",\"30000142\",\"60003760\",\"35\",\"1\",\"10.00\",\"1\",\"50\",\"50\",\"2011-06-01 01:30:00\",\"14 day 0:00:00\",\"-1\",\"7\",\"2011-06-01 02:00:00\"
\"103\",\"10000002\",\"30000142\",\"60003760\",\"36\",\"2\",\"1.00\",\"1\",\"1\",\"1\",\"2011-06-01 01:00:00\",\"1 day 0:00:00\",\"0\",\"7\",\"2011-06-01 02:00:00\"
\"104\",\"10000002\",\"30000142\",\"60003760\",\"34\",\"0\",\"5.30\",\"1\",\"300\",\"500\",\"2011-06-01 03:00:00\",\"90 day 0:00:00\",\"20\",\"7\",\"2011-06-01 02:00:00\"
";

fn column_u64s(root: &PathBuf, field: &str, cfg: &IngestConfig) -> Result<Vec<u64>> {
    let spec = FIELDS.iter().find(|f| f.name == field).expect("known field");
    let raw = read_column_file(&column_path(root, field), spec.width, cfg.page_size)?;
    Ok(raw
        .chunks_exact(spec.width)
        .map(|c| match spec.width {
            8 => NativeEndian::read_u64(c),
            4 => NativeEndian::read_u32(c) as u64,
            2 => NativeEndian::read_u16(c) as u64,
            _ => c[0] as u64,
        })
        .collect())
}

#[test]
fn column_ingest_and_read_back() -> Result<()> {
    let root = unique_root("cols");
    let cfg = IngestConfig::default();

    let report = {
        let mut store = ColumnStore::open(&root, &cfg)?;
        ingest_dump(Cursor::new(DUMP_2011), &mut store, &cfg)?
    };
    assert_eq!(report.dump_date, "2011-06-01");
    assert_eq!(report.lines, 4);
    assert_eq!(report.accepted, 2); // 103: bid=2, 104: issued > rtime
    assert_eq!(report.bad_bid, 1);
    assert_eq!(report.bad_time, 1);
    assert_eq!(report.rejected(), 2);

    // Порядок внутри колонки — порядок принятых строк дампа.
    assert_eq!(column_u64s(&root, "order_id", &cfg)?, vec![101, 102]);
    assert_eq!(column_u64s(&root, "price", &cfg)?, vec![525, 1000]);
    assert_eq!(column_u64s(&root, "type_id", &cfg)?, vec![34, 35]);
    assert_eq!(column_u64s(&root, "bid", &cfg)?, vec![0, 1]);
    assert_eq!(column_u64s(&root, "duration", &cfg)?, vec![90, 14]);
    // range: 32767 -> регион (127), "-1" -> станция.
    assert_eq!(
        column_u64s(&root, "range", &cfg)?
            .iter()
            .map(|&v| v as u8 as i8)
            .collect::<Vec<_>>(),
        vec![127, -1]
    );

    // Полночь 2011-06-01 = 1307059200; поправок на зону нет.
    assert_eq!(
        column_u64s(&root, "issued", &cfg)?,
        vec![1_307_059_200 + 3_600, 1_307_059_200 + 5_400]
    );

    // Каждый файл колонки — целое число страниц.
    for f in FIELDS.iter() {
        let len = fs::metadata(column_path(&root, f.name))?.len();
        assert!(len > 0 && len % cfg.page_size as u64 == 0, "column {}", f.name);
    }

    fs::remove_dir_all(&root)?;
    Ok(())
}

#[test]
fn successive_dumps_append_to_columns() -> Result<()> {
    let root = unique_root("append");
    let cfg = IngestConfig::default();

    for _ in 0..2 {
        // Каждый дамп открывает стор заново, как это делает CLI.
        let mut store = ColumnStore::open(&root, &cfg)?;
        ingest_dump(Cursor::new(DUMP_2011), &mut store, &cfg)?;
    }
    assert_eq!(column_u64s(&root, "order_id", &cfg)?, vec![101, 102, 101, 102]);

    fs::remove_dir_all(&root)?;
    Ok(())
}

#[test]
fn row_store_roundtrip() -> Result<()> {
    let root = unique_root("rows");
    let cfg = IngestConfig::default();

    {
        let mut store = RowStore::open(&root, &cfg)?;
        ingest_dump(Cursor::new(DUMP_2011), &mut store, &cfg)?;
    }

    let rows = read_row_file(&root.join("rows.bin"))?;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].order_id, 101);
    assert_eq!(rows[0].price, 525);
    assert_eq!(rows[0].range, 127);
    assert_eq!(rows[1].order_id, 102);
    assert_eq!(rows[1].bid, 1);
    assert_eq!(rows[1].range, -1);

    fs::remove_dir_all(&root)?;
    Ok(())
}

#[test]
fn store_root_is_single_writer() -> Result<()> {
    let root = unique_root("lock");
    let cfg = IngestConfig::default();

    let _holder = ColumnStore::open(&root, &cfg)?;
    assert!(ColumnStore::open(&root, &cfg).is_err());
    assert!(RowStore::open(&root, &cfg).is_err());

    drop(_holder);
    let again = ColumnStore::open(&root, &cfg)?;
    drop(again);

    fs::remove_dir_all(&root)?;
    Ok(())
}

#[test]
fn dump_with_bad_header_is_rejected() {
    let root = unique_root("badhdr");
    let cfg = IngestConfig::default();

    let mut store = ColumnStore::open(&root, &cfg).unwrap();
    assert!(ingest_dump(Cursor::new("not-a-date\nhdr\n"), &mut store, &cfg).is_err());
    // Год за пределами [year_min, year_max] — тоже отказ целиком.
    assert!(ingest_dump(Cursor::new("1999-06-01\nhdr\n"), &mut store, &cfg).is_err());

    drop(store);
    let _ = fs::remove_dir_all(&root);
}
