use tickstore::consts::{RANGE_REGION, RANGE_STATION};
use tickstore::{select_era, Era, Validity};

fn era(year: u32, month: u32, day: u32) -> Era {
    select_era(year, month, day, 2000, 3000).expect("date in bounds")
}

// Формат до 2007-10-01: плоские поля, ' , ' разделитель, дробные секунды,
// длительность 'DD:00:00:00.0'.
const EARLY_LINE: &[u8] = b"1000000000001 , 10000002 , 30000142 , 60003760 , 34 , 1 , \
    12345.6 , 1 , 900 , 1000 , 2006-05-01 10:00:00.0 , 90:00:00:00.0 , 40 , 424242 , \
    2006-05-01 12:00:00.0\n";

#[test]
fn early_era_forces_buy_range_and_shifts_to_utc() {
    // 2006-05-01 — внутри первого DST-окна (+7h), buy-ордера с битым range.
    let d = era(2006, 5, 1).decode(EARLY_LINE);
    assert_eq!(d.validity, Validity::Ok);
    assert!(!d.truncated);

    let t = d.txn;
    assert_eq!(t.order_id, 1_000_000_000_001);
    assert_eq!(t.region_id, 10_000_002);
    assert_eq!(t.system_id, 30_000_142);
    assert_eq!(t.station_id, 60_003_760);
    assert_eq!(t.type_id, 34);
    assert_eq!(t.bid, 1);
    assert_eq!(t.price, 1_234_560); // 12345.6 -> сотые
    assert_eq!(t.vol_min, 1);
    assert_eq!(t.vol_rem, 900);
    assert_eq!(t.vol_ent, 1000);
    assert_eq!(t.duration, 90);
    assert_eq!(t.reported_by, 424_242);

    // Распарсился сырой 40, но bid=1 в эту эпоху перекрывает его станцией.
    assert_eq!(t.range, RANGE_STATION);

    // Локальная полночь 2006-05-01 по формуле = 1146614400; +7h.
    let local_midnight: u32 = 1_146_614_400;
    let shift = 7 * 3600;
    assert_eq!(t.issued, local_midnight + 10 * 3600 + shift);
    assert_eq!(t.rtime, local_midnight + 12 * 3600 + shift);
}

#[test]
fn second_era_keeps_parsed_range_but_still_shifts() {
    // 2007-05-01: range уже честный, время всё ещё локальное (+7h окно).
    let d = era(2007, 5, 1).decode(EARLY_LINE);
    assert_eq!(d.validity, Validity::Ok);
    assert_eq!(d.txn.range, 40);
    let local_midnight: u32 = 1_146_614_400;
    assert_eq!(d.txn.issued, local_midnight + 10 * 3600 + 7 * 3600);
}

#[test]
fn quoted_era_trusts_input_verbatim() {
    // 2011-06-01 — за всеми порогами: кавычки, 'day'-длительность, UTC.
    let line = b"\"1234567890\",\"10000002\",\"30000142\",\"60003760\",\"34\",\"0\",\
        \"99.99\",\"1\",\"50\",\"100\",\"2011-06-01 03:04:05\",\"90 day 0:00:00\",\
        \"32767\",\"777\",\"2011-06-01 04:00:00\"\n";
    let e = era(2011, 6, 1);
    assert_eq!(e, Era::UtcQuoted);
    let d = e.decode(line);
    assert_eq!(d.validity, Validity::Ok);

    let t = d.txn;
    let midnight: u32 = 1_307_059_200; // epoch_days(2011, 6, 1)
    assert_eq!(t.issued, midnight + 3 * 3600 + 4 * 60 + 5);
    assert_eq!(t.rtime, midnight + 4 * 3600);
    assert_eq!(t.price, 9_999);
    assert_eq!(t.range, RANGE_REGION); // 32767 -> region, без поправок
    assert_eq!(t.bid, 0);
    assert_eq!(t.duration, 90);
}

#[test]
fn negative_range_maps_to_station() {
    let line = b"\"1\",\"2\",\"3\",\"4\",\"5\",\"0\",\"10.00\",\"1\",\"1\",\"1\",\
        \"2011-06-01 00:00:00\",\"14 day 0:00:00\",\"-1\",\"9\",\"2011-06-01 00:00:01\"\n";
    let d = era(2011, 6, 1).decode(line);
    assert_eq!(d.validity, Validity::Ok);
    assert_eq!(d.txn.range, RANGE_STATION);
}

#[test]
fn validity_classification() {
    // issued > rtime -> BadTime, независимо от остального.
    let bad_time = b"1 , 2 , 3 , 4 , 5 , 0 , 10.0 , 1 , 1 , 1 , \
        2010-08-02 00:00:00 , 90 day 0:00:00 , 0 , 9 , 2010-08-01 00:00:00\n";
    let e = era(2010, 8, 1);
    assert_eq!(e, Era::UtcDayDuration);
    assert_eq!(e.decode(bad_time).validity, Validity::BadTime);

    // bid=2 -> BadBid.
    let bad_bid = b"1 , 2 , 3 , 4 , 5 , 2 , 10.0 , 1 , 1 , 1 , \
        2010-08-01 00:00:00 , 90 day 0:00:00 , 0 , 9 , 2010-08-01 00:00:01\n";
    assert_eq!(e.decode(bad_bid).validity, Validity::BadBid);

    // Сырой range 7 не распознан -> BadRange.
    let bad_range = b"1 , 2 , 3 , 4 , 5 , 0 , 10.0 , 1 , 1 , 1 , \
        2010-08-01 00:00:00 , 90 day 0:00:00 , 7 , 9 , 2010-08-01 00:00:01\n";
    assert_eq!(e.decode(bad_range).validity, Validity::BadRange);
}

#[test]
fn truncated_line_is_flagged_but_still_decodes() {
    // Строка обрезана после issued: legacy-поведение — нули в хвосте,
    // strict-режим (через флаг) может её отбросить.
    let line = b"1 , 2 , 3 , 4 , 5 , 0 , 10.0 , 1 , 1 , 1 , 2010-08-01 00:00:00";
    let d = era(2010, 8, 1).decode(line);
    assert!(d.truncated);
    // rtime стал нулём, поэтому issued > rtime.
    assert_eq!(d.validity, Validity::BadTime);
}

#[test]
fn selector_rejects_out_of_bounds_dates() {
    assert!(select_era(1999, 12, 31, 2000, 3000).is_none());
    assert!(select_era(2006, 13, 1, 2000, 3000).is_none());
    // Суженные границы из конфига тоже уважаются.
    assert!(select_era(2006, 5, 1, 2007, 3000).is_none());
}
