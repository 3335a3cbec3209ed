//! decoder — сырой проход по полям строки + пер-эровые поправки.
//!
//! Один общий парсер полей на все эры: различия в кавычках и формате
//! длительности поглощает токенизатор (разделители он пропускает как
//! не-цифры). Эре остаются только семантические поправки: часовой пояс
//! и известный баг buy-ордеров раннего периода.

use crate::calendar::local_to_utc;
use crate::consts::RANGE_STATION;
use crate::parse::cursor::Cursor;
use crate::parse::Era;
use crate::txn::{Txn, Validity};

/// Результат декодирования одной строки.
#[derive(Debug, Clone, Copy)]
pub struct Decoded {
    pub txn: Txn,
    pub validity: Validity,
    /// Курсор упёрся в конец строки посреди поля. В legacy-режиме
    /// игнорируется (историческое поведение), в strict-режиме запись
    /// отбрасывается до валидации.
    pub truncated: bool,
}

/// Порядок полей фиксирован для всех пяти форматов:
/// orderid, regionid, systemid, stationid, typeid, bid, price[.cc],
/// volmin, volrem, volent, issued, duration, range, reportedby, rtime.
fn parse_raw(line: &[u8]) -> (Txn, bool) {
    let mut cur = Cursor::new(line);
    cur.skip_leading_quote();

    let mut t = Txn {
        order_id: cur.read_uint(),
        region_id: cur.read_uint() as u32,
        system_id: cur.read_uint() as u32,
        station_id: cur.read_uint() as u32,
        type_id: cur.read_uint() as u32,
        bid: cur.read_uint() as u8,
        ..Txn::default()
    };
    t.price = cur.read_uint().wrapping_mul(100).wrapping_add(cur.read_cents());
    t.vol_min = cur.read_uint() as u32;
    t.vol_rem = cur.read_uint() as u32;
    t.vol_ent = cur.read_uint() as u32;
    t.issued = cur.read_datetime();
    t.duration = cur.read_duration();
    t.range = cur.read_range();
    t.reported_by = cur.read_uint();
    t.rtime = cur.read_datetime();

    (t, cur.exhausted())
}

impl Era {
    /// Декодировать одну строку дампа в запись + код валидности.
    ///
    /// На кривых цифрах не ошибается (см. cursor); хранилище гейтится
    /// только четырьмя структурными проверками validity().
    pub fn decode(&self, line: &[u8]) -> Decoded {
        let (mut txn, truncated) = parse_raw(line);
        match self {
            Era::PacificBuyRange => {
                // Range у buy-ордеров в этот период битый: консервативно
                // считаем его минимальным (station), что бы ни распарсилось.
                if txn.bid == 1 {
                    txn.range = RANGE_STATION;
                }
                txn.issued = local_to_utc(txn.issued);
                txn.rtime = local_to_utc(txn.rtime);
            }
            Era::Pacific => {
                txn.issued = local_to_utc(txn.issued);
                txn.rtime = local_to_utc(txn.rtime);
            }
            // Дальше фид репортит честный UTC и честные range.
            Era::Utc | Era::UtcDayDuration | Era::UtcQuoted => {}
        }
        Decoded {
            validity: txn.validity(),
            txn,
            truncated,
        }
    }
}
