//! txn — канонический декодированный ордер и его структурная валидация.
//!
//! Содержит:
//! - Txn: фиксированная 64-байтовая запись (row-store layout, native endian).
//! - Validity: классификация записи после декодирования (единая для всех эр).
//! - range_to_code(): свёртка исторических сырых кодировок range в один байт.
//! - FIELDS: таблица полей для колоночного режима (имя + ширина + экстрактор).

use byteorder::{ByteOrder, NativeEndian};

use crate::consts::{RANGE_INVALID, RANGE_REGION};

/// Размер плоской записи в row-store режиме (без паддинга, native endian).
pub const TXN_SIZE: usize = 64;

/// Одна декодированная транзакция ордера.
///
/// Поля упорядочены по ширине, как в бинарной раскладке row-store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Txn {
    pub order_id: u64,
    /// Цена в сотых минорной единицы (fixed-point).
    pub price: u64,
    pub reported_by: u64,
    pub region_id: u32,
    pub system_id: u32,
    pub station_id: u32,
    pub type_id: u32,
    pub vol_min: u32,
    pub vol_rem: u32,
    pub vol_ent: u32,
    /// Когда ордер был выставлен (epoch seconds, UTC после нормализации).
    pub issued: u32,
    /// Когда ордер наблюдали/зарепортили (epoch seconds, UTC).
    pub rtime: u32,
    /// Срок действия в днях, 0-90.
    pub duration: u16,
    /// См. константы RANGE_* в consts.
    pub range: i8,
    /// 1 = buy, 0 = sell; всё прочее невалидно.
    pub bid: u8,
}

/// Результат структурной проверки записи. Первый сработавший код побеждает.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    Ok,
    /// issued > rtime: ордер «наблюдали» раньше, чем выставили.
    BadTime,
    /// bid > 1.
    BadBid,
    /// range остался сентинелом -2.
    BadRange,
}

impl Validity {
    pub fn is_ok(self) -> bool {
        matches!(self, Validity::Ok)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Validity::Ok => "ok",
            Validity::BadTime => "bad-time",
            Validity::BadBid => "bad-bid",
            Validity::BadRange => "bad-range",
        }
    }
}

impl Txn {
    /// Кросс-полевая проверка, независимая от эры. Токенизатор ошибок не
    /// поднимает, так что это единственный гейт перед стором.
    pub fn validity(&self) -> Validity {
        if self.issued > self.rtime {
            Validity::BadTime
        } else if self.bid > 1 {
            Validity::BadBid
        } else if self.range == RANGE_INVALID {
            Validity::BadRange
        } else {
            Validity::Ok
        }
    }

    /// Сериализация в плоскую 64-байтовую запись (row-store, native endian).
    pub fn encode_row(&self, buf: &mut [u8; TXN_SIZE]) {
        NativeEndian::write_u64(&mut buf[0..8], self.order_id);
        NativeEndian::write_u64(&mut buf[8..16], self.price);
        NativeEndian::write_u64(&mut buf[16..24], self.reported_by);
        NativeEndian::write_u32(&mut buf[24..28], self.region_id);
        NativeEndian::write_u32(&mut buf[28..32], self.system_id);
        NativeEndian::write_u32(&mut buf[32..36], self.station_id);
        NativeEndian::write_u32(&mut buf[36..40], self.type_id);
        NativeEndian::write_u32(&mut buf[40..44], self.vol_min);
        NativeEndian::write_u32(&mut buf[44..48], self.vol_rem);
        NativeEndian::write_u32(&mut buf[48..52], self.vol_ent);
        NativeEndian::write_u32(&mut buf[52..56], self.issued);
        NativeEndian::write_u32(&mut buf[56..60], self.rtime);
        NativeEndian::write_u16(&mut buf[60..62], self.duration);
        buf[62] = self.range as u8;
        buf[63] = self.bid;
    }

    /// Обратная операция к encode_row (используется читателями и тестами).
    pub fn decode_row(buf: &[u8; TXN_SIZE]) -> Txn {
        Txn {
            order_id: NativeEndian::read_u64(&buf[0..8]),
            price: NativeEndian::read_u64(&buf[8..16]),
            reported_by: NativeEndian::read_u64(&buf[16..24]),
            region_id: NativeEndian::read_u32(&buf[24..28]),
            system_id: NativeEndian::read_u32(&buf[28..32]),
            station_id: NativeEndian::read_u32(&buf[32..36]),
            type_id: NativeEndian::read_u32(&buf[36..40]),
            vol_min: NativeEndian::read_u32(&buf[40..44]),
            vol_rem: NativeEndian::read_u32(&buf[44..48]),
            vol_ent: NativeEndian::read_u32(&buf[48..52]),
            issued: NativeEndian::read_u32(&buf[52..56]),
            rtime: NativeEndian::read_u32(&buf[56..60]),
            duration: NativeEndian::read_u16(&buf[60..62]),
            range: buf[62] as i8,
            bid: buf[63],
        }
    }

    /// Записать поле `idx` (по FIELDS) в начало `out`, вернуть его ширину.
    pub fn field_bytes(&self, idx: usize, out: &mut [u8; 8]) -> usize {
        let f = &FIELDS[idx];
        match f.width {
            8 => NativeEndian::write_u64(&mut out[0..8], (f.get)(self)),
            4 => NativeEndian::write_u32(&mut out[0..4], (f.get)(self) as u32),
            2 => NativeEndian::write_u16(&mut out[0..2], (f.get)(self) as u16),
            1 => out[0] = (f.get)(self) as u8,
            _ => unreachable!("field width"),
        }
        f.width
    }
}

/// Свёртка сырого значения range в однобайтовый код.
///
/// 32767/65535 оба встречаются как «region» (поле иногда знаковое, иногда
/// нет); всё нераспознанное -> -2.
pub fn range_to_code(raw: u64) -> i8 {
    match raw {
        0 | 5 | 10 | 20 | 40 => raw as i8,
        32767 | 65535 => RANGE_REGION,
        _ => RANGE_INVALID,
    }
}

/// Описание одного поля записи для колоночного режима.
pub struct FieldSpec {
    pub name: &'static str,
    pub width: usize,
    /// Значение поля, расширенное до u64 (range хранится как его u8-байт).
    pub get: fn(&Txn) -> u64,
}

/// Все 15 полей записи, в порядке row-store раскладки.
pub const FIELDS: [FieldSpec; 15] = [
    FieldSpec { name: "order_id", width: 8, get: |t| t.order_id },
    FieldSpec { name: "price", width: 8, get: |t| t.price },
    FieldSpec { name: "reported_by", width: 8, get: |t| t.reported_by },
    FieldSpec { name: "region_id", width: 4, get: |t| t.region_id as u64 },
    FieldSpec { name: "system_id", width: 4, get: |t| t.system_id as u64 },
    FieldSpec { name: "station_id", width: 4, get: |t| t.station_id as u64 },
    FieldSpec { name: "type_id", width: 4, get: |t| t.type_id as u64 },
    FieldSpec { name: "vol_min", width: 4, get: |t| t.vol_min as u64 },
    FieldSpec { name: "vol_rem", width: 4, get: |t| t.vol_rem as u64 },
    FieldSpec { name: "vol_ent", width: 4, get: |t| t.vol_ent as u64 },
    FieldSpec { name: "issued", width: 4, get: |t| t.issued as u64 },
    FieldSpec { name: "rtime", width: 4, get: |t| t.rtime as u64 },
    FieldSpec { name: "duration", width: 2, get: |t| t.duration as u64 },
    FieldSpec { name: "range", width: 1, get: |t| (t.range as u8) as u64 },
    FieldSpec { name: "bid", width: 1, get: |t| t.bid as u64 },
];
