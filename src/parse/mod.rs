//! parse — выбор эры формата и декодирование строк дампа.
//!
//! Формат фида менялся пять раз (порядок полей стабилен, но кавычки,
//! кодировка длительности и часовой пояс — нет). Эра выбирается один раз
//! на дамп по его заголовочной дате; исходный диспатч по указателю на
//! функцию переделан в tagged enum.

pub mod cursor;
pub mod decoder;

pub use decoder::Decoded;

use crate::calendar::epoch_days;
use crate::consts::{ERA2_START, ERA3_START, ERA4_START, ERA5_START};

/// Эра входного формата: непрерывный диапазон дат с фиксированной
/// семантикой полей.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Era {
    /// До 2007-01-01: время локальное (Pacific), range buy-ордеров битый.
    PacificBuyRange,
    /// До 2007-10-01: время всё ещё локальное, range уже честный.
    Pacific,
    /// До 2010-07-18: честный UTC, длительность вида 'DD:HH:MM:SS'.
    Utc,
    /// До 2011-02-13: длительность вида 'DD day(s) HH:MM:SS'.
    UtcDayDuration,
    /// После: то же, но каждое поле в кавычках.
    UtcQuoted,
}

/// Выбрать декодер по дате дампа. None — дата не лезет в разумные рамки
/// (границы лет задаёт конфиг) и дамп обрабатывать нельзя.
pub fn select_era(
    year: u32,
    month: u32,
    day: u32,
    year_min: u32,
    year_max: u32,
) -> Option<Era> {
    if year < year_min || year > year_max || !(1..=12).contains(&month) || !(1..=31).contains(&day)
    {
        return None;
    }
    let t = epoch_days(year, month, day);
    Some(if t < ERA2_START {
        Era::PacificBuyRange
    } else if t < ERA3_START {
        Era::Pacific
    } else if t < ERA4_START {
        Era::Utc
    } else if t < ERA5_START {
        Era::UtcDayDuration
    } else {
        Era::UtcQuoted
    })
}
