//! Общие константы форматов (page, column files, эры входного фида).

// -------- Time --------
pub const SECS_PER_DAY: u32 = 86400;
pub const SECS_PER_HOUR: u32 = 3600;
pub const SECS_PER_MIN: u32 = 60;

// Julian Day эпохи (1970-01-01) для закрытой формулы в calendar::epoch_days.
pub const EPOCH_JDAY: u32 = 719_558;

// -------- Era thresholds (epoch seconds) --------
// Даты смены формата входного фида. Дамп выбирает декодер по своей
// заголовочной дате, сравнивая её с этими порогами.
pub const ERA2_START: u32 = 1_167_609_600; // 2007-01-01
pub const ERA3_START: u32 = 1_191_369_600; // 2007-10-01
pub const ERA4_START: u32 = 1_279_584_000; // 2010-07-18
pub const ERA5_START: u32 = 1_297_468_800; // 2011-02-13

// -------- Local-time (Pacific) DST instants --------
// YYYY-MM-DD-HH local. Переходы DST, наблюдавшиеся в раннем периоде данных;
// после 2007-10-01 фид переходит на UTC и поправка не применяется (решает эра).
pub const DST_2006_04_02: u32 = 1_144_033_200;
pub const DST_2006_10_29: u32 = 1_162_256_400;
pub const DST_2007_03_11: u32 = 1_173_754_800;
pub const DST_2007_11_04: u32 = 1_194_307_200;

// -------- Order range codes --------
// Историческое кодирование поля range, ужатое до одного байта:
// -2 = invalid, -1 = station, 0 = solar system, 5/10/20/40 = jumps, 127 = region.
pub const RANGE_INVALID: i8 = -2;
pub const RANGE_STATION: i8 = -1;
pub const RANGE_SYSTEM: i8 = 0;
pub const RANGE_REGION: i8 = 127;

// -------- Pages --------
pub const PAGE_SIZE: usize = 16 * 1024;
// [count u16 BE] — сколько логических элементов декомпрессируется из страницы.
pub const PAGE_HDR_SIZE: usize = 2;

// -------- Write-queue defaults --------
pub const STAGING_CAPACITY: usize = 1024;

// -------- Column store --------
pub const COL_EXT: &str = "col";
pub const ROW_FILE: &str = "rows.bin";

// -------- Dump format --------
// Первая строка дампа: ровно 'YYYY-MM-DD'.
pub const DUMP_DATE_LEN: usize = 10;
// Историческая верхняя граница длины строки дампа (вместе с '\n').
pub const MAX_LINE_LEN: usize = 500;
