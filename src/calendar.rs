//! calendar — быстрая календарная арифметика для нормализации меток времени.
//!
//! Содержит:
//! - epoch_days(): закрытая Julian-day формула (год, месяц, день) -> epoch seconds.
//!   Никаких таблиц и календарных библиотек: воспроизводимость бит-в-бит важнее
//!   общности, исторические дампы переобрабатываются детерминированно.
//! - local_to_utc(): фиксированная историческая поправка локального времени
//!   (+8h/+7h) с порогами DST, захардкоженными в consts. Без системной tz-базы.
//!
//! Арифметика намеренно u32 с wrapping-семантикой — так считал исходный
//! конвертер, и пороги эр сравниваются в тех же единицах.

use crate::consts::{
    DST_2006_04_02, DST_2006_10_29, DST_2007_03_11, DST_2007_11_04, EPOCH_JDAY, SECS_PER_DAY,
    SECS_PER_HOUR,
};

/// (year, month, day) -> секунды от эпохи на полночь этого дня.
///
/// Формула: year*365 + year/4 - year/100 + year/400 + (month*306+5)/10
/// + day - 1 - 719558, целочисленное деление, затем умножение на 86400.
/// epoch_days(1970, 1, 1) == 0.
#[inline]
pub fn epoch_days(year: u32, month: u32, day: u32) -> u32 {
    let days = year
        .wrapping_mul(365)
        .wrapping_add(year / 4)
        .wrapping_sub(year / 100)
        .wrapping_add(year / 400)
        .wrapping_add((month.wrapping_mul(306).wrapping_add(5)) / 10)
        .wrapping_add(day)
        .wrapping_sub(1)
        .wrapping_sub(EPOCH_JDAY);
    days.wrapping_mul(SECS_PER_DAY)
}

/// Перевод локальной (Pacific) метки в UTC.
///
/// Смещение ступенчатое: +8h до первого DST-порога, дальше чередуется
/// +7h/+8h на каждом переходе. Функция чистая и применяется только эрами,
/// где фид ещё репортит локальное время.
#[inline]
pub fn local_to_utc(local: u32) -> u32 {
    if local < DST_2006_04_02 {
        local + 8 * SECS_PER_HOUR
    } else if local < DST_2006_10_29 {
        local + 7 * SECS_PER_HOUR
    } else if local < DST_2007_03_11 {
        local + 8 * SECS_PER_HOUR
    } else if local < DST_2007_11_04 {
        local + 7 * SECS_PER_HOUR
    } else {
        local + 8 * SECS_PER_HOUR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_days_is_zero_at_epoch() {
        assert_eq!(epoch_days(1970, 1, 1), 0);
    }

    #[test]
    fn epoch_days_known_dates() {
        // Пороги эр исторически посчитаны этой же формулой, поэтому
        // сверяем именно с ними, а не с «настоящим» календарём.
        assert_eq!(epoch_days(2006, 5, 1), 1_146_614_400);
        assert_eq!(epoch_days(2007, 1, 1), 1_167_609_600);
        assert_eq!(epoch_days(2007, 10, 1), 1_191_369_600);
        assert_eq!(epoch_days(2010, 7, 18), 1_279_584_000);
        assert_eq!(epoch_days(2011, 2, 13), 1_297_468_800);
    }

    #[test]
    fn epoch_days_monotonic_within_year() {
        // Внутри года формула неубывающая на любых (month, day) вплоть до
        // day=31 (переносы в следующий месяц ей не мешают).
        for year in 2005..=2012u32 {
            let mut prev = epoch_days(year, 1, 1);
            for month in 1..=12u32 {
                for day in 1..=31u32 {
                    let t = epoch_days(year, month, day);
                    assert!(
                        t >= prev,
                        "non-monotonic at {}-{}-{}: {} < {}",
                        year,
                        month,
                        day,
                        t,
                        prev
                    );
                    prev = t;
                }
            }
        }
    }

    #[test]
    fn epoch_days_december_overlaps_next_january() {
        // Известная аномалия закрытой формулы без сдвига янв/фев: декабрь
        // года N на два дня длиннее и налезает на 1-2 января года N+1.
        // Между годами монотонности нет, и это сохранено намеренно: пороги
        // эр посчитаны той же формулой.
        assert_eq!(epoch_days(2006, 12, 30), epoch_days(2007, 1, 1));
        assert_eq!(epoch_days(2006, 12, 31), epoch_days(2007, 1, 2));
        assert_eq!(epoch_days(2010, 12, 30), epoch_days(2011, 1, 1));
    }

    #[test]
    fn local_to_utc_offsets_around_thresholds() {
        // На каждом пороге — разрыв ровно в 1 час, по сторонам смещение константно.
        let cases = [
            (DST_2006_04_02, 8, 7),
            (DST_2006_10_29, 7, 8),
            (DST_2007_03_11, 8, 7),
            (DST_2007_11_04, 7, 8),
        ];
        for (at, before_h, after_h) in cases {
            assert_eq!(local_to_utc(at - 1) - (at - 1), before_h * SECS_PER_HOUR);
            assert_eq!(local_to_utc(at) - at, after_h * SECS_PER_HOUR);
            // Константность в глубине интервала
            assert_eq!(
                local_to_utc(at - 1000) - (at - 1000),
                before_h * SECS_PER_HOUR
            );
            assert_eq!(local_to_utc(at + 1000) - (at + 1000), after_h * SECS_PER_HOUR);
        }
    }
}
