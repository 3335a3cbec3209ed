//! cursor — токенизатор одной строки дампа.
//!
//! Курсор по неизменяемому буферу строки; каждая операция съедает своё поле
//! и разделитель. Политика ошибок историческая: токенизатор НЕ сигнализирует
//! о кривых цифрах — он корректен на корректном входе, а мусор ловит
//! кросс-полевая валидация записи. Единственное отличие от оригинала:
//! курсор bounds-checked и не может прочитать за конец строки; факт
//! «упёрлись в конец посреди поля» фиксируется флагом exhausted, который
//! потребляется только в strict-режиме.

use crate::calendar::epoch_days;
use crate::consts::{RANGE_STATION, SECS_PER_HOUR, SECS_PER_MIN};
use crate::txn::range_to_code;

pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
    exhausted: bool,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            exhausted: false,
        }
    }

    /// Курсор дочитал буфер до конца посреди какого-то поля.
    pub fn exhausted(&self) -> bool {
        self.exhausted
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }

    #[inline]
    fn bump(&mut self) {
        self.pos += 1;
    }

    /// Некоторые форматы открывают первое поле кавычкой.
    pub fn skip_leading_quote(&mut self) {
        if self.peek() == Some(b'"') {
            self.bump();
        }
    }

    /// Пропустить всё до следующей значимой позиции (цифра или '-').
    fn skip_to_signed(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == b'-' {
                return;
            }
            self.bump();
        }
        self.exhausted = true;
    }

    /// Беззнаковое десятичное число: пропустить ведущие не-цифры, накопить
    /// цифры в u64. На конце буфера без единой цифры вернёт 0 (legacy).
    pub fn read_uint(&mut self) -> u64 {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                break;
            }
            self.bump();
        }
        if self.peek().is_none() {
            self.exhausted = true;
            return 0;
        }
        let mut val: u64 = 0;
        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            val = val.wrapping_mul(10).wrapping_add((c - b'0') as u64);
            self.bump();
        }
        val
    }

    /// Поле range: ведущий '-' даёт сентинел «station» (исторически
    /// встречается только -1), иначе — read_uint + табличная свёртка.
    pub fn read_range(&mut self) -> i8 {
        self.skip_to_signed();
        if self.peek() != Some(b'-') {
            return range_to_code(self.read_uint());
        }
        self.bump();
        // Будь хорошим соседом: дочитай оставшиеся цифры.
        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            self.bump();
        }
        RANGE_STATION
    }

    /// HH:MM:SS с опциональной дробной частью. Дробь используется только
    /// для округления (>= .5s -> +1s) и отбрасывается.
    pub fn read_time_of_day(&mut self) -> u32 {
        let hour = self.read_uint() as u32;
        let minute = self.read_uint() as u32;
        let mut second = self.read_uint() as u32;
        if self.peek() == Some(b'.') {
            self.bump();
            if let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    if c - b'0' >= 5 {
                        second += 1;
                    }
                    self.bump();
                }
            }
            // Хвостовые полусекунды не значимы.
            while let Some(c) = self.peek() {
                if !c.is_ascii_digit() {
                    break;
                }
                self.bump();
            }
        }
        hour * SECS_PER_HOUR + minute * SECS_PER_MIN + second
    }

    /// 'YYYY-MM-DD HH:MM:SS[.f...]' -> epoch seconds (через epoch_days).
    ///
    /// Если дата не дочиталась (конец буфера), метка — честный 0, а не
    /// epoch_days от нулей: обрезанный хвост строки декодируется нулями,
    /// и кросс-полевая валидация (issued > rtime) его ловит.
    pub fn read_datetime(&mut self) -> u32 {
        let year = self.read_uint() as u32;
        let month = self.read_uint() as u32;
        let day = self.read_uint() as u32;
        if self.exhausted {
            return 0;
        }
        epoch_days(year, month, day).wrapping_add(self.read_time_of_day())
    }

    /// Дробная часть цены: '.d' или '.dd' сразу за целой частью -> сотые.
    /// Поле опционально; без точки возвращает 0, не двигая курсор.
    pub fn read_cents(&mut self) -> u64 {
        if self.peek() != Some(b'.') {
            return 0;
        }
        self.bump();
        let mut cents: u64 = 0;
        if let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                cents = (c - b'0') as u64 * 10;
                self.bump();
                if let Some(c2) = self.peek() {
                    if c2.is_ascii_digit() {
                        cents += (c2 - b'0') as u64;
                        self.bump();
                    }
                }
            }
        }
        // Знаков точнее сотых в данных не бывает, но дочитать дешевле,
        // чем позволить им утечь в следующее поле.
        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            self.bump();
        }
        cents
    }

    /// Длительность: значим только счётчик дней. Следом идёт всегда нулевой
    /// хвост вида ':00:00:00', ' day 0:00:00' или ' days, 0:00:00' — съесть
    /// и выбросить.
    pub fn read_duration(&mut self) -> u16 {
        let days = self.read_uint() as u16;
        self.read_time_of_day();
        days
    }
}
