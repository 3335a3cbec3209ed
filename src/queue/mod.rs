//! queue — колоночная компрессирующая очередь записи.
//!
//! Машина состояний над двумя буферами:
//! - staging: несжатый FIFO до capacity элементов фиксированного размера;
//! - page: страница фиксированной ёмкости, [count u16 BE] + конкатенация
//!   сжатых кусков. Элемент никогда не рвётся по границе страницы.
//!
//! Исходная рекурсия push->compress->push и compress->write->compress
//! переделана в ограниченные циклы с явной ошибкой, если прогресса нет
//! дважды подряд (патологические element_size/page_capacity).

pub mod codec;
pub mod sink;

use anyhow::{bail, ensure, Context, Result};
use byteorder::{BigEndian, ByteOrder};

use crate::consts::{PAGE_HDR_SIZE, PAGE_SIZE, STAGING_CAPACITY};
use crate::metrics::{record_compress_call, record_page_write};
use codec::{Compressor, DeflateCodec};
use sink::Sink;

pub struct WriteQueue<S: Sink> {
    sink: S,
    codec: Box<dyn Compressor>,
    /// Несжатые элементы, ждущие компрессии (d_use * ele_size байт занято).
    staging: Vec<u8>,
    d_use: usize,
    capacity: usize,
    ele_size: usize,
    /// Текущая страница; p_use всегда в [PAGE_HDR_SIZE; page.len()].
    page: Vec<u8>,
    p_use: usize,
    p_count: u16,
}

impl<S: Sink> WriteQueue<S> {
    pub fn new(sink: S, ele_size: usize) -> Result<Self> {
        Self::with_params(sink, ele_size, STAGING_CAPACITY, PAGE_SIZE)
    }

    pub fn with_params(
        sink: S,
        ele_size: usize,
        capacity: usize,
        page_size: usize,
    ) -> Result<Self> {
        let codec: Box<dyn Compressor> = Box::new(DeflateCodec::default());
        ensure!(ele_size > 0, "element size must be positive");
        ensure!(capacity > 0, "staging capacity must be positive");
        ensure!(
            page_size > PAGE_HDR_SIZE + codec.min_margin() + ele_size,
            "page size {} cannot hold a single {}-byte element",
            page_size,
            ele_size
        );
        Ok(Self {
            sink,
            codec,
            staging: vec![0u8; ele_size * capacity],
            d_use: 0,
            capacity,
            ele_size,
            page: vec![0u8; page_size],
            p_use: PAGE_HDR_SIZE,
            p_count: 0,
        })
    }

    /// Заменить компрессор (тесты, альтернативные кодеки).
    pub fn with_codec(mut self, codec: Box<dyn Compressor>) -> Self {
        self.codec = codec;
        self
    }

    pub fn element_size(&self) -> usize {
        self.ele_size
    }

    /// Сколько элементов сейчас в staging (для тестов и статуса).
    pub fn staged(&self) -> usize {
        self.d_use
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Принять один элемент (ровно ele_size байт). Если staging полон —
    /// утрамбовать его компрессией и повторить.
    pub fn push(&mut self, value: &[u8]) -> Result<()> {
        ensure!(
            value.len() == self.ele_size,
            "push of {} bytes into a {}-byte-element queue",
            value.len(),
            self.ele_size
        );
        loop {
            if self.d_use < self.capacity {
                let off = self.d_use * self.ele_size;
                self.staging[off..off + self.ele_size].copy_from_slice(value);
                self.d_use += 1;
                return Ok(());
            }
            // compress_step всегда освобождает staging или ошибается.
            self.compress_step()?;
        }
    }

    /// Конец потока: дожать staging и дослать финальную частичную страницу.
    /// Идемпотентен — на пустой очереди ничего не делает.
    pub fn commit(&mut self) -> Result<()> {
        loop {
            if self.d_use == 0 {
                if self.p_use > PAGE_HDR_SIZE {
                    self.write_page()?;
                }
                return Ok(());
            }
            self.compress_step()?;
        }
    }

    /// Сжать сколько-то целых элементов с головы staging в остаток страницы.
    ///
    /// Петля вместо исходной рекурсии: флаши по нехватке места ограничены
    /// счётчиком «нет прогресса», а недоеденный хвостовой элемент ужимается
    /// до целого кратного и пережимается.
    fn compress_step(&mut self) -> Result<()> {
        debug_assert!(self.d_use > 0);
        let ele = self.ele_size;
        let mut stalls = 0u32;

        loop {
            if stalls >= 2 {
                bail!(
                    "compression stalled: {}-byte elements make no progress into {}-byte pages",
                    ele,
                    self.page.len()
                );
            }
            // Проактивный флаш: под минимальный каркас компрессора места
            // уже нет.
            if self.page.len() - self.p_use <= self.codec.min_margin() {
                self.write_page()?;
                continue;
            }
            // Заголовок count — u16: не обещаем странице больше элементов,
            // чем она сможет задекларировать.
            let count_room = (u16::MAX - self.p_count) as usize * ele;
            if count_room == 0 {
                self.write_page()?;
                continue;
            }
            let mut want = (self.d_use * ele).min(count_room);

            let accepted = loop {
                record_compress_call();
                let (consumed, produced) = self
                    .codec
                    .compress_into(&self.staging[..want], &mut self.page[self.p_use..])
                    .context("page compression")?;
                if produced == 0 || consumed < ele {
                    // В остаток страницы не влезает даже один элемент.
                    break None;
                }
                if consumed % ele == 0 {
                    break Some((consumed, produced));
                }
                // Компрессор заехал в середину элемента: просим ровно
                // целое число элементов и пережимаем.
                want = consumed - consumed % ele;
            };

            match accepted {
                Some((consumed, produced)) => {
                    self.p_count += (consumed / ele) as u16;
                    self.p_use += produced;
                    // FIFO: съеденные байты уходят с головы, хвост сдвигается.
                    self.staging.copy_within(consumed.., 0);
                    self.d_use -= consumed / ele;
                    if self.page.len() - self.p_use <= self.codec.min_margin() {
                        self.write_page()?;
                    }
                    return Ok(());
                }
                None => {
                    if self.p_use > PAGE_HDR_SIZE {
                        // Страница забита — начать свежую и попробовать ещё.
                        self.write_page()?;
                        stalls += 1;
                    } else {
                        bail!(
                            "compression failure: a single {}-byte element does not fit \
                             an empty {}-byte page",
                            ele,
                            self.page.len()
                        );
                    }
                }
            }
        }
    }

    /// Сериализовать заголовок и отдать страницу в sink одним куском,
    /// затем начать новую.
    fn write_page(&mut self) -> Result<()> {
        debug_assert!(self.p_use <= self.page.len());
        BigEndian::write_u16(&mut self.page[0..PAGE_HDR_SIZE], self.p_count);
        self.sink.append(&self.page)?;
        record_page_write(self.page.len());
        self.p_use = PAGE_HDR_SIZE;
        self.p_count = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::codec::decode_page;
    use super::*;

    #[test]
    fn construction_rejects_hopeless_geometry() {
        // Элемент больше страницы — конфигурационный баг, ловим сразу.
        assert!(WriteQueue::with_params(Vec::new(), 64, 4, 32).is_err());
        assert!(WriteQueue::with_params(Vec::new(), 0, 4, 4096).is_err());
        assert!(WriteQueue::with_params(Vec::new(), 4, 0, 4096).is_err());
    }

    #[test]
    fn commit_on_empty_queue_is_noop() {
        let mut q = WriteQueue::new(Vec::new(), 4).unwrap();
        q.commit().unwrap();
        q.commit().unwrap();
        assert!(q.sink().is_empty());
    }

    #[test]
    fn small_batch_single_page() {
        let mut q = WriteQueue::new(Vec::new(), 4).unwrap();
        for i in 0u32..100 {
            q.push(&i.to_ne_bytes()).unwrap();
        }
        q.commit().unwrap();
        let pages = q.into_sink();
        assert_eq!(pages.len(), PAGE_SIZE);
        let raw = decode_page(&pages, 4).unwrap();
        assert_eq!(raw.len(), 400);
        for i in 0u32..100 {
            let off = i as usize * 4;
            assert_eq!(u32::from_ne_bytes(raw[off..off + 4].try_into().unwrap()), i);
        }
    }

    #[test]
    fn commit_twice_after_data_is_idempotent() {
        let mut q = WriteQueue::new(Vec::new(), 2).unwrap();
        for i in 0u16..10 {
            q.push(&i.to_ne_bytes()).unwrap();
        }
        q.commit().unwrap();
        let after_first = q.sink().len();
        q.commit().unwrap();
        assert_eq!(q.sink().len(), after_first);
    }
}
