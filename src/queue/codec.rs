//! codec — компрессор страниц write-queue и обратный разбор страницы.
//!
//! Контракт Compressor намеренно destSize-овый: «сожми максимум префикса
//! src, который влезет в dst, верни (consumed, produced)». Очередь поверх
//! этого контракта сама следит, чтобы в страницу попадали только целые
//! элементы, и сама решает, когда флашить.
//!
//! Реализация — raw DEFLATE (flate2). Оценка «сколько источника влезет»
//! уточняется пропорциональным ужатием с жёстким числом попыток; нулевой
//! produced означает «в dst не влезает ничего», и это уже забота очереди.

use anyhow::{ensure, Context, Result};
use byteorder::{BigEndian, ByteOrder};
use flate2::write::DeflateEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};
use std::io::Write;

use crate::consts::PAGE_HDR_SIZE;
use crate::metrics::record_compress_retry;

/// Максимум итераций уточнения оценки destSize.
const MAX_ESTIMATE_RETRIES: usize = 10;

/// Нижний порог остатка страницы: меньше этого DEFLATE не гарантирует
/// прогресса даже на одном элементе (stored-block каркас + сам элемент).
pub const DEFLATE_MARGIN: usize = 16;

pub trait Compressor {
    /// Сжать максимальный префикс `src`, влезающий в `dst`.
    /// Возвращает (consumed_src_bytes, produced_dst_bytes); (_, 0) — в dst
    /// не помещается ничего.
    fn compress_into(&mut self, src: &[u8], dst: &mut [u8]) -> Result<(usize, usize)>;

    /// Остаток страницы, ниже которого очередь обязана флашить проактивно.
    fn min_margin(&self) -> usize;
}

/// DEFLATE-компрессор с destSize-эмуляцией.
pub struct DeflateCodec {
    level: Compression,
}

impl DeflateCodec {
    pub fn new(level: u32) -> Self {
        Self {
            level: Compression::new(level),
        }
    }

    fn compress_vec(&self, src: &[u8]) -> Result<Vec<u8>> {
        let mut enc = DeflateEncoder::new(Vec::with_capacity(src.len() / 2 + 16), self.level);
        enc.write_all(src).context("deflate write")?;
        enc.finish().context("deflate finish")
    }
}

impl Default for DeflateCodec {
    fn default() -> Self {
        // Скоростной уровень: очередь — горячий путь инжеста.
        Self {
            level: Compression::fast(),
        }
    }
}

impl Compressor for DeflateCodec {
    fn compress_into(&mut self, src: &[u8], dst: &mut [u8]) -> Result<(usize, usize)> {
        if src.is_empty() || dst.is_empty() {
            return Ok((0, 0));
        }
        let mut try_len = src.len();
        for _ in 0..MAX_ESTIMATE_RETRIES {
            let out = self.compress_vec(&src[..try_len])?;
            if out.len() <= dst.len() {
                dst[..out.len()].copy_from_slice(&out);
                return Ok((try_len, out.len()));
            }
            // Перебрали: ужать запрос пропорционально фактическому выходу,
            // со строгим уменьшением, чтобы цикл не топтался на месте.
            let scaled = try_len * dst.len() / out.len();
            try_len = scaled.min(try_len - 1);
            record_compress_retry();
            if try_len == 0 {
                return Ok((0, 0));
            }
        }
        Ok((0, 0))
    }

    fn min_margin(&self) -> usize {
        DEFLATE_MARGIN
    }
}

/// Разобрать одну страницу обратно в сырые байты элементов.
///
/// Payload страницы — конкатенация самостоятельных DEFLATE-потоков (по
/// одному на каждый вызов compress_into); идём по ним до тех пор, пока не
/// наберём ровно count * ele_size байт. Любое расхождение — ошибка формата.
pub fn decode_page(page: &[u8], ele_size: usize) -> Result<Vec<u8>> {
    ensure!(ele_size > 0, "element size must be positive");
    ensure!(
        page.len() >= PAGE_HDR_SIZE,
        "page shorter than its header: {} bytes",
        page.len()
    );
    let count = BigEndian::read_u16(&page[0..PAGE_HDR_SIZE]) as usize;
    let expected = count * ele_size;
    let mut out = vec![0u8; expected];
    let mut in_off = PAGE_HDR_SIZE;
    let mut out_off = 0usize;

    while out_off < expected {
        ensure!(
            in_off < page.len(),
            "page payload exhausted at {}/{} element bytes",
            out_off,
            expected
        );
        let mut d = Decompress::new(false);
        let status = d
            .decompress(&page[in_off..], &mut out[out_off..], FlushDecompress::Finish)
            .context("corrupt deflate stream in page")?;
        match status {
            Status::StreamEnd => {}
            // Поток декодирует больше, чем заявлено в count — страница врёт.
            _ => anyhow::bail!(
                "page stream overruns declared element count ({} elements)",
                count
            ),
        }
        ensure!(d.total_out() > 0, "empty deflate stream in page");
        in_off += d.total_in() as usize;
        out_off += d.total_out() as usize;
    }
    ensure!(
        out_off == expected,
        "page decompressed to {} bytes, expected {}",
        out_off,
        expected
    );
    Ok(out)
}
