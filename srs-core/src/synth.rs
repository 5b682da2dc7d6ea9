//! Построитель синтетических SRS буферов для тестов и бенчмарков.
//!
//! Раскладка повторяет ту, что ожидают локаторы: маркер кадра, 8-байтовое
//! ASCII-поле времени, нули до `payload_offset`, значения f32 LE, 16 байт
//! хвоста; фон — 12-байтовая строка заголовка и payload через 336 байт от
//! её начала.

use srs_types::{FRAME_MARKER, FRAME_TRAILER_SIZE, TIME_FIELD_LEN};

use crate::binary::{put_bytes_at, write_f32_le};

/// Строка заголовка фонового блока; эталонные маркеры — её 8-байтовые окна.
pub const BG_HEADER: [u8; 12] = [0x01, 0, 0, 0, 0x80, 0x08, 0, 0, 0x02, 0, 0, 0];

/// Смещение payload фона от начала [`BG_HEADER`].
pub const BG_HEADER_TO_PAYLOAD: usize = 336;

/// Заполнение хвоста кадра.
const TRAILER_FILL: u8 = 0xEE;

/// Последовательно дописывает кадры, фоновые блоки и произвольные байты.
#[derive(Debug, Default, Clone)]
pub struct SrsBuilder {
    buf: Vec<u8>,
}

impl SrsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Текущая длина (смещение следующей записи).
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Дописывает `n` нулевых байт.
    pub fn zeros(
        &mut self,
        n: usize,
    ) -> &mut Self {
        self.buf.resize(self.buf.len() + n, 0);
        self
    }

    /// Дополняет нулями до смещения `offset` (если буфер короче).
    pub fn pad_to(
        &mut self,
        offset: usize,
    ) -> &mut Self {
        if self.buf.len() < offset {
            self.buf.resize(offset, 0);
        }
        self
    }

    /// Дописывает произвольные байты, возвращает их смещение.
    pub fn bytes(
        &mut self,
        bytes: &[u8],
    ) -> usize {
        let at = self.buf.len();
        self.buf.extend_from_slice(bytes);
        at
    }

    /// Дописывает значения f32 LE, возвращает их смещение.
    pub fn values(
        &mut self,
        values: &[f32],
    ) -> usize {
        let at = self.buf.len();
        write_f32_le(&mut self.buf, values);
        at
    }

    /// Дописывает полный кадр и возвращает смещение его маркера.
    ///
    /// Межкадровый интервал до следующего маркера равен
    /// `payload_offset + 4 * values.len() + 16`.
    pub fn frame(
        &mut self,
        time: &str,
        payload_offset: usize,
        values: &[f32],
    ) -> usize {
        let at = self.buf.len();

        put_bytes_at(&mut self.buf, at, &FRAME_MARKER);
        put_bytes_at(&mut self.buf, at + FRAME_MARKER.len(), &time_field(time));
        self.pad_to(at + payload_offset);
        write_f32_le(&mut self.buf, values);
        self.buf
            .resize(self.buf.len() + FRAME_TRAILER_SIZE, TRAILER_FILL);

        at
    }

    /// Одиночный маркер кадра с полем времени (закрывает последний кадр).
    pub fn marker(
        &mut self,
        time: &str,
    ) -> usize {
        let at = self.bytes(&FRAME_MARKER);
        self.bytes(&time_field(time));
        at
    }

    /// Дописывает маркер кадра по произвольному смещению.
    pub fn marker_at(
        &mut self,
        offset: usize,
        time: &str,
    ) -> &mut Self {
        put_bytes_at(&mut self.buf, offset, &FRAME_MARKER);
        put_bytes_at(&mut self.buf, offset + FRAME_MARKER.len(), &time_field(time));
        self
    }

    /// Дописывает фоновый блок и возвращает смещение его payload.
    pub fn background(
        &mut self,
        values: &[f32],
    ) -> usize {
        let header_at = self.bytes(&BG_HEADER);
        let payload_at = header_at + BG_HEADER_TO_PAYLOAD;

        self.pad_to(payload_at);
        write_f32_le(&mut self.buf, values);

        payload_at
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}

/// Поле времени: текст, выровненный вправо пробелами до 8 байт.
pub fn time_field(time: &str) -> [u8; TIME_FIELD_LEN] {
    let text = format!("{time:>width$}", width = TIME_FIELD_LEN);
    let mut field = [b' '; TIME_FIELD_LEN];
    for (dst, src) in field.iter_mut().zip(text.bytes()) {
        *dst = src;
    }
    field
}

/// Детерминированный «спектр»: гладкая кривая с ненулевой дисперсией.
pub fn spectrum(
    n: usize,
    phase: f32,
) -> Vec<f32> {
    (0..n)
        .map(|i| {
            let x = i as f32;
            0.6 + 0.25 * (x * 0.031 + phase).sin() + 0.05 * (x * 0.173 + 2.0 * phase).cos()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{quality::std_dev, scan::find_all};

    #[test]
    fn test_time_field_padding() {
        assert_eq!(&time_field("1.5"), b"     1.5");
        assert_eq!(&time_field("123456789"), b"12345678");
        assert_eq!(&time_field(""), b"        ");
    }

    #[test]
    fn test_frame_layout() {
        let mut b = SrsBuilder::new();
        let p0 = b.frame("0.5", 80, &[1.0, 2.0]);
        let p1 = b.marker("1.0");
        let buf = b.build();

        assert_eq!(p0, 0);
        assert_eq!(p1, 80 + 8 + 16);
        assert_eq!(&buf[p1..p1 + 8], &FRAME_MARKER);
        assert_eq!(&buf[8..16], b"     0.5");
        assert_eq!(&buf[80..84], &1.0f32.to_le_bytes());
    }

    #[test]
    fn test_background_header_offset() {
        let mut b = SrsBuilder::new();
        b.zeros(100);
        let payload = b.background(&[0.25, 0.5]);
        let buf = b.build();

        assert_eq!(payload, 100 + BG_HEADER_TO_PAYLOAD);
        assert_eq!(find_all(&buf, &BG_HEADER, 10), vec![100]);
        assert_eq!(&buf[payload..payload + 4], &0.25f32.to_le_bytes());
    }

    #[test]
    fn test_spectrum_is_plausible() {
        let s = spectrum(1024, 0.3);
        assert!(s.iter().all(|v| v.is_finite()));
        assert!(std_dev(&s) > 0.01);
        assert_ne!(spectrum(16, 0.0), spectrum(16, 1.0));
    }
}
