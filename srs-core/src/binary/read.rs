use byteorder::{ByteOrder, LittleEndian};
use srs_types::{SrsError, SrsResult, POINT_SIZE};

/// Декодирует срез как непрерывную последовательность f32 little-endian.
///
/// Неполное последнее значение (`len % 4` байт) отбрасывается.
pub fn decode_f32_le(bytes: &[u8]) -> Vec<f32> {
    let n = bytes.len() / POINT_SIZE;
    let mut out = vec![0f32; n];

    LittleEndian::read_f32_into(&bytes[..n * POINT_SIZE], &mut out);

    out
}

/// Читает ровно `count` значений f32 начиная с `offset`.
pub fn read_f32_le(
    buf: &[u8],
    offset: usize,
    count: usize,
) -> SrsResult<Vec<f32>> {
    let len = count.checked_mul(POINT_SIZE).ok_or(SrsError::Bounds {
        offset,
        len: usize::MAX,
        buffer_len: buf.len(),
    })?;

    let end = offset
        .checked_add(len)
        .filter(|&end| end <= buf.len())
        .ok_or(SrsError::Bounds {
            offset,
            len,
            buffer_len: buf.len(),
        })?;

    Ok(decode_f32_le(&buf[offset..end]))
}

/// Срез `buf[start..end]` с проверкой границ.
pub fn slice_checked(
    buf: &[u8],
    start: usize,
    end: usize,
) -> SrsResult<&[u8]> {
    if start > end || end > buf.len() {
        return Err(SrsError::Bounds {
            offset: start,
            len: end.saturating_sub(start),
            buffer_len: buf.len(),
        });
    }

    Ok(&buf[start..end])
}
