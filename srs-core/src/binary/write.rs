use byteorder::{ByteOrder, LittleEndian};
use srs_types::POINT_SIZE;

/// Дописывает значения f32 little-endian в конец буфера.
pub fn write_f32_le(
    out: &mut Vec<u8>,
    values: &[f32],
) {
    let start = out.len();
    out.resize(start + values.len() * POINT_SIZE, 0);
    LittleEndian::write_f32_into(values, &mut out[start..]);
}

/// Записывает `bytes` по смещению `offset`, при необходимости дополняя
/// буфер нулями.
pub fn put_bytes_at(
    out: &mut Vec<u8>,
    offset: usize,
    bytes: &[u8],
) {
    let end = offset + bytes.len();
    if out.len() < end {
        out.resize(end, 0);
    }
    out[offset..end].copy_from_slice(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::decode_f32_le;

    #[test]
    fn test_write_then_decode() {
        let mut out = vec![0xFFu8];
        write_f32_le(&mut out, &[3.25, -7.0]);

        assert_eq!(out.len(), 9);
        assert_eq!(decode_f32_le(&out[1..]), vec![3.25, -7.0]);
    }

    #[test]
    fn test_put_bytes_at_extends() {
        let mut out = vec![1u8, 2];
        put_bytes_at(&mut out, 4, &[9, 9]);
        assert_eq!(out, vec![1, 2, 0, 0, 9, 9]);

        put_bytes_at(&mut out, 0, &[7]);
        assert_eq!(out[0], 7);
        assert_eq!(out.len(), 6);
    }
}
