use serde::{Deserialize, Serialize};

use crate::{SrsError, SrsResult};

/// Определение фонового маркера: байтовый шаблон и смещение до payload.
///
/// Сериализуется в форме `{"delta_to_payload": 336, "hex": "01 00 ..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerDef {
    /// Шаблон в шестнадцатеричной записи (пробелы допускаются)
    pub hex: String,
    /// Знаковое смещение от начала совпадения до начала payload
    pub delta_to_payload: i64,
}

/// Разобранный маркер, готовый для поиска.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub pattern: Vec<u8>,
    pub delta_to_payload: i64,
}

/// Эталонный набор: пять 8-байтовых окон одной строки заголовка фона
/// `01 00 00 00 80 08 00 00 02 00 00 00`, поэтому все пять голосуют за
/// одну и ту же позицию.
pub const REFERENCE_BG_MARKERS: [(&str, i64); 5] = [
    ("01 00 00 00 80 08 00 00", 336),
    ("00 00 00 80 08 00 00 02", 335),
    ("00 00 80 08 00 00 02 00", 334),
    ("00 80 08 00 00 02 00 00", 333),
    ("80 08 00 00 02 00 00 00", 332),
];

impl MarkerDef {
    pub fn new<S: Into<String>>(
        hex: S,
        delta_to_payload: i64,
    ) -> Self {
        Self {
            hex: hex.into(),
            delta_to_payload,
        }
    }

    /// Разбирает `hex` в байты.
    pub fn parse(&self) -> SrsResult<Marker> {
        Marker::new(parse_hex_pattern(&self.hex)?, self.delta_to_payload)
    }

    /// Эталонный набор фоновых маркеров.
    pub fn reference_set() -> Vec<MarkerDef> {
        REFERENCE_BG_MARKERS
            .iter()
            .map(|(hex, delta)| MarkerDef::new(*hex, *delta))
            .collect()
    }
}

impl Marker {
    pub fn new(
        pattern: Vec<u8>,
        delta_to_payload: i64,
    ) -> SrsResult<Self> {
        if pattern.is_empty() {
            return Err(SrsError::config("Marker pattern must not be empty"));
        }

        Ok(Self {
            pattern,
            delta_to_payload,
        })
    }

    /// Разбирает весь набор определений.
    pub fn parse_all(defs: &[MarkerDef]) -> SrsResult<Vec<Marker>> {
        defs.iter().map(MarkerDef::parse).collect()
    }

    /// Эталонный набор, уже разобранный.
    pub fn reference_set() -> Vec<Marker> {
        REFERENCE_BG_MARKERS
            .iter()
            .filter_map(|(hex, delta)| {
                parse_hex_pattern(hex)
                    .ok()
                    .map(|pattern| Marker {
                        pattern,
                        delta_to_payload: *delta,
                    })
            })
            .collect()
    }
}

/// Разбирает шестнадцатеричную строку в байты.
///
/// Пробельные символы между цифрами игнорируются, регистр не важен.
///
/// # Примеры
/// ```
/// use srs_types::parse_hex_pattern;
/// assert_eq!(parse_hex_pattern("c6 d7 CD").unwrap(), vec![0xC6, 0xD7, 0xCD]);
/// assert_eq!(parse_hex_pattern("8008").unwrap(), vec![0x80, 0x08]);
/// ```
pub fn parse_hex_pattern(s: &str) -> SrsResult<Vec<u8>> {
    let digits: Vec<u8> = s
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();

    if digits.is_empty() {
        return Err(SrsError::config(format!("Empty hex pattern '{s}'")));
    }

    if digits.len() % 2 != 0 {
        return Err(SrsError::config(format!(
            "Hex pattern '{s}' has an odd number of digits"
        )));
    }

    digits
        .chunks_exact(2)
        .map(|pair| {
            let hi = hex_digit(pair[0]);
            let lo = hex_digit(pair[1]);
            match (hi, lo) {
                (Some(hi), Some(lo)) => Ok((hi << 4) | lo),
                _ => Err(SrsError::config(format!(
                    "Invalid hex digit in pattern '{s}'"
                ))),
            }
        })
        .collect()
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FRAME_MARKER;

    #[test]
    fn test_parse_frame_marker_hex() {
        let bytes = parse_hex_pattern("c6 d7 cd bc b2 c9 d3 da").unwrap();
        assert_eq!(bytes, FRAME_MARKER.to_vec());
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(parse_hex_pattern("").is_err());
        assert!(parse_hex_pattern("   ").is_err());
        assert!(parse_hex_pattern("abc").is_err(), "нечётное число цифр");
        assert!(parse_hex_pattern("zz 00").is_err());
    }

    #[test]
    fn test_reference_set_is_windows_of_one_header() {
        let header = parse_hex_pattern("01 00 00 00 80 08 00 00 02 00 00 00").unwrap();
        let markers = Marker::reference_set();

        assert_eq!(markers.len(), 5);
        for (i, m) in markers.iter().enumerate() {
            assert_eq!(m.pattern.as_slice(), &header[i..i + 8]);
            // все окна указывают на одну и ту же позицию payload
            assert_eq!(i as i64 + m.delta_to_payload, 336);
        }
    }

    #[test]
    fn test_marker_def_json_shape() {
        let json = r#"[{"delta_to_payload": 336, "hex": "01 00 00 00 80 08 00 00"}]"#;
        let defs: Vec<MarkerDef> = serde_json::from_str(json).unwrap();

        assert_eq!(defs, vec![MarkerDef::new("01 00 00 00 80 08 00 00", 336)]);
        let parsed = Marker::parse_all(&defs).unwrap();
        assert_eq!(parsed[0].pattern[4], 0x80);
    }

    #[test]
    fn test_empty_marker_rejected() {
        assert!(Marker::new(Vec::new(), 0).is_err());
    }
}
