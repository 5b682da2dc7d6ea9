use log::{debug, info, warn};
use srs_types::{SrsError, SrsResult, FRAME_MARKER_LEN, TIME_FIELD_LEN};

/// Сводка по декодированной оси времени/потенциала.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeAxisSummary {
    /// Число конечных значений
    pub finite: usize,
    /// Первое конечное значение
    pub first: f64,
    /// Последнее конечное значение
    pub last: f64,
}

/// Декодирует ASCII-поле после каждого маркера кадра.
///
/// Длина результата всегда равна `positions.len()`; неразборчивое поле даёт
/// NaN.
pub fn decode(
    buffer: &[u8],
    positions: &[usize],
) -> Vec<f64> {
    positions
        .iter()
        .map(|&p| {
            let start = p.saturating_add(FRAME_MARKER_LEN).min(buffer.len());
            let end = start.saturating_add(TIME_FIELD_LEN).min(buffer.len());

            match parse_time_field(&buffer[start..end]) {
                Ok(v) => v,
                Err(e) => {
                    debug!("Frame @{p}: {e}");
                    f64::NAN
                }
            }
        })
        .collect()
}

/// Разбирает поле времени: текст (некорректные байты UTF-8 пропускаются),
/// обрезка пробелов, число с плавающей точкой.
pub fn parse_time_field(bytes: &[u8]) -> SrsResult<f64> {
    let text: String = String::from_utf8_lossy(bytes)
        .chars()
        .filter(|&c| c != char::REPLACEMENT_CHARACTER)
        .collect();
    let trimmed = text.trim();

    trimmed
        .parse::<f64>()
        .map_err(|e| SrsError::decode(format!("time field {trimmed:?}: {e}")))
}

/// Сводка по конечным значениям; `None`, если конечных нет.
pub fn summarize(samples: &[f64]) -> Option<TimeAxisSummary> {
    let mut finite = samples.iter().copied().filter(|v| v.is_finite());
    let first = finite.next()?;
    let (count, last) = finite.fold((1, first), |(n, _), v| (n + 1, v));

    Some(TimeAxisSummary {
        finite: count,
        first,
        last,
    })
}

/// Оставляет ось времени, только если в ней есть хотя бы одно конечное
/// значение.
pub fn validate(samples: Vec<f64>) -> Option<Vec<f64>> {
    match summarize(&samples) {
        Some(s) => {
            info!(
                "Time/potential axis: {} finite values, range {:.4} ~ {:.4}",
                s.finite, s.first, s.last
            );
            Some(samples)
        }
        None => {
            warn!(
                "No finite time/potential values among {} frames; time axis dropped",
                samples.len()
            );
            None
        }
    }
}
