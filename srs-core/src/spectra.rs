use log::{debug, info};
use srs_types::{
    AcceptPolicy, DetectionStage, FormatProfile, Matrix, PointCount, SrsError, SrsResult,
    DEFAULT_FRAME_SPACING, FRAME_TRAILER_SIZE, POINT_SIZE,
};

use crate::{
    binary::{decode_f32_le, slice_checked},
    quality::accepts,
};

/// Минимальное число точек при оценке по межкадровому интервалу.
const MIN_ESTIMATED_POINTS: usize = 100;

/// Сколько первых позиций используется для медианы интервала.
const SPACING_WINDOW: usize = 10;

/// Дополнительные параметры сборки, не зависящие от профиля.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpectraOptions {
    /// Ограничение числа обрабатываемых пар кадров
    pub max_frames: Option<usize>,
    /// Хвост межкадрового интервала, отбрасываемый всегда (байт)
    pub trailer_size: usize,
}

/// Конкретный план сборки: профиль с уже вычисленным числом точек.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssemblyPlan {
    /// Смещение payload от начала кадра (байт)
    pub payload_offset: usize,
    /// Обрезка каждой строки до этого числа точек
    pub point_count: Option<usize>,
    /// Правило приёма строки
    pub accept: AcceptPolicy,
    /// Ограничение числа пар кадров
    pub max_frames: Option<usize>,
    /// Отбрасываемый хвост (байт)
    pub trailer_size: usize,
}

impl Default for SpectraOptions {
    fn default() -> Self {
        Self {
            max_frames: None,
            trailer_size: FRAME_TRAILER_SIZE,
        }
    }
}

impl AssemblyPlan {
    /// Разворачивает профиль для конкретного набора позиций.
    pub fn from_profile(
        profile: &FormatProfile,
        positions: &[usize],
        opts: &SpectraOptions,
    ) -> Self {
        let point_count = match profile.point_count {
            PointCount::Full => None,
            PointCount::Fixed(n) => Some(n),
            PointCount::Estimated => {
                let n = estimate_point_count(positions, profile.payload_offset);
                info!("Estimated {n} points per frame");
                Some(n)
            }
        };

        Self {
            payload_offset: profile.payload_offset,
            point_count,
            accept: profile.accept,
            max_frames: opts.max_frames,
            trailer_size: opts.trailer_size,
        }
    }
}

/// Собирает матрицу спектров из межкадровых интервалов.
///
/// Для каждой пары соседних позиций `(start, end)`:
/// `buffer[start + payload_offset .. end - trailer]` декодируется как f32 LE,
/// при необходимости обрезается до `point_count` и проверяется правилом
/// приёма. Все принятые строки обрезаются до минимальной длины.
pub fn assemble(
    buffer: &[u8],
    positions: &[usize],
    plan: &AssemblyPlan,
) -> SrsResult<Matrix> {
    if positions.len() < 2 {
        return Err(SrsError::structural(
            DetectionStage::SpectraAssembly,
            format!("{} frame position(s), need at least 2", positions.len()),
        ));
    }

    let mut pairs = positions.len() - 1;
    if let Some(max) = plan.max_frames {
        pairs = pairs.min(max);
    }

    let mut rows = Vec::with_capacity(pairs);

    for w in positions.windows(2).take(pairs) {
        let (start, end) = (w[0], w[1]);

        if end <= start {
            debug!("Frame pair @{start}..@{end}: non-increasing, skipped");
            continue;
        }

        let row = match decode_span(buffer, start, end, plan) {
            Ok(r) => r,
            Err(e) => {
                debug!("Frame pair @{start}..@{end}: {e}, skipped");
                continue;
            }
        };

        if accepts(plan.accept, &row) {
            rows.push(row);
        } else {
            debug!(
                "Frame pair @{start}..@{end}: {} values rejected by {:?}",
                row.len(),
                plan.accept
            );
        }
    }

    if rows.is_empty() {
        return Err(SrsError::structural(
            DetectionStage::SpectraAssembly,
            format!(
                "no rows accepted out of {pairs} frame pair(s) (payload offset {}, policy {:?})",
                plan.payload_offset, plan.accept
            ),
        ));
    }

    let matrix = Matrix::from_rows_truncated(rows);

    info!(
        "Spectra matrix: {} rows x {} points (rows = frames, columns = wavenumber points)",
        matrix.rows(),
        matrix.cols()
    );

    Ok(matrix)
}

/// Декодирует один межкадровый интервал.
fn decode_span(
    buffer: &[u8],
    start: usize,
    end: usize,
    plan: &AssemblyPlan,
) -> SrsResult<Vec<f32>> {
    let block_end = end.saturating_sub(plan.trailer_size).max(start);
    let block = slice_checked(buffer, start, block_end)?;
    let payload = block.get(plan.payload_offset..).unwrap_or(&[]);

    let mut row = decode_f32_le(payload);
    if let Some(n) = plan.point_count {
        row.truncate(n);
    }

    Ok(row)
}

/// Оценивает число точек в кадре по медиане первых межкадровых интервалов.
///
/// Если позиций не больше [`SPACING_WINDOW`], используется интервал по
/// умолчанию.
pub fn estimate_point_count(
    positions: &[usize],
    payload_offset: usize,
) -> usize {
    let spacing = if positions.len() > SPACING_WINDOW {
        median_gap(&positions[..SPACING_WINDOW])
    } else {
        DEFAULT_FRAME_SPACING
    };

    ((spacing.saturating_sub(payload_offset)) / POINT_SIZE).max(MIN_ESTIMATED_POINTS)
}

fn median_gap(positions: &[usize]) -> usize {
    let mut gaps: Vec<usize> = positions
        .windows(2)
        .map(|w| w[1].saturating_sub(w[0]))
        .collect();

    if gaps.is_empty() {
        return DEFAULT_FRAME_SPACING;
    }

    gaps.sort_unstable();
    let mid = gaps.len() / 2;

    if gaps.len() % 2 == 0 {
        (gaps[mid - 1] + gaps[mid]) / 2
    } else {
        gaps[mid]
    }
}

#[cfg(test)]
mod tests {
    use srs_types::FRAME_MARKER;

    use super::*;
    use crate::binary::{put_bytes_at, write_f32_le};

    fn plan(payload_offset: usize) -> AssemblyPlan {
        AssemblyPlan::from_profile(
            &FormatProfile {
                name: "test",
                payload_offset,
                point_count: PointCount::Full,
                accept: AcceptPolicy::NonEmpty,
            },
            &[],
            &SpectraOptions::default(),
        )
    }

    /// Кадр: маркер, поле времени, нули до `payload_offset`, значения, хвост.
    fn push_frame(
        buf: &mut Vec<u8>,
        payload_offset: usize,
        values: &[f32],
    ) {
        let start = buf.len();
        put_bytes_at(buf, start, &FRAME_MARKER);
        put_bytes_at(buf, start + 8, b"    1.00");
        buf.resize(start + payload_offset, 0);
        write_f32_le(buf, values);
        buf.extend_from_slice(&[0xEE; 16]);
    }

    #[test]
    fn test_assemble_decodes_bit_exact() {
        let mut buf = Vec::new();
        let a = [1.0f32, 2.5, -3.75];
        let b = [4.0f32, 5.5, 6.25];
        push_frame(&mut buf, 80, &a);
        let p1 = buf.len();
        push_frame(&mut buf, 80, &b);
        let p2 = buf.len();
        buf.extend_from_slice(&FRAME_MARKER);

        let m = assemble(&buf, &[0, p1, p2], &plan(80)).unwrap();

        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.row(0).unwrap(), &a);
        assert_eq!(m.row(1).unwrap(), &b);
    }

    #[test]
    fn test_rows_truncated_to_shortest() {
        let mut buf = Vec::new();
        push_frame(&mut buf, 80, &[1.0, 2.0, 3.0, 4.0]);
        let p1 = buf.len();
        push_frame(&mut buf, 80, &[5.0, 6.0]);
        let p2 = buf.len();
        buf.extend_from_slice(&FRAME_MARKER);

        let m = assemble(&buf, &[0, p1, p2], &plan(80)).unwrap();

        assert_eq!(m.shape(), (2, 2));
        assert_eq!(m.row(0).unwrap(), &[1.0, 2.0]);
    }

    #[test]
    fn test_non_increasing_pairs_skipped() {
        let mut buf = Vec::new();
        push_frame(&mut buf, 80, &[1.0, 2.0]);
        let p1 = buf.len();
        buf.extend_from_slice(&FRAME_MARKER);

        // дубликат позиции: пара (p1, p1) пропускается
        let m = assemble(&buf, &[0, p1, p1], &plan(80)).unwrap();
        assert_eq!(m.rows(), 1);
    }

    #[test]
    fn test_point_count_hint_and_max_frames() {
        let mut buf = Vec::new();
        let mut positions = Vec::new();
        for i in 0..4 {
            positions.push(buf.len());
            push_frame(&mut buf, 80, &[i as f32, 1.0, 2.0, 3.0, 4.0]);
        }
        positions.push(buf.len());
        buf.extend_from_slice(&FRAME_MARKER);

        let mut p = plan(80);
        p.point_count = Some(3);
        p.max_frames = Some(2);

        let m = assemble(&buf, &positions, &p).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.row(1).unwrap(), &[1.0, 1.0, 2.0]);
    }

    #[test]
    fn test_plausible_policy_rejects_flat_rows() {
        let mut buf = Vec::new();
        push_frame(&mut buf, 80, &[0.5; 8]);
        let p1 = buf.len();
        push_frame(&mut buf, 80, &[0.1, 0.4, 0.2, 0.9, 0.3, 0.8, 0.5, 0.7]);
        let p2 = buf.len();
        buf.extend_from_slice(&FRAME_MARKER);

        let mut p = plan(80);
        p.accept = AcceptPolicy::Plausible { min_std: 1e-6 };

        let m = assemble(&buf, &[0, p1, p2], &p).unwrap();
        assert_eq!(m.rows(), 1);
        assert_eq!(m.get(0, 3), Some(0.9));
    }

    #[test]
    fn test_payload_offset_beyond_span_gives_no_data() {
        let mut buf = Vec::new();
        push_frame(&mut buf, 80, &[1.0, 2.0]);
        let p1 = buf.len();
        buf.extend_from_slice(&FRAME_MARKER);

        let err = assemble(&buf, &[0, p1], &plan(27_854)).unwrap_err();
        assert!(matches!(
            err,
            SrsError::StructuralDetection {
                stage: DetectionStage::SpectraAssembly,
                ..
            }
        ));
        assert!(err.to_string().contains("no rows accepted"));
    }

    #[test]
    fn test_single_position_is_structural_failure() {
        let err = assemble(&FRAME_MARKER, &[0], &plan(80)).unwrap_err();
        assert!(err.to_string().contains("need at least 2"));
    }

    #[test]
    fn test_estimate_point_count() {
        // 11 позиций с шагом 3572 → (3572 - 80) / 4 = 873
        let positions: Vec<usize> = (0..11).map(|i| i * 3_572).collect();
        assert_eq!(estimate_point_count(&positions, 80), 873);

        // слишком мало позиций → интервал по умолчанию
        assert_eq!(estimate_point_count(&[0, 100], 80), 873);

        // нижняя граница
        let tight: Vec<usize> = (0..12).map(|i| i * 200).collect();
        assert_eq!(estimate_point_count(&tight, 80), 100);
    }

    #[test]
    fn test_estimated_profile_resolves_point_count() {
        let positions: Vec<usize> = (0..12).map(|i| i * 1_080).collect();
        let p = AssemblyPlan::from_profile(
            &FormatProfile::RAPID_ESTIMATED,
            &positions,
            &SpectraOptions::default(),
        );

        assert_eq!(p.point_count, Some(250));
        assert_eq!(p.accept, AcceptPolicy::AnyFinite);
    }
}
