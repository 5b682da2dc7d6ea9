use log::{debug, info, warn};
use srs_types::{DetectionStage, Matrix, SrsError, SrsResult, POINT_SIZE};

use crate::binary::read_f32_le;

/// Читает одну фоновую строку: `min((len - offset) / 4, target)` значений.
///
/// Строка длиной 0 или короче вычисленной считается
/// [`SrsError::LengthMismatch`].
pub fn read_row(
    buffer: &[u8],
    offset: usize,
    target_points: usize,
) -> SrsResult<Vec<f32>> {
    let available = buffer.len().saturating_sub(offset) / POINT_SIZE;
    let n = available.min(target_points);

    if n == 0 {
        return Err(SrsError::LengthMismatch {
            offset,
            expected: target_points,
            found: 0,
        });
    }

    let row = read_f32_le(buffer, offset, n)?;

    if row.len() != n {
        return Err(SrsError::LengthMismatch {
            offset,
            expected: n,
            found: row.len(),
        });
    }

    Ok(row)
}

/// Читает фоновые спектры по смещениям и собирает их в матрицу.
///
/// Возвращает смещения принятых строк и матрицу шириной ровно
/// `target_points`. Строки короче (смещение у конца файла) отбрасываются;
/// если полной строки нет ни одной, это [`DetectionStage::BackgroundRead`].
pub fn build_background_matrix(
    buffer: &[u8],
    offsets: &[usize],
    target_points: usize,
) -> SrsResult<(Vec<usize>, Matrix)> {
    if offsets.is_empty() {
        return Err(SrsError::structural(
            DetectionStage::BackgroundSearch,
            "no background payload offsets to read",
        ));
    }

    let mut kept = Vec::with_capacity(offsets.len());
    let mut rows = Vec::with_capacity(offsets.len());

    for &off in offsets {
        match read_row(buffer, off, target_points) {
            Ok(r) if r.len() == target_points => {
                kept.push(off);
                rows.push(r);
            }
            Ok(r) => warn!(
                "Background row @{off} dropped: {} of {target_points} points before end of file",
                r.len()
            ),
            Err(e) => debug!("Background row @{off} dropped: {e}"),
        }
    }

    if rows.is_empty() {
        return Err(SrsError::structural(
            DetectionStage::BackgroundRead,
            format!(
                "none of {} offset(s) {offsets:?} yielded a full row of {target_points} points",
                offsets.len()
            ),
        ));
    }

    let matrix = Matrix::from_rows(rows)?;

    info!(
        "Background matrix: {} rows x {} points",
        matrix.rows(),
        matrix.cols()
    );

    Ok((kept, matrix))
}
