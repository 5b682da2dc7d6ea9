use log::{info, warn};
use srs_types::{
    DetectionStage, FormatVariant, SrsError, SrsResult, DEFAULT_MAX_HITS, FRAME_MARKER,
    PSEUDO_FRAME_GAP_THRESHOLD,
};

use crate::scan::find_all;

/// Параметры поиска кадров.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameConfig {
    /// Маркер начала кадра
    pub marker: Vec<u8>,
    /// Порог первого интервала для ложного кадра #0 (байт)
    pub gap_threshold: usize,
    /// Предел числа найденных маркеров
    pub max_hits: usize,
}

/// Позиции кадров после классификации.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameLayout {
    /// Смещения маркеров, строго возрастают
    pub positions: Vec<usize>,
    /// Значения времени/потенциала, по одному на позицию
    pub time_samples: Vec<f64>,
    /// Вариант раскладки
    pub variant: FormatVariant,
    /// Первый межкадровый интервал до обрезки
    pub first_gap: Option<usize>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            marker: FRAME_MARKER.to_vec(),
            gap_threshold: PSEUDO_FRAME_GAP_THRESHOLD,
            max_hits: DEFAULT_MAX_HITS,
        }
    }
}

/// Находит все маркеры кадров.
///
/// Ошибка [`SrsError::StructuralDetection`], если найдено меньше двух.
pub fn locate(
    buffer: &[u8],
    cfg: &FrameConfig,
) -> SrsResult<Vec<usize>> {
    if cfg.marker.is_empty() {
        return Err(SrsError::config("Frame marker must not be empty"));
    }

    let positions = find_all(buffer, &cfg.marker, cfg.max_hits);

    if positions.len() >= cfg.max_hits {
        warn!(
            "Frame marker hit cap reached ({} hits); the rest of the file is ignored",
            cfg.max_hits
        );
    }

    if positions.len() < 2 {
        return Err(SrsError::structural(
            DetectionStage::FrameSearch,
            format!(
                "found {} frame marker(s) in {} bytes, need at least 2",
                positions.len(),
                buffer.len()
            ),
        ));
    }

    info!("Found {} frame markers", positions.len());

    Ok(positions)
}

/// Определяет вариант раскладки по первому интервалу.
pub fn classify(
    positions: &[usize],
    gap_threshold: usize,
) -> FormatVariant {
    match first_gap(positions) {
        Some(gap) if gap > gap_threshold => FormatVariant::PseudoFramed,
        _ => FormatVariant::Standard,
    }
}

/// Классифицирует раскладку и отбрасывает ложный кадр #0.
///
/// Для [`FormatVariant::PseudoFramed`] удаляется ровно один первый элемент
/// позиций и, если времён осталось больше, чем позиций, — первый элемент
/// времён.
pub fn classify_and_trim(
    mut positions: Vec<usize>,
    mut time_samples: Vec<f64>,
    gap_threshold: usize,
) -> FrameLayout {
    let gap = first_gap(&positions);
    let variant = classify(&positions, gap_threshold);

    if variant == FormatVariant::PseudoFramed {
        info!(
            "Leading pseudo-frame detected (gap {} bytes > {gap_threshold}), dropping frame #0",
            gap.unwrap_or_default()
        );

        positions.remove(0);
        if time_samples.len() > positions.len() {
            time_samples.remove(0);
        }
    }

    FrameLayout {
        positions,
        time_samples,
        variant,
        first_gap: gap,
    }
}

impl FrameLayout {
    /// Раскладка без поиска ложного кадра.
    pub fn untrimmed(
        positions: Vec<usize>,
        time_samples: Vec<f64>,
    ) -> Self {
        let gap = first_gap(&positions);

        Self {
            positions,
            time_samples,
            variant: FormatVariant::Standard,
            first_gap: gap,
        }
    }

    /// Число межкадровых интервалов (верхняя граница числа строк спектров).
    pub fn pair_count(&self) -> usize {
        self.positions.len().saturating_sub(1)
    }
}

fn first_gap(positions: &[usize]) -> Option<usize> {
    match positions {
        [a, b, ..] => Some(b.saturating_sub(*a)),
        _ => None,
    }
}
