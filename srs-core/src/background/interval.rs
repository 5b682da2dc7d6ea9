//! Запасной поиск фона: линейное сканирование с проверкой «похоже на
//! спектр».

use log::{debug, info};
use srs_types::{BG_INTERVAL_BYTES, BG_SCAN_STEP, DEFAULT_PROBE_POINTS};

use super::shifted;
use crate::{binary::read_f32_le, quality::SpectrumCheck};

/// Сколько интервалов в конце файла не сканируется.
const TAIL_INTERVALS: usize = 10;

/// Что возвращать после первого правдоподобного окна.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Только первое найденное смещение
    Single,
    /// Первое смещение и до `extra` следующих через `interval_bytes`
    Burst { extra: usize },
}

/// Параметры сканирования.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalScanConfig {
    /// Шаг между соседними фоновыми блоками (байт)
    pub interval_bytes: usize,
    /// Поправка от позиции сканирования к началу данных (байт, со знаком)
    pub offset_adjust: i64,
    /// Шаг сканирования (байт)
    pub scan_step: usize,
    /// Число значений в пробном окне
    pub probe_points: usize,
    /// Режим выдачи результата
    pub mode: ScanMode,
}

impl Default for IntervalScanConfig {
    fn default() -> Self {
        Self {
            interval_bytes: BG_INTERVAL_BYTES,
            offset_adjust: 0,
            scan_step: BG_SCAN_STEP,
            probe_points: DEFAULT_PROBE_POINTS,
            mode: ScanMode::Single,
        }
    }
}

/// Ищет первое смещение, где пробное окно правдоподобно.
///
/// Кандидаты `0, step, 2*step, ...` строго меньше
/// `len - 10 * interval_bytes`; проверяется окно по адресу
/// `candidate + offset_adjust`.
pub fn find_first_plausible<P>(
    buffer: &[u8],
    cfg: &IntervalScanConfig,
    check: &P,
) -> Option<usize>
where
    P: SpectrumCheck + ?Sized,
{
    let limit = buffer
        .len()
        .saturating_sub(TAIL_INTERVALS.saturating_mul(cfg.interval_bytes.max(1)));
    let step = cfg.scan_step.max(1);

    for candidate in (0..limit).step_by(step) {
        let Some(actual) = shifted(candidate, cfg.offset_adjust, buffer.len()) else {
            continue;
        };

        let probe = match read_f32_le(buffer, actual, cfg.probe_points) {
            Ok(p) => p,
            Err(e) => {
                debug!("Probe @{actual}: {e}");
                continue;
            }
        };

        if check.is_plausible(&probe) {
            return Some(actual);
        }
    }

    None
}

/// Сканирует буфер и разворачивает результат согласно `cfg.mode`.
///
/// Смещения за пределами буфера не выдаются.
pub fn locate_by_interval<P>(
    buffer: &[u8],
    cfg: &IntervalScanConfig,
    check: &P,
) -> Vec<usize>
where
    P: SpectrumCheck + ?Sized,
{
    let first = match find_first_plausible(buffer, cfg, check) {
        Some(off) => off,
        None => {
            info!(
                "Interval scan found no plausible window (step {}, adjust {}, {} probe points)",
                cfg.scan_step, cfg.offset_adjust, cfg.probe_points
            );
            return Vec::new();
        }
    };

    let offsets: Vec<usize> = match cfg.mode {
        ScanMode::Single => vec![first],
        ScanMode::Burst { extra } => (0..=extra)
            .filter_map(|k| k.checked_mul(cfg.interval_bytes))
            .filter_map(|d| first.checked_add(d))
            .filter(|&off| off < buffer.len())
            .collect(),
    };

    info!("Interval scan: first plausible window @{first}, offsets {offsets:?}");

    offsets
}
