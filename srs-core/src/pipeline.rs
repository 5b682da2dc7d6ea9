//! Полный проход по буферу: спектры и фон.
//!
//! ```text
//! frames::locate ──► time_axis::decode ──► classify_and_trim ──► spectra::assemble
//!                                                                    │ cols
//! background::voting ──(пусто)──► background::interval ──► matrix_builder
//! ```
//!
//! Спектры и фон независимы, общий у них только буфер и число точек.

use log::{info, warn};
use srs_types::{
    DetectionStage, FormatProfile, FormatVariant, Matrix, SrsError, SrsResult,
    BG_BURST_EXTRA, BG_REALTIME_OFFSET_ADJUST,
};

use crate::{
    background::{locate_by_interval, locate_by_votes, IntervalScanConfig, ScanMode, VotingConfig},
    frames::{self, FrameConfig, FrameLayout},
    matrix_builder::build_background_matrix,
    quality::VarianceFloor,
    spectra::{self, AssemblyPlan, SpectraOptions},
    time_axis,
};

/// Как искать фоновые спектры.
#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundStrategy {
    /// Голосование маркеров; если ничего не найдено — сканирование
    VotingWithFallback {
        voting: VotingConfig,
        fallback: IntervalScanConfig,
    },
    /// Только сканирование
    IntervalOnly(IntervalScanConfig),
}

/// Каким способом найдены смещения фона.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundSource {
    Markers,
    IntervalScan,
}

/// Конфигурация одного прохода.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionConfig {
    /// Поиск маркеров кадров
    pub frames: FrameConfig,
    /// Искать ли ложный кадр #0
    pub detect_pseudo_frame: bool,
    /// Профиль для обычной раскладки
    pub standard_profile: FormatProfile,
    /// Профиль для раскладки с ложным кадром; выбирается только явно
    pub pseudo_framed_profile: Option<FormatProfile>,
    /// Ограничения сборки спектров
    pub spectra: SpectraOptions,
    /// Поиск фона
    pub background: BackgroundStrategy,
    /// Критерий «похоже на спектр» для сканирования
    pub quality: VarianceFloor,
}

impl ExtractionConfig {
    /// Rapid Scan: поиск ложного кадра, голосование маркеров фона с
    /// пакетным сканированием в запасе.
    pub fn fast() -> Self {
        Self {
            frames: FrameConfig::default(),
            detect_pseudo_frame: true,
            standard_profile: FormatProfile::RAPID,
            pseudo_framed_profile: None,
            spectra: SpectraOptions::default(),
            background: BackgroundStrategy::VotingWithFallback {
                voting: VotingConfig::default(),
                fallback: IntervalScanConfig {
                    offset_adjust: 0,
                    mode: ScanMode::Burst {
                        extra: BG_BURST_EXTRA,
                    },
                    ..IntervalScanConfig::default()
                },
            },
            quality: VarianceFloor::default(),
        }
    }

    /// Realtime: без поиска ложного кадра, фон одним сканированием со
    /// сдвигом −404 байта.
    pub fn realtime() -> Self {
        Self {
            frames: FrameConfig::default(),
            detect_pseudo_frame: false,
            standard_profile: FormatProfile::REALTIME,
            pseudo_framed_profile: None,
            spectra: SpectraOptions::default(),
            background: BackgroundStrategy::IntervalOnly(IntervalScanConfig {
                offset_adjust: BG_REALTIME_OFFSET_ADJUST,
                mode: ScanMode::Single,
                ..IntervalScanConfig::default()
            }),
            quality: VarianceFloor::default(),
        }
    }

    /// Профиль для данного варианта раскладки.
    ///
    /// Для раскладки с ложным кадром известны два несогласованных
    /// профиля, поэтому без явного выбора это ошибка конфигурации.
    pub fn select_profile(
        &self,
        variant: FormatVariant,
    ) -> SrsResult<FormatProfile> {
        match variant {
            FormatVariant::Standard => Ok(self.standard_profile),
            FormatVariant::PseudoFramed => self.pseudo_framed_profile.ok_or_else(|| {
                SrsError::config(format!(
                    "Leading pseudo-frame detected; choose a payload profile explicitly ({})",
                    FormatProfile::PSEUDO_FRAMED_CANDIDATES.join(" or ")
                ))
            }),
        }
    }
}

/// Результат по спектрам.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectraExtraction {
    /// Позиции кадров после обрезки
    pub layout: FrameLayout,
    /// Ось времени/потенциала; `None`, если нет ни одного конечного значения
    pub time_axis: Option<Vec<f64>>,
    /// Профиль, по которому собрана матрица
    pub profile: FormatProfile,
    /// Строки — кадры, столбцы — точки волнового числа
    pub spectra: Matrix,
}

/// Результат по фону.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundExtraction {
    /// Смещения строк, вошедших в матрицу
    pub offsets: Vec<usize>,
    pub source: BackgroundSource,
    pub matrix: Matrix,
}

/// Итог полного прохода.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub spectra: SpectraExtraction,
    /// `None`, если фон не найден или не прочитан
    pub background: Option<BackgroundExtraction>,
}

/// Извлекает спектры и фон из буфера SRS файла.
pub struct Extractor<'a> {
    buffer: &'a [u8],
    config: ExtractionConfig,
}

impl<'a> Extractor<'a> {
    pub fn new(
        buffer: &'a [u8],
        config: ExtractionConfig,
    ) -> Self {
        Self { buffer, config }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Спектры: кадры → ось времени → обрезка → матрица.
    pub fn extract_spectra(&self) -> SrsResult<SpectraExtraction> {
        let cfg = &self.config;

        let positions = frames::locate(self.buffer, &cfg.frames)?;
        let samples = time_axis::decode(self.buffer, &positions);

        let layout = if cfg.detect_pseudo_frame {
            frames::classify_and_trim(positions, samples, cfg.frames.gap_threshold)
        } else {
            FrameLayout::untrimmed(positions, samples)
        };

        if layout.positions.len() < 2 {
            return Err(SrsError::structural(
                DetectionStage::SpectraAssembly,
                format!(
                    "{} frame position(s) left after dropping the pseudo-frame (first gap {} bytes), need at least 2",
                    layout.positions.len(),
                    layout.first_gap.unwrap_or_default()
                ),
            ));
        }

        let profile = cfg.select_profile(layout.variant)?;
        info!("Layout {}, profile {profile}", layout.variant);

        let plan = AssemblyPlan::from_profile(&profile, &layout.positions, &cfg.spectra);
        let spectra = spectra::assemble(self.buffer, &layout.positions, &plan)?;
        let time_axis = time_axis::validate(layout.time_samples.clone());

        Ok(SpectraExtraction {
            layout,
            time_axis,
            profile,
            spectra,
        })
    }

    /// Смещения фона по стратегии конфигурации.
    ///
    /// Ошибка [`SrsError::StructuralDetection`], если ни одна стратегия
    /// ничего не нашла.
    pub fn locate_background(&self) -> SrsResult<(Vec<usize>, BackgroundSource)> {
        let check = &self.config.quality;

        let (offsets, source) = match &self.config.background {
            BackgroundStrategy::VotingWithFallback { voting, fallback } => {
                let offsets = locate_by_votes(self.buffer, voting);
                if !offsets.is_empty() {
                    (offsets, BackgroundSource::Markers)
                } else {
                    info!("Background markers gave no offsets, falling back to interval scan");
                    (
                        locate_by_interval(self.buffer, fallback, check),
                        BackgroundSource::IntervalScan,
                    )
                }
            }
            BackgroundStrategy::IntervalOnly(scan) => (
                locate_by_interval(self.buffer, scan, check),
                BackgroundSource::IntervalScan,
            ),
        };

        if offsets.is_empty() {
            return Err(SrsError::structural(
                DetectionStage::BackgroundSearch,
                format!(
                    "no background offsets in {} bytes ({})",
                    self.buffer.len(),
                    self.describe_background()
                ),
            ));
        }

        Ok((offsets, source))
    }

    /// Фон: поиск смещений и чтение строк по `target_points` значений.
    pub fn extract_background(
        &self,
        target_points: usize,
    ) -> SrsResult<BackgroundExtraction> {
        let (found, source) = self.locate_background()?;
        let (offsets, matrix) = build_background_matrix(self.buffer, &found, target_points)?;

        Ok(BackgroundExtraction {
            offsets,
            source,
            matrix,
        })
    }

    /// Полный проход. Отказ поиска фона не отменяет спектры.
    pub fn run(&self) -> SrsResult<Extraction> {
        info!("Extracting from {} bytes", self.buffer.len());

        let spectra = self.extract_spectra()?;

        let background = match self.extract_background(spectra.spectra.cols()) {
            Ok(bg) => Some(bg),
            Err(e @ SrsError::StructuralDetection { .. }) => {
                warn!("{e}; continuing without background");
                None
            }
            Err(e) => return Err(e),
        };

        info!(
            "Done: {} frames, spectra {} x {}, {} background spectra",
            spectra.layout.positions.len(),
            spectra.spectra.rows(),
            spectra.spectra.cols(),
            background.as_ref().map_or(0, |b| b.matrix.rows())
        );

        Ok(Extraction {
            spectra,
            background,
        })
    }

    fn describe_background(&self) -> String {
        match &self.config.background {
            BackgroundStrategy::VotingWithFallback { voting, fallback } => format!(
                "{} marker(s), tolerance {}, then scan step {} adjust {}",
                voting.markers.len(),
                voting.tolerance,
                fallback.scan_step,
                fallback.offset_adjust
            ),
            BackgroundStrategy::IntervalOnly(scan) => format!(
                "scan step {} adjust {} interval {}",
                scan.scan_step, scan.offset_adjust, scan.interval_bytes
            ),
        }
    }
}
