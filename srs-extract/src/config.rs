use std::path::{Path, PathBuf};

use log::warn;
use srs_core::{
    background::IntervalScanConfig,
    pipeline::{BackgroundStrategy, ExtractionConfig},
};
use srs_types::FormatProfile;

use crate::{markers::load_marker_set, ExtractResult};

/// Режим записи SRS файла.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMode {
    /// Rapid Scan
    Fast,
    /// Realtime
    Realtime,
}

/// Полная конфигурация одного запуска.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Путь к .srs файлу
    pub input: PathBuf,
    /// Режим записи
    pub mode: ExtractMode,
    /// Каталог для таблиц
    pub outdir: PathBuf,
    /// Начало диапазона волновых чисел (см⁻¹); `None` — спросить
    pub start_wn: Option<f64>,
    /// Конец диапазона волновых чисел (см⁻¹); `None` — спросить
    pub end_wn: Option<f64>,
    /// Профиль обычной раскладки (вместо профиля режима)
    pub profile: Option<FormatProfile>,
    /// Профиль раскладки с ложным кадром #0
    pub pseudo_profile: Option<FormatProfile>,
    /// JSON с набором фоновых маркеров
    pub bg_markers: Option<PathBuf>,
    /// Шаг между фоновыми блоками (байт)
    pub bg_interval: Option<usize>,
    /// Поправка начала фона при сканировании (байт)
    pub bg_offset: Option<i64>,
    /// Шаг сканирования (байт)
    pub bg_scan_step: Option<usize>,
    /// Ограничение числа кадров
    pub max_frames: Option<usize>,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl ExtractMode {
    /// Конфигурация ядра для режима без переопределений.
    pub fn base_config(&self) -> ExtractionConfig {
        match self {
            ExtractMode::Fast => ExtractionConfig::fast(),
            ExtractMode::Realtime => ExtractionConfig::realtime(),
        }
    }
}

impl ExtractConfig {
    pub fn new<P: AsRef<Path>>(
        input: P,
        mode: ExtractMode,
    ) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            mode,
            ..Self::default()
        }
    }

    /// Диапазон волновых чисел, если заданы обе границы.
    pub fn wavenumber_range(&self) -> Option<(f64, f64)> {
        self.start_wn.zip(self.end_wn)
    }

    /// Имя входного файла без расширения (основа имён таблиц).
    pub fn stem(&self) -> String {
        self.input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "spectra".to_string())
    }

    /// Собирает конфигурацию ядра: режим плюс переопределения.
    pub fn extraction_config(&self) -> ExtractResult<ExtractionConfig> {
        let mut cfg = self.mode.base_config();

        if let Some(p) = self.profile {
            cfg.standard_profile = p;
        }

        if self.pseudo_profile.is_some() && !cfg.detect_pseudo_frame {
            warn!("--pseudo-profile is ignored in {} mode", self.mode);
        }
        cfg.pseudo_framed_profile = self.pseudo_profile;
        cfg.spectra.max_frames = self.max_frames;

        match &mut cfg.background {
            BackgroundStrategy::VotingWithFallback { voting, fallback } => {
                if let Some(path) = &self.bg_markers {
                    voting.markers = load_marker_set(path)?;
                }
                self.apply_scan_overrides(fallback);
            }
            BackgroundStrategy::IntervalOnly(scan) => {
                if self.bg_markers.is_some() {
                    warn!("--bg-markers is ignored in {} mode", self.mode);
                }
                self.apply_scan_overrides(scan);
            }
        }

        Ok(cfg)
    }

    fn apply_scan_overrides(
        &self,
        scan: &mut IntervalScanConfig,
    ) {
        if let Some(v) = self.bg_interval {
            scan.interval_bytes = v;
        }
        if let Some(v) = self.bg_offset {
            scan.offset_adjust = v;
        }
        if let Some(v) = self.bg_scan_step {
            scan.scan_step = v;
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для ExtractMode, ExtractConfig
////////////////////////////////////////////////////////////////////////////////

impl std::fmt::Display for ExtractMode {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            ExtractMode::Fast => write!(f, "fast"),
            ExtractMode::Realtime => write!(f, "realtime"),
        }
    }
}

impl std::str::FromStr for ExtractMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fast" | "rapid" | "rapid-scan" => Ok(ExtractMode::Fast),
            "realtime" | "real-time" | "rt" => Ok(ExtractMode::Realtime),
            _ => Err(format!("Unknown mode: '{s}'. Use: fast, realtime")),
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            mode: ExtractMode::Fast,
            outdir: PathBuf::from("output"),
            start_wn: None,
            end_wn: None,
            profile: None,
            pseudo_profile: None,
            bg_markers: None,
            bg_interval: None,
            bg_offset: None,
            bg_scan_step: None,
            max_frames: None,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
