use std::{
    fs,
    io::{self, BufRead, Write},
    path::PathBuf,
};

use log::{info, warn};
use srs_core::pipeline::{BackgroundSource, Extractor};
use srs_types::SrsError;

use crate::{
    output::{linspace, TableExporter},
    prompt::prompt_wavenumber_range,
    ExtractConfig, ExtractResult,
};

/// Итог одного запуска.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractSummary {
    /// Размер входного файла (байт)
    pub file_size: usize,
    /// Число кадров после обрезки
    pub frames: usize,
    /// Размер матрицы спектров
    pub shape: (usize, usize),
    /// Записана ли ось времени
    pub has_time_axis: bool,
    /// Число фоновых спектров (0, если фон не найден)
    pub background_rows: usize,
    /// Способ поиска фона
    pub background_source: Option<BackgroundSource>,
    /// Таблица спектров
    pub spectra_path: PathBuf,
    /// Таблица фона
    pub background_path: Option<PathBuf>,
}

/// Запуск со стандартным вводом для запроса диапазона.
pub fn run(config: &ExtractConfig) -> ExtractResult<ExtractSummary> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut prompt_out = io::stderr();

    run_with_prompt(config, &mut input, &mut prompt_out)
}

/// Полный запуск: чтение файла, извлечение, запись таблиц.
///
/// Диапазон волновых чисел запрашивается только после успешного
/// извлечения спектров и только если он не задан в конфигурации.
pub fn run_with_prompt<R: BufRead, W: Write>(
    config: &ExtractConfig,
    input: &mut R,
    prompt_out: &mut W,
) -> ExtractResult<ExtractSummary> {
    let buffer = fs::read(&config.input)?;
    info!("File size: {} bytes", buffer.len());
    info!("Mode: {}", config.mode);

    let extractor = Extractor::new(&buffer, config.extraction_config()?);
    let spectra = extractor.extract_spectra()?;
    let cols = spectra.spectra.cols();

    let (start, end) = match config.wavenumber_range() {
        Some(range) => range,
        None => prompt_wavenumber_range(input, prompt_out)?,
    };
    let wavenumbers = linspace(start, end, cols);
    info!("Wavenumber axis: {start} ~ {end} cm⁻¹, {cols} points");

    let exporter = TableExporter::create(&config.outdir, &config.stem())?;
    let spectra_path = exporter.export_spectra(
        &spectra.spectra,
        &wavenumbers,
        spectra.time_axis.as_deref(),
    )?;

    let background = match extractor.extract_background(cols) {
        Ok(bg) if bg.matrix.cols() != cols => {
            warn!(
                "Background has {} points per row, spectra have {cols}; background table not written",
                bg.matrix.cols()
            );
            None
        }
        Ok(bg) => {
            for (i, off) in bg.offsets.iter().enumerate() {
                info!("  BG#{} @{off}", i + 1);
            }
            Some(bg)
        }
        Err(e @ SrsError::StructuralDetection { .. }) => {
            warn!("{e}; background table not written");
            None
        }
        Err(e) => return Err(e.into()),
    };

    let background_path = match &background {
        Some(bg) => Some(exporter.export_background(&bg.matrix, &wavenumbers)?),
        None => None,
    };

    let has_time_axis = spectra
        .time_axis
        .as_ref()
        .is_some_and(|t| t.len() >= spectra.spectra.rows());

    Ok(ExtractSummary {
        file_size: buffer.len(),
        frames: spectra.layout.positions.len(),
        shape: spectra.spectra.shape(),
        has_time_axis,
        background_rows: background.as_ref().map_or(0, |bg| bg.matrix.rows()),
        background_source: background.as_ref().map(|bg| bg.source),
        spectra_path,
        background_path,
    })
}

impl std::fmt::Display for ExtractSummary {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        writeln!(f, "  File size     : {} bytes", self.file_size)?;
        writeln!(f, "  Frames        : {}", self.frames)?;
        writeln!(
            f,
            "  Spectra       : {} x {}{}",
            self.shape.0,
            self.shape.1,
            if self.has_time_axis { " (+ time column)" } else { "" }
        )?;
        match self.background_source {
            Some(src) => writeln!(
                f,
                "  Background    : {} spectra ({src:?})",
                self.background_rows
            )?,
            None => writeln!(f, "  Background    : none")?,
        }
        write!(f, "  Output        : {:?}", self.spectra_path)
    }
}
