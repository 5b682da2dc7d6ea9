use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use log::info;
use srs_types::Matrix;

use crate::{ExtractError, ExtractResult};

/// Разделитель столбцов в таблицах.
const DELIMITER: &str = "\t";

/// Равномерная сетка из `n` точек от `start` до `end` включительно.
///
/// # Примеры
/// ```
/// use srs_extract::output::linspace;
/// assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// assert_eq!(linspace(4000.0, 400.0, 1), vec![4000.0]);
/// ```
pub fn linspace(
    start: f64,
    end: f64,
    n: usize,
) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut axis: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            axis[n - 1] = end;
            axis
        }
    }
}

/// Число в таблице: кратчайшая точная запись, `nan`/`inf` для особых.
pub fn format_value(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else if v == f64::INFINITY {
        "inf".to_string()
    } else if v == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        v.to_string()
    }
}

fn format_f32(v: f32) -> String {
    if v.is_finite() {
        v.to_string()
    } else {
        format_value(v as f64)
    }
}

/// Путь таблицы спектров: `<outdir>/<stem>.txt`.
pub fn spectra_path(
    outdir: &Path,
    stem: &str,
) -> PathBuf {
    outdir.join(format!("{stem}.txt"))
}

/// Путь таблицы фона: `<outdir>/<stem>_bg.txt`.
pub fn background_path(
    outdir: &Path,
    stem: &str,
) -> PathBuf {
    outdir.join(format!("{stem}_bg.txt"))
}

/// Пишет таблицу спектров.
///
/// Первая строка — волновые числа. Если ось времени есть и её длина не
/// меньше числа строк, первым идёт столбец времени, а заголовок начинается
/// с пустой ячейки.
pub fn write_spectra_table<W: Write>(
    mut out: W,
    spectra: &Matrix,
    wavenumbers: &[f64],
    time_axis: Option<&[f64]>,
) -> ExtractResult<()> {
    check_axis(spectra.cols(), wavenumbers.len())?;

    let time = time_axis.filter(|t| t.len() >= spectra.rows());

    let header: Vec<String> = wavenumbers.iter().map(|w| format!("{w:.6}")).collect();
    if time.is_some() {
        write!(out, "{DELIMITER}")?;
    }
    writeln!(out, "{}", header.join(DELIMITER))?;

    for (i, row) in spectra.iter_rows().enumerate() {
        let mut cells: Vec<String> = Vec::with_capacity(row.len() + 1);
        if let Some(t) = time {
            cells.push(format_value(t[i]));
        }
        cells.extend(row.iter().map(|&v| format_f32(v)));

        writeln!(out, "{}", cells.join(DELIMITER))?;
    }

    out.flush()?;
    Ok(())
}

/// Пишет таблицу фона: столбец волновых чисел и по столбцу на спектр.
pub fn write_background_table<W: Write>(
    mut out: W,
    background: &Matrix,
    wavenumbers: &[f64],
) -> ExtractResult<()> {
    check_axis(background.cols(), wavenumbers.len())?;

    write!(out, "wavenumber")?;
    for i in 1..=background.rows() {
        write!(out, "{DELIMITER}bg{i}")?;
    }
    writeln!(out)?;

    for (j, &wn) in wavenumbers.iter().enumerate() {
        write!(out, "{}", format_value(wn))?;
        for row in background.iter_rows() {
            write!(out, "{DELIMITER}{}", format_f32(row[j]))?;
        }
        writeln!(out)?;
    }

    out.flush()?;
    Ok(())
}

fn check_axis(
    cols: usize,
    axis_len: usize,
) -> ExtractResult<()> {
    if cols != axis_len {
        return Err(ExtractError::invalid_input(format!(
            "wavenumber axis has {axis_len} points, matrix has {cols} columns"
        )));
    }
    Ok(())
}

/// Запись таблиц в каталог результатов.
pub struct TableExporter {
    outdir: PathBuf,
    stem: String,
}

impl TableExporter {
    /// Создаёт каталог, если его нет.
    pub fn create<P: AsRef<Path>>(
        outdir: P,
        stem: &str,
    ) -> ExtractResult<Self> {
        let outdir = outdir.as_ref().to_path_buf();
        fs::create_dir_all(&outdir)?;

        Ok(Self {
            outdir,
            stem: stem.to_string(),
        })
    }

    pub fn export_spectra(
        &self,
        spectra: &Matrix,
        wavenumbers: &[f64],
        time_axis: Option<&[f64]>,
    ) -> ExtractResult<PathBuf> {
        let path = spectra_path(&self.outdir, &self.stem);
        let writer = BufWriter::new(File::create(&path)?);

        write_spectra_table(writer, spectra, wavenumbers, time_axis)?;
        info!("Saved time-resolved spectra: {path:?}");

        Ok(path)
    }

    pub fn export_background(
        &self,
        background: &Matrix,
        wavenumbers: &[f64],
    ) -> ExtractResult<PathBuf> {
        let path = background_path(&self.outdir, &self.stem);
        let writer = BufWriter::new(File::create(&path)?);

        write_background_table(writer, background, wavenumbers)?;
        info!("Saved background spectra: {path:?}");

        Ok(path)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
