//! Эвристическое извлечение спектров из SRS файлов FTIR
//!
//! Формат SRS не документирован: кадры находятся поиском байтового маркера,
//! длина payload выводится из межкадровых интервалов, а фоновые спектры
//! ищутся голосованием нескольких маркеров или сканированием с проверкой
//! «похоже на спектр».
//!
//! # Быстрый старт
//!
//! ```
//! use srs_core::{
//!     pipeline::{ExtractionConfig, Extractor},
//!     synth::{spectrum, SrsBuilder},
//! };
//!
//! let mut b = SrsBuilder::new();
//! b.frame("0.10", 80, &spectrum(32, 0.0));
//! b.frame("0.20", 80, &spectrum(32, 1.0));
//! b.marker("0.30");
//! let buffer = b.build();
//!
//! let out = Extractor::new(&buffer, ExtractionConfig::fast()).run()?;
//! assert_eq!(out.spectra.spectra.shape(), (2, 32));
//! # Ok::<(), srs_types::SrsError>(())
//! ```

pub mod background;
pub mod binary;
pub mod frames;
pub mod matrix_builder;
pub mod pipeline;
pub mod quality;
pub mod scan;
pub mod spectra;
pub mod synth;
pub mod time_axis;

pub use background::*;
pub use frames::*;
pub use matrix_builder::*;
pub use pipeline::*;
pub use quality::*;
pub use scan::*;
pub use spectra::*;

/// Версия библиотеки.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
