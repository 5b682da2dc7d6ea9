use thiserror::Error;

/// Результат для операций извлечения SRS.
pub type SrsResult<T> = std::result::Result<T, SrsError>;

/// Этап эвристического поиска, на котором произошёл структурный отказ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionStage {
    /// Поиск маркеров кадров
    FrameSearch,
    /// Сборка матрицы спектров из межкадровых интервалов
    SpectraAssembly,
    /// Поиск смещений фоновых спектров (голосование или сканирование)
    BackgroundSearch,
    /// Чтение фоновых спектров по найденным смещениям
    BackgroundRead,
}

/// Типы ошибок извлечения.
///
/// Терминальной является только [`SrsError::StructuralDetection`]: остальные
/// варианты возникают локально (одна строка, одно поле времени) и
/// вызывающий код превращает их в NaN или пропуск строки.
#[derive(Debug, Error)]
pub enum SrsError {
    /// Эвристика не нашла структуру (слишком мало кадров, нет фона и т.п.)
    #[error("Structural detection failed at {stage}: {reason}")]
    StructuralDetection {
        stage: DetectionStage,
        reason: String,
    },

    /// Срез выходит за пределы буфера
    #[error("Out of bounds: offset {offset} + {len} bytes exceeds buffer of {buffer_len} bytes")]
    Bounds {
        offset: usize,
        len: usize,
        buffer_len: usize,
    },

    /// Чтение вернуло не то количество значений, которое запрашивалось
    #[error("Length mismatch at offset {offset}: expected {expected} values, found {found}")]
    LengthMismatch {
        offset: usize,
        expected: usize,
        found: usize,
    },

    /// ASCII-поле не разобрано как число
    #[error("Decode error: {0}")]
    Decode(String),

    /// Некорректная конфигурация (профиль, маркер, параметр)
    #[error("Config error: {0}")]
    Config(String),
}

impl SrsError {
    /// Удобные конструкторы
    pub fn structural<S: Into<String>>(
        stage: DetectionStage,
        reason: S,
    ) -> Self {
        Self::StructuralDetection {
            stage,
            reason: reason.into(),
        }
    }

    pub fn decode<S: Into<String>>(s: S) -> Self {
        Self::Decode(s.into())
    }

    pub fn config<S: Into<String>>(s: S) -> Self {
        Self::Config(s.into())
    }

    /// `true` для ошибок, которые прекращают извлечение соответствующего
    /// выхода (спектры или фон).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::StructuralDetection { .. } | Self::Config(_)
        )
    }
}

impl std::fmt::Display for DetectionStage {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            DetectionStage::FrameSearch => write!(f, "frame search"),
            DetectionStage::SpectraAssembly => write!(f, "spectra assembly"),
            DetectionStage::BackgroundSearch => write!(f, "background search"),
            DetectionStage::BackgroundRead => write!(f, "background read"),
        }
    }
}
