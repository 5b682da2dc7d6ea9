use thiserror::Error;

pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// Ошибка извлечения (структурный отказ, конфигурация)
    #[error("SRS error: {0}")]
    Srs(#[from] srs_types::SrsError),

    /// Ошибка чтения входа или записи таблиц
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Некорректный JSON набора маркеров
    #[error("Marker set JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Некорректный ввод пользователя (диапазон волновых чисел и т.п.)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ExtractError {
    pub fn invalid_input<S: Into<String>>(s: S) -> Self {
        Self::InvalidInput(s.into())
    }
}
