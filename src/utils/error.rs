use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Error de E/S: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error de JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No se pudo leer el libro de Excel: {0}")]
    SpreadsheetRead(#[from] calamine::Error),

    #[error("No se pudo escribir el libro de Excel: {0}")]
    SpreadsheetWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("No se pudo generar el documento: {0}")]
    Document(String),

    #[error("Error de validación: {0}")]
    Validation(String),

    #[error("No encontrado: {0}")]
    NotFound(String),

    #[error("Ya existe: {0}")]
    AlreadyExists(String),

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn already_exists(msg: impl Into<String>) -> Self {
        Self::AlreadyExists(msg.into())
    }

    pub fn document(msg: impl Into<String>) -> Self {
        Self::Document(msg.into())
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Mensaje corto para la barra de estado (sin prefijo de categoría)
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) | Self::NotFound(msg) | Self::AlreadyExists(msg) | Self::Other(msg) => {
                msg.clone()
            }
            other => other.to_string(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
