// ===== coilforge/src/error.rs =====
use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoilForgeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),

    #[error("Numeric Error: {0}")]
    Numeric(String),

    #[error("Plot Error: {0}")]
    Plot(String),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for CoilForgeError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        CoilForgeError::Plot(e.to_string())
    }
}

pub type CfResult<T> = Result<T, CoilForgeError>;
