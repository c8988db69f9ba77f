use thiserror::Error;

pub type PayrollResult<T> = Result<T, PayrollError>;

#[derive(Error, Debug)]
pub enum PayrollError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Spreadsheet decode error: {0}")]
    Decode(String),

    #[error("Spreadsheet export error: {0}")]
    Export(String),

    #[error("Document error: {0}")]
    Document(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Background task failed: {0}")]
    Task(String),
}
