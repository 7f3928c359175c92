use thiserror::Error;

#[derive(Debug, Error)]
pub enum CurveError {
    #[error("Geometry error: {0}")]
    Geometry(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

pub type Result<T> = std::result::Result<T, CurveError>;
