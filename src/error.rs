use thiserror::Error;

#[derive(Debug, Error)]
pub enum AbookError {
    #[error("{field} cannot be blank")]
    BlankField { field: String },

    #[error("Unknown contact method type: {value}")]
    UnknownMethodKind { value: String },

    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Unsupported file format: {filename} (expected .xlsx, .xls or .csv)")]
    UnsupportedFormat { filename: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type AbookResult<T> = Result<T, AbookError>;
