use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GradeHistoryError {
    #[error("Unknown quarter: {0:?}")]
    UnknownQuarter(String),

    #[error("Invalid term code: {0:?} (expected yyyyq)")]
    InvalidTermCode(String),

    #[error("Row has no term: provide yyyyq or quarter and year")]
    MissingTerm,

    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, GradeHistoryError>;
