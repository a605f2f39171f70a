use thiserror::Error;

/// Errors raised by the collaborators around the typing engine: loading
/// content, reading config and exporting results. The engine itself never
/// fails.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// No bundled content pack with this name.
    #[error("content pack not found: {0}")]
    ContentNotFound(String),

    #[error("content pack {0} is not valid utf-8")]
    ContentEncoding(String),
}

pub type Result<T> = std::result::Result<T, Error>;
