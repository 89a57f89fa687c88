use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocsiftError {
    /// The path's extension does not match the loader's accepted set.
    #[error("invalid {expected} file")]
    InvalidFormat { expected: &'static str },

    /// An extraction method was called before `load`.
    #[error("no document loaded; call load() first")]
    NotLoaded,

    #[error("parse error: {0}")]
    Parse(String),

    #[error("storage is closed")]
    StorageClosed,

    #[error("database error: {0}")]
    Database(#[from] libsql::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DocsiftError>;
