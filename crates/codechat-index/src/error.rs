use std::path::PathBuf;

use codechat_llm::LlmError;

#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("not a directory: {0}")]
    InvalidDirectory(PathBuf),

    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("embedding failed: {0}")]
    Embedding(#[from] LlmError),

    #[error("vector dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

pub type Result<T> = std::result::Result<T, IndexError>;
