//! Error types for screener.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ScreenerError>;

#[derive(Debug, Error)]
pub enum ScreenerError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("missing config: {0}")]
    MissingConfig(String),

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("empty input: {0}")]
    EmptyInput(String),

    #[error("length mismatch: {vectors} vectors but {metadata} metadata entries")]
    LengthMismatch { vectors: usize, metadata: usize },

    #[error("index corrupt: {0}")]
    IndexCorrupt(String),

    #[error("failed to load text from {}: {reason}", path.display())]
    TextLoad { path: PathBuf, reason: String },

    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("embedding provider error: {0}")]
    Embedding(String),

    #[error("embedding provider timed out after {0:?}")]
    EmbeddingTimeout(Duration),

    #[error("operation cancelled")]
    Cancelled,

    #[error("lock busy: {0}")]
    LockBusy(String),

    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

impl ScreenerError {
    /// Stable machine-readable code for robot output.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Json(_) => "json",
            Self::Config(_) => "config",
            Self::MissingConfig(_) => "missing_config",
            Self::DimensionMismatch { .. } => "dimension_mismatch",
            Self::EmptyInput(_) => "empty_input",
            Self::LengthMismatch { .. } => "length_mismatch",
            Self::IndexCorrupt(_) => "index_corrupt",
            Self::TextLoad { .. } => "text_load",
            Self::UnsupportedFormat(_) => "unsupported_format",
            Self::Embedding(_) => "embedding",
            Self::EmbeddingTimeout(_) => "embedding_timeout",
            Self::Cancelled => "cancelled",
            Self::LockBusy(_) => "lock_busy",
            Self::InvalidQuery(_) => "invalid_query",
        }
    }

    /// Whether the failure aborts a whole build rather than a single document.
    pub const fn is_fatal_to_build(&self) -> bool {
        matches!(
            self,
            Self::EmbeddingTimeout(_) | Self::Cancelled | Self::LockBusy(_)
        )
    }
}
