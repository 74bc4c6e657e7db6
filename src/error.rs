//! Error types for the schema model

use thiserror::Error;

/// Result type for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Schema model errors
///
/// Only programming and I/O failures surface here. Imperfect schema data is
/// reported through [`crate::diagnostics::Diagnostics`] instead.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Duplicate edge key in relationship graph: {key}")]
    DuplicateEdge { key: String },

    #[error("Unknown entity type: {0}")]
    InvalidEntityType(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),
}
