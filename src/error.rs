//! Error types for the lifealign engine

use thiserror::Error;

/// Errors that can occur at the engine's parse/encode boundary.
///
/// The scoring core itself is infallible: missing or empty collections
/// degrade to zero scores instead of erroring. These variants only surface
/// when JSON crosses the boundary (input documents, snapshot files, encoded
/// reports).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to parse input document: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Date parse error: {0}")]
    DateParseError(String),

    #[error("Unsupported schema version: expected {expected}, got {actual}")]
    SchemaVersion { expected: String, actual: String },

    #[error("Encoding error: {0}")]
    EncodingError(String),
}
