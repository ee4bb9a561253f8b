//! Error types for the artifacts crate.

use thiserror::Error;

/// Errors that can occur while loading or evaluating the startup artifacts
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// Artifact file could not be found
    #[error("Artifact file not found: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading an artifact
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Artifact file is not valid JSON for the expected shape
    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Feature schema failed validation
    #[error("Invalid feature schema: {0}")]
    InvalidSchema(String),

    /// Model references a column the schema doesn't have
    #[error("Model references unknown column: {column}")]
    UnknownColumn { column: String },

    /// A tree in a tree ensemble is malformed
    #[error("Invalid tree {tree}: {reason}")]
    InvalidTree { tree: usize, reason: String },

    /// Row passed to the model doesn't match the schema width
    #[error("Expected {expected} features but got {found}")]
    WidthMismatch { expected: usize, found: usize },

    /// Model produced NaN or infinity
    #[error("Model produced a non-finite prediction: {0}")]
    NonFinitePrediction(f64),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ArtifactError>;
