//! Error types for Synheart Proctor

use thiserror::Error;

/// Errors that can occur during monitoring
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Failed to parse frame event: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Missing required landmark indices: {0:?}")]
    MissingLandmarks(Vec<usize>),

    #[error("Malformed landmark at index {index}: ({x}, {y})")]
    MalformedLandmark { index: usize, x: f64, y: f64 },

    #[error("Face detection batch is empty")]
    EmptyBatch,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("Invalid frame event: {0}")]
    InvalidEvent(#[from] crate::schema::ValidationError),

    #[error("Monitor worker stopped")]
    WorkerStopped,
}
