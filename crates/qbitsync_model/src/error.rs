//! Error types for the model crate.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur while decoding or encoding feed messages.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The payload is not valid JSON or does not match the envelope shape.
    #[error("decoding failed: {0}")]
    Decode(#[from] serde_json::Error),

    /// The payload decoded but violates a structural rule.
    #[error("invalid structure: {message}")]
    InvalidStructure {
        /// Description of the structural error.
        message: String,
    },

    /// Failed to encode a value to JSON.
    #[error("encoding failed: {message}")]
    Encode {
        /// Description of the encoding error.
        message: String,
    },
}

impl ModelError {
    /// Creates an invalid structure error.
    pub fn invalid_structure(message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            message: message.into(),
        }
    }
}
