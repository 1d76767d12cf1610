//! Error types for the semio core library.
//!
//! This module defines all error types that can occur during
//! structure loading and interchange (de)serialization.

use thiserror::Error;

/// Errors that can occur in semio core operations.
#[derive(Debug, Error)]
pub enum SemioError {
    /// A loaded description or serialized record lacks a required field.
    ///
    /// Loading is all-or-nothing: when this error is returned, the prior
    /// forest is left intact.
    #[error("malformed input at index {index}: missing required field '{field}'")]
    MalformedInput {
        /// Position of the offending record among its siblings at the top level
        index: usize,
        /// Name of the missing field
        field: &'static str,
    },

    /// Interchange text could not be parsed as the expected nested shape.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for semio operations.
pub type Result<T> = std::result::Result<T, SemioError>;
