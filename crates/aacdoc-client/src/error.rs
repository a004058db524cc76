//! Error types for upstream calls

use aacdoc_core::CoreError;
use thiserror::Error;

/// Errors from the backend or the model endpoint
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport or response decoding failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("{endpoint} call failed with status {status}: {message}")]
    Api {
        endpoint: String,
        status: u16,
        message: String,
    },

    /// The model returned no content (or refused)
    #[error("Model returned no content for {0}")]
    EmptyContent(String),

    /// Model output did not match the content schema
    #[error(transparent)]
    Schema(#[from] CoreError),

    /// A required field is absent from an upstream payload
    #[error("Missing field `{field}` in {endpoint} response")]
    MissingField {
        endpoint: String,
        field: String,
    },
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
