//! Error types for content validation, scoring and layout

use thiserror::Error;

/// Errors raised while validating content or laying it out
#[derive(Error, Debug)]
pub enum CoreError {
    /// Raw content does not match the declared schema
    #[error("{document} does not match the content schema: {source}")]
    SchemaValidation {
        /// Which document was being validated
        document: &'static str,
        /// Underlying deserialization error (field path and reason)
        #[source]
        source: serde_json::Error,
    },

    /// Scoring bands are undefined for this many evaluation items
    #[error("invalid evaluation item count: {0} (at least one item is required)")]
    InvalidItemCount(usize),

    /// A required field was absent while building blocks
    #[error("layout error in {document}: required field `{field}` is missing")]
    Layout {
        /// Which document was being laid out
        document: &'static str,
        /// The missing field
        field: &'static str,
    },

    /// Validated content could not be serialized for fingerprinting
    #[error("cannot fingerprint content: {0}")]
    Fingerprint(#[source] serde_json::Error),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
