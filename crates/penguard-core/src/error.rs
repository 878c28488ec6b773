//! Error types for loading externally authored data.

use crate::validate::ValidationErrors;

/// Errors raised while turning JSON into a `MapDefinition` or `PackExport`.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// The input was not valid JSON, or did not match the expected shape.
    #[error("failed to parse map data: {0}")]
    Json(#[from] serde_json::Error),

    /// The input parsed but one or more fields are invalid.
    #[error("invalid map data: {0}")]
    Invalid(ValidationErrors),
}
