use penguard_core::error::MapError;
use penguard_core::validate::ValidationErrors;

/// Errors at the storage boundary.
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed save data: {0}")]
    Json(#[from] serde_json::Error),

    /// The blob parsed but one or more fields are invalid.
    #[error("invalid save data: {0}")]
    Invalid(ValidationErrors),

    #[error(transparent)]
    Pack(#[from] MapError),
}
