use thiserror::Error;

/// Service-level error taxonomy; handlers map variants to HTTP statuses
/// (NotFound -> 404, InvalidInput -> 400, everything else -> 500).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    /// Any failure inside the generate -> execute -> answer pipeline,
    /// carrying the original message.
    #[error("{0}")]
    Processing(String),

    #[error("{0}")]
    Internal(String),
}
