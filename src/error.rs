//! Caissa error types

/// Caissa error types
#[derive(Debug, thiserror::Error)]
pub enum CaissaError {
    // Transport/upstream errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The upstream envelope reported `status: error` (or carried no
    /// payload) for an entity.
    #[error("upstream error: {0}")]
    Upstream(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Configuration errors
    #[error("no rating service configured")]
    NoService,
}

/// Convenience result type using [`CaissaError`]
pub type Result<T> = std::result::Result<T, CaissaError>;
