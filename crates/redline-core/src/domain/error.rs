//! Domain-level error taxonomy for Redline.
//!
//! Only configuration-time misuse is fatal: malformed narrative text is
//! scored (at the worst-case floor), never raised as an error.

/// Redline domain errors.
#[derive(Debug, thiserror::Error)]
pub enum RedlineError {
    #[error("invalid ruleset: {0}")]
    InvalidRuleset(String),

    #[error("invalid pattern '{label}': {reason}")]
    InvalidPattern { label: String, reason: String },

    #[error("invalid scoring config: {0}")]
    InvalidScoringConfig(String),

    #[error("digest mismatch: expected {expected}, got {actual}")]
    DigestMismatch { expected: String, actual: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for Redline domain operations.
pub type Result<T> = std::result::Result<T, RedlineError>;
