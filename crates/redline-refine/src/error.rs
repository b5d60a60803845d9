//! Error types for refinement orchestration.
//!
//! Note the small surface: protocol failures and cancellations are recorded
//! in the sealed [`crate::run::RefinementRun`], not raised. Only
//! construction-time misuse is an error.

/// Errors produced by the refinement layer.
#[derive(Debug, thiserror::Error)]
pub enum RefineError {
    #[error("invalid refinement config: {0}")]
    InvalidConfig(String),

    #[error("scoring error: {0}")]
    Scoring(#[from] redline_core::RedlineError),
}

/// Result type for refinement operations.
pub type RefineResult<T> = std::result::Result<T, RefineError>;
