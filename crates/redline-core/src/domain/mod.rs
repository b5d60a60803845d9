//! Core domain vocabulary: narratives, evaluation results, errors.

pub mod error;
pub mod evaluation;
pub mod narrative;

pub use error::{RedlineError, Result};
pub use evaluation::{
    Classification, ComponentScores, Dimension, EvaluationResult, Redline, RedlineIssue,
    RiskCategory, Severity,
};
pub use narrative::Narrative;
