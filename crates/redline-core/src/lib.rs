//! Redline Core Library
//!
//! Narrative compliance scoring: rubric dimension detectors, adversarial
//! guard, risk aggregation, and inter-rater validation statistics.

pub mod aggregator;
pub mod detectors;
pub mod domain;
pub mod engine;
pub mod guard;
pub mod metrics;
pub mod obs;
pub mod reporting;
pub mod ruleset;
pub mod stats;
pub mod telemetry;

pub use domain::{
    Classification, ComponentScores, Dimension, EvaluationResult, Narrative, Redline,
    RedlineError, RedlineIssue, Result, RiskCategory, Severity,
};

pub use aggregator::{aggregate, assess_substance, SubstanceGate};
pub use detectors::{build_detectors, Detector, DetectorFinding, PatternDetector, Span};
pub use engine::ScoringEngine;
pub use guard::{GuardSignature, GuardVerdict};
pub use ruleset::{
    DimensionMode, DimensionRules, GuardConfig, PatternRule, Ruleset, ScoringConfig,
    TokenNormalization,
};
pub use stats::{
    accuracy_interval, cohen_kappa, validate_batch, AccuracyInterval, ConfidenceLevel,
    ConfusionCounts, IntervalMethod, IntervalOutcome, KappaOutcome, LabeledSample,
    ValidationBatch, ValidationReport,
};

pub use metrics::METRICS;
pub use obs::{
    emit_evaluation_completed, emit_iteration_scored, emit_refinement_started,
    emit_remote_failure, emit_run_terminated, EvalSpan,
};
pub use reporting::{read_evaluation_artifact, render_redline_md, write_evaluation_artifact};
pub use telemetry::init_tracing;

/// Redline version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
