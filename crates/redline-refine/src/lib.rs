//! Refinement orchestration for Redline.
//!
//! Drives the multi-turn loop between a remote generating party and the
//! scoring engine: request a draft, score it, and either stop (target
//! reached, budget exhausted, remote failure, cancelled) or send a critique
//! back and repeat.
//!
//! # Module layout
//!
//! - [`config`] — `RefinementConfig` (validated fail-fast)
//! - [`run`] — `RefinementRun`, `RefinementIteration`, `TerminationReason`
//! - [`critique`] — `CritiquePayload` built from an evaluation
//! - [`orchestrator`] — `RefinementOrchestrator`, the state machine
//! - [`error`] — `RefineError`, `RefineResult`

pub mod config;
pub mod critique;
pub mod error;
pub mod orchestrator;
pub mod run;

pub use config::RefinementConfig;
pub use critique::{CritiqueIssueSummary, CritiquePayload};
pub use error::{RefineError, RefineResult};
pub use orchestrator::{RefinementOrchestrator, RefinementState};
pub use run::{RefinementIteration, RefinementRun, TerminationReason};
