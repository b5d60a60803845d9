//! Structured observability hooks for scoring and refinement lifecycle
//! events.
//!
//! Events are emitted at `info!` level and filtered via `RUST_LOG`.

use tracing::info;

/// RAII guard that enters an evaluation-scoped tracing span.
///
/// # Example
///
/// ```ignore
/// let _span = EvalSpan::enter("3f2a…");
/// // all tracing calls are now associated with narrative_id = "3f2a…"
/// ```
pub struct EvalSpan {
    _span: tracing::span::EnteredSpan,
}

impl EvalSpan {
    /// Create and enter a span tagged with the narrative id.
    pub fn enter(narrative_id: &str) -> Self {
        let span = tracing::info_span!("redline.evaluate", narrative_id = %narrative_id);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: one narrative scored.
pub fn emit_evaluation_completed(
    narrative_id: &str,
    risk_score: u32,
    classification: &str,
    needs_review: bool,
) {
    info!(
        event = "evaluation.completed",
        narrative_id = %narrative_id,
        risk_score = risk_score,
        classification = %classification,
        needs_review = needs_review,
    );
}

/// Emit event: refinement run started.
pub fn emit_refinement_started(run_id: &str, recipient: &str, max_iterations: u32) {
    info!(
        event = "refinement.started",
        run_id = %run_id,
        recipient = %recipient,
        max_iterations = max_iterations,
    );
}

/// Emit event: one refinement iteration scored.
pub fn emit_iteration_scored(run_id: &str, attempt: u32, risk_score: u32) {
    info!(
        event = "refinement.iteration_scored",
        run_id = %run_id,
        attempt = attempt,
        risk_score = risk_score,
    );
}

/// Emit event: refinement run terminated.
pub fn emit_run_terminated(run_id: &str, reason: &str, iterations: usize) {
    info!(
        event = "refinement.terminated",
        run_id = %run_id,
        reason = %reason,
        iterations = iterations,
    );
}

/// Emit event: remote party call failed (warning level).
pub fn emit_remote_failure(run_id: &str, error: &dyn std::fmt::Display) {
    tracing::warn!(event = "refinement.remote_failure", run_id = %run_id, error = %error);
}
