//! Refinement run history: append-only iterations, sealed on termination.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use redline_core::{EvaluationResult, Narrative};

use crate::critique::CritiquePayload;

/// Why a refinement run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// The latest draft scored below the target.
    TargetReached,
    /// The iteration budget ran out.
    MaxIterationsReached,
    /// The remote party timed out, failed in transport, or failed its task.
    RemoteFailure,
    /// The caller cancelled between iterations.
    Cancelled,
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TerminationReason::TargetReached => "target_reached",
            TerminationReason::MaxIterationsReached => "max_iterations_reached",
            TerminationReason::RemoteFailure => "remote_failure",
            TerminationReason::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

/// One generate→score pass.
///
/// `critique` is present only when another iteration followed: it is the
/// payload that was sent back to the generating party.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinementIteration {
    /// 1-based iteration number.
    pub attempt: u32,
    pub narrative: Narrative,
    pub evaluation: EvaluationResult,
    pub critique: Option<CritiquePayload>,
}

/// A sealed refinement run.
///
/// Fields are private: the run is constructed exactly once by the
/// orchestrator at termination and never mutated afterwards. History is
/// ordered by attempt and reflects exactly what was scored, including the
/// terminating iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinementRun {
    run_id: Uuid,
    recipient: String,
    iterations: Vec<RefinementIteration>,
    reason: TerminationReason,
    /// Human-readable failure detail when `reason` is `RemoteFailure`.
    failure: Option<String>,
    started_at: DateTime<Utc>,
    terminated_at: DateTime<Utc>,
}

impl RefinementRun {
    /// Seal a terminated run. Crate-internal: only the orchestrator builds
    /// runs.
    pub(crate) fn seal(
        run_id: Uuid,
        recipient: &str,
        iterations: Vec<RefinementIteration>,
        reason: TerminationReason,
        failure: Option<String>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            run_id,
            recipient: recipient.to_string(),
            iterations,
            reason,
            failure,
            started_at,
            terminated_at: Utc::now(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// Ordered iteration history.
    pub fn iterations(&self) -> &[RefinementIteration] {
        &self.iterations
    }

    pub fn iteration_count(&self) -> usize {
        self.iterations.len()
    }

    pub fn reason(&self) -> TerminationReason {
        self.reason
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn terminated_at(&self) -> DateTime<Utc> {
        self.terminated_at
    }

    /// Evaluation of the last scored draft, if any draft was scored.
    pub fn final_evaluation(&self) -> Option<&EvaluationResult> {
        self.iterations.last().map(|i| &i.evaluation)
    }

    /// True when the run ended because the target was reached.
    pub fn target_reached(&self) -> bool {
        self.reason == TerminationReason::TargetReached
    }
}
