//! The refinement state machine.
//!
//! `Drafting → Scoring → (TargetReached | Critiquing → Drafting) → Terminated`.
//!
//! Drafting delegates to the remote generating party through the injected
//! [`PartyClient`]; Scoring runs the engine synchronously. Every scored
//! iteration is appended to history *before* the transition decision, so
//! the sealed run reflects exactly what was scored, terminating iteration
//! included. `Terminated` is absorbing.
//!
//! Failure semantics: any wire error (timeout included) terminates the run
//! with `remote_failure` and no automatic retry. Retry policy belongs to
//! the caller.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{debug, instrument};
use uuid::Uuid;

use agent_wire::{PartyClient, PartyMessage, PartyResponse, WireError};
use redline_core::{metrics::METRICS, obs, Narrative, ScoringEngine};

use crate::config::RefinementConfig;
use crate::critique::CritiquePayload;
use crate::error::RefineResult;
use crate::run::{RefinementIteration, RefinementRun, TerminationReason};

/// Orchestrator states. `Terminated` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefinementState {
    Drafting,
    Scoring,
    Critiquing,
    Terminated,
}

impl std::fmt::Display for RefinementState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RefinementState::Drafting => "drafting",
            RefinementState::Scoring => "scoring",
            RefinementState::Critiquing => "critiquing",
            RefinementState::Terminated => "terminated",
        };
        write!(f, "{s}")
    }
}

/// Drives repeated generate→score→critique cycles against one remote party.
///
/// Each run is sequential by nature (every draft depends on the previous
/// critique), but independent runs may share one orchestrator concurrently:
/// it holds no per-run mutable state.
pub struct RefinementOrchestrator<C: PartyClient> {
    client: Arc<C>,
    engine: ScoringEngine,
    config: RefinementConfig,
}

impl<C: PartyClient> RefinementOrchestrator<C> {
    /// Build an orchestrator. Fails fast on invalid configuration.
    pub fn new(client: Arc<C>, engine: ScoringEngine, config: RefinementConfig) -> RefineResult<Self> {
        config.validate()?;
        Ok(Self {
            client,
            engine,
            config,
        })
    }

    pub fn config(&self) -> &RefinementConfig {
        &self.config
    }

    /// Run a refinement loop to termination.
    pub async fn run(&self, recipient: &str, brief: &str) -> RefinementRun {
        let (_never_cancelled, cancel) = watch::channel(false);
        self.run_with_cancel(recipient, brief, cancel).await
    }

    /// Run a refinement loop, checking `cancel` between iterations.
    ///
    /// Cancellation never interrupts a detector call (they are short and
    /// non-blocking); it takes effect at the next iteration boundary and
    /// seals the run with whatever history was already recorded.
    #[instrument(skip(self, brief, cancel), fields(recipient = %recipient))]
    pub async fn run_with_cancel(
        &self,
        recipient: &str,
        brief: &str,
        cancel: watch::Receiver<bool>,
    ) -> RefinementRun {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        obs::emit_refinement_started(
            &run_id.to_string(),
            recipient,
            self.config.max_iterations,
        );

        let mut state = RefinementState::Drafting;
        let mut iterations: Vec<RefinementIteration> = Vec::new();
        let mut critique: Option<CritiquePayload> = None;

        let (reason, failure) = loop {
            if *cancel.borrow() {
                break (TerminationReason::Cancelled, None);
            }

            let attempt = iterations.len() as u32 + 1;
            self.transition(run_id, &mut state, RefinementState::Drafting);

            let request = match &critique {
                None => PartyMessage::text(brief.to_string()),
                Some(c) => c.to_party_message(brief),
            };

            let response = match timeout(
                self.config.per_call_timeout(),
                self.client.send(recipient, request),
            )
            .await
            {
                Err(_) => {
                    let err = WireError::Timeout {
                        recipient: recipient.to_string(),
                        elapsed_ms: self.config.per_call_timeout_secs * 1000,
                    };
                    METRICS.inc_remote_failures();
                    obs::emit_remote_failure(&run_id.to_string(), &err);
                    break (TerminationReason::RemoteFailure, Some(err.to_string()));
                }
                Ok(Err(err)) => {
                    METRICS.inc_remote_failures();
                    obs::emit_remote_failure(&run_id.to_string(), &err);
                    break (TerminationReason::RemoteFailure, Some(err.to_string()));
                }
                Ok(Ok(response)) => response,
            };

            let Some(text) = narrative_text(&response) else {
                let err = WireError::RemoteTaskFailed(
                    "response carried no narrative payload".to_string(),
                );
                METRICS.inc_remote_failures();
                obs::emit_remote_failure(&run_id.to_string(), &err);
                break (TerminationReason::RemoteFailure, Some(err.to_string()));
            };

            self.transition(run_id, &mut state, RefinementState::Scoring);
            let narrative = Narrative::new(text);
            let evaluation = self.engine.evaluate(&narrative);
            METRICS.inc_refinement_iterations();
            obs::emit_iteration_scored(&run_id.to_string(), attempt, evaluation.risk_score);

            let target_reached = evaluation.risk_score < self.config.target_risk_score;
            let budget_exhausted = attempt >= self.config.max_iterations;
            let next_critique = if !target_reached && !budget_exhausted {
                Some(CritiquePayload::from_evaluation(
                    attempt,
                    &evaluation,
                    self.config.target_risk_score,
                ))
            } else {
                None
            };

            // History first, transition decision second.
            iterations.push(RefinementIteration {
                attempt,
                narrative,
                evaluation,
                critique: next_critique.clone(),
            });

            if target_reached {
                break (TerminationReason::TargetReached, None);
            }
            if budget_exhausted {
                break (TerminationReason::MaxIterationsReached, None);
            }

            self.transition(run_id, &mut state, RefinementState::Critiquing);
            critique = next_critique;
        };

        self.transition(run_id, &mut state, RefinementState::Terminated);
        let run = RefinementRun::seal(run_id, recipient, iterations, reason, failure, started_at);
        obs::emit_run_terminated(
            &run_id.to_string(),
            &reason.to_string(),
            run.iteration_count(),
        );
        run
    }

    fn transition(&self, run_id: Uuid, state: &mut RefinementState, next: RefinementState) {
        debug!(run_id = %run_id, from = %state, to = %next, "state transition");
        *state = next;
    }
}

/// Extract the draft text from a response: the text payload, or a
/// `narrative`/`text` string field of the structured payload.
fn narrative_text(response: &PartyResponse) -> Option<String> {
    if let Some(text) = &response.text {
        return Some(text.clone());
    }
    let data = response.data.as_ref()?;
    for key in ["narrative", "text"] {
        if let Some(value) = data.get(key).and_then(|v| v.as_str()) {
            return Some(value.to_string());
        }
    }
    None
}
