//! Refinement loop configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{RefineError, RefineResult};

/// Tunables for one refinement run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinementConfig {
    /// Hard cap on generate→score cycles.
    pub max_iterations: u32,

    /// Risk scores strictly below this end the loop as a success.
    pub target_risk_score: u32,

    /// Deadline for each remote draft request.
    pub per_call_timeout_secs: u64,
}

impl Default for RefinementConfig {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            target_risk_score: 20,
            per_call_timeout_secs: 300,
        }
    }
}

impl RefinementConfig {
    /// Fail-fast validation, run at orchestrator construction.
    pub fn validate(&self) -> RefineResult<()> {
        if self.max_iterations == 0 {
            return Err(RefineError::InvalidConfig(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if self.target_risk_score == 0 || self.target_risk_score > 100 {
            return Err(RefineError::InvalidConfig(format!(
                "target_risk_score {} must be in 1..=100",
                self.target_risk_score
            )));
        }
        if self.per_call_timeout_secs == 0 {
            return Err(RefineError::InvalidConfig(
                "per_call_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// The per-call deadline as a [`Duration`].
    pub fn per_call_timeout(&self) -> Duration {
        Duration::from_secs(self.per_call_timeout_secs)
    }
}
