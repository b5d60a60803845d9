//! Critique payloads sent back to the generating party.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use agent_wire::PartyMessage;
use redline_core::{Classification, Dimension, EvaluationResult, Severity};

/// Redline issues for one dimension, compressed for the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CritiqueIssueSummary {
    pub dimension: Option<Dimension>,
    pub severity: Severity,
    pub count: usize,
    /// One representative issue message.
    pub example: String,
}

/// What the generating party receives between iterations: the score, the
/// verdict, and a summarized redline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CritiquePayload {
    /// Iteration that produced this critique.
    pub attempt: u32,
    pub risk_score: u32,
    pub target_risk_score: u32,
    pub classification: Classification,
    pub guard_triggered: bool,
    pub issues: Vec<CritiqueIssueSummary>,
    /// Short human-readable framing for text-only parties.
    pub summary: String,
}

impl CritiquePayload {
    /// Summarize an evaluation into a critique.
    ///
    /// Issues are grouped per (dimension, severity) with the worst tiers
    /// first, keeping the payload bounded no matter how many spans fired.
    pub fn from_evaluation(
        attempt: u32,
        evaluation: &EvaluationResult,
        target_risk_score: u32,
    ) -> Self {
        // BTreeMap keyed by (reversed severity rank, dimension label) gives
        // deterministic, worst-first grouping.
        let mut grouped: BTreeMap<(u8, String), CritiqueIssueSummary> = BTreeMap::new();
        for issue in &evaluation.redline.issues {
            let rank = match issue.severity {
                Severity::Critical => 0u8,
                Severity::High => 1,
                Severity::Medium => 2,
            };
            let label = issue
                .dimension
                .map(|d| d.to_string())
                .unwrap_or_else(|| "general".to_string());
            grouped
                .entry((rank, label))
                .and_modify(|s| s.count += 1)
                .or_insert_with(|| CritiqueIssueSummary {
                    dimension: issue.dimension,
                    severity: issue.severity,
                    count: 1,
                    example: issue.message.clone(),
                });
        }

        let issues: Vec<CritiqueIssueSummary> = grouped.into_values().collect();
        let summary = format!(
            "Draft scored {} ({}), target is below {}. {} issue(s) flagged across {} area(s); \
             address the critical items first.",
            evaluation.risk_score,
            evaluation.classification,
            target_risk_score,
            evaluation.redline.total_issues,
            issues.len(),
        );

        Self {
            attempt,
            risk_score: evaluation.risk_score,
            target_risk_score,
            classification: evaluation.classification,
            guard_triggered: evaluation.guard.triggered,
            issues,
            summary,
        }
    }

    /// Render this critique as an outbound party message.
    pub fn to_party_message(&self, brief: &str) -> PartyMessage {
        let text = format!(
            "Revise the research narrative to address the attached critique. {}\n\
             Original brief: {brief}",
            self.summary
        );
        PartyMessage::text(text).with_data(
            serde_json::to_value(self).unwrap_or(serde_json::Value::Null),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redline_core::ScoringEngine;

    #[test]
    fn test_critique_groups_issues_per_dimension() {
        let engine = ScoringEngine::with_builtin_rules();
        let evaluation = engine.evaluate_text(
            "Routine maintenance and debugging protected market share and revenue.",
        );
        let critique = CritiquePayload::from_evaluation(1, &evaluation, 20);

        assert_eq!(critique.risk_score, evaluation.risk_score);
        assert!(critique.issues.iter().any(|i| i.count > 1));
        let total: usize = critique.issues.iter().map(|i| i.count).sum();
        assert_eq!(total, evaluation.redline.total_issues);
    }

    #[test]
    fn test_critique_orders_worst_first() {
        let engine = ScoringEngine::with_builtin_rules();
        let evaluation = engine.evaluate_text(
            "Routine maintenance and debugging protected market share and revenue.",
        );
        let critique = CritiquePayload::from_evaluation(1, &evaluation, 20);
        let severities: Vec<Severity> = critique.issues.iter().map(|i| i.severity).collect();
        let mut sorted = severities.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(severities, sorted);
    }

    #[test]
    fn test_party_message_carries_structured_payload() {
        let engine = ScoringEngine::with_builtin_rules();
        let evaluation = engine.evaluate_text("short");
        let critique = CritiquePayload::from_evaluation(2, &evaluation, 20);
        let message = critique.to_party_message("Describe the Q3 research effort.");

        assert!(message.text.as_deref().unwrap().contains("Original brief"));
        let data = message.data.expect("structured payload");
        assert_eq!(data["attempt"], 2);
        assert_eq!(data["risk_score"], evaluation.risk_score);
    }
}
