//! The scoring engine: a validated ruleset compiled into the fixed
//! detector pipeline.
//!
//! `detect → substance gate → adversarial guard → aggregate`, synchronous
//! and deterministic per call. The engine holds no mutable state, so one
//! instance can score independent narratives concurrently without
//! synchronization.

use crate::aggregator::{aggregate, assess_substance, lift_to_ceilings};
use crate::detectors::{build_detectors, Detector};
use crate::domain::{EvaluationResult, Narrative, Result};
use crate::guard;
use crate::metrics::METRICS;
use crate::obs;
use crate::ruleset::Ruleset;

/// Narrative compliance scoring engine.
pub struct ScoringEngine {
    ruleset: Ruleset,
    rules_digest: String,
    detectors: Vec<Box<dyn Detector>>,
}

impl ScoringEngine {
    /// Build an engine from a ruleset. Fails fast on any structural or
    /// pattern problem, before any evaluation happens.
    pub fn new(ruleset: Ruleset) -> Result<Self> {
        ruleset.validate()?;
        let rules_digest = ruleset.digest()?;
        let detectors = build_detectors(&ruleset)?;
        Ok(Self {
            ruleset,
            rules_digest,
            detectors,
        })
    }

    /// Engine with the curated builtin ruleset.
    pub fn with_builtin_rules() -> Self {
        Self::new(Ruleset::builtin()).expect("builtin ruleset is valid")
    }

    /// The ruleset this engine was compiled from.
    pub fn ruleset(&self) -> &Ruleset {
        &self.ruleset
    }

    /// SHA-256 hex digest recorded on every evaluation.
    pub fn rules_digest(&self) -> &str {
        &self.rules_digest
    }

    /// Score one narrative. Never fails: malformed or empty input lands at
    /// the worst-case floor, and detector degradation is reported in the
    /// result rather than raised.
    pub fn evaluate(&self, narrative: &Narrative) -> EvaluationResult {
        let _span = obs::EvalSpan::enter(&narrative.narrative_id.to_string());
        let text = narrative.text.as_str();

        let mut findings: Vec<_> = self.detectors.iter().map(|d| d.detect(text)).collect();

        let substance = assess_substance(text, &findings, &self.ruleset.scoring);
        if !substance.passed {
            lift_to_ceilings(&mut findings);
        }

        let guard_verdict = guard::inspect(text, &findings, &self.ruleset.guard);
        if guard_verdict.triggered {
            METRICS.inc_guard_triggered();
        }

        let result = aggregate(
            narrative.narrative_id,
            &findings,
            guard_verdict,
            substance,
            &self.ruleset.scoring,
            &self.ruleset.version,
            &self.rules_digest,
        );

        METRICS.inc_narratives_scored();
        obs::emit_evaluation_completed(
            &narrative.narrative_id.to_string(),
            result.risk_score,
            &result.classification.to_string(),
            result.needs_review,
        );

        result
    }

    /// Wrap raw text in a [`Narrative`] and score it.
    pub fn evaluate_text(&self, text: &str) -> EvaluationResult {
        self.evaluate(&Narrative::new(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Classification;

    #[test]
    fn test_engine_rejects_invalid_ruleset() {
        let mut ruleset = Ruleset::builtin();
        ruleset.dimensions[0].ceiling += 1;
        assert!(ScoringEngine::new(ruleset).is_err());
    }

    #[test]
    fn test_empty_narrative_scores_worst_case() {
        let engine = ScoringEngine::with_builtin_rules();
        let result = engine.evaluate_text("");
        assert!(result.risk_score > 80);
        assert_eq!(result.classification, Classification::NonQualifying);
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let engine = ScoringEngine::with_builtin_rules();
        let narrative = Narrative::new(
            "We hypothesized the cache invalidation raced with replication and tested \
             four alternative fencing strategies over 30 runs.",
        );
        let a = engine.evaluate(&narrative);
        let b = engine.evaluate(&narrative);
        assert_eq!(a.risk_score, b.risk_score);
        assert_eq!(a.component_scores, b.component_scores);
        assert_eq!(a.redline, b.redline);
        assert_eq!(a.rules_digest, b.rules_digest);
    }

    #[test]
    fn test_result_records_rules_identity() {
        let engine = ScoringEngine::with_builtin_rules();
        let result = engine.evaluate_text("anything");
        assert_eq!(result.rules_version, engine.ruleset().version);
        assert_eq!(result.rules_digest, engine.rules_digest());
        assert_eq!(result.rules_digest.len(), 64);
    }
}
