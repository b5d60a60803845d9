//! Routine-engineering dimension (penalty, ceiling 30).
//!
//! Narratives describing debugging, maintenance, cosmetic work, or
//! straightforward adaptation of existing techniques are penalized: the
//! rubric requires work undertaken to resolve technical uncertainty, not
//! routine engineering effort.

use crate::domain::Dimension;
use crate::ruleset::{DimensionMode, DimensionRules, PatternRule};

pub(crate) fn rules() -> DimensionRules {
    DimensionRules {
        dimension: Dimension::RoutineEngineering,
        ceiling: 30,
        mode: DimensionMode::Penalty,
        patterns: vec![
            PatternRule::new("bug_fixing", r"\bbug[\s-]?fix(es|ing)?\b", 8),
            PatternRule::new("debugging", r"\bdebugg?(ed|ing)?\b", 8),
            PatternRule::new("maintenance", r"\bmaintenance\b", 8),
            PatternRule::new("routine_work", r"\broutine\b", 6).negatable(),
            PatternRule::new("minor_changes", r"\bminor\s+(change|update|tweak|fix)e?s?\b", 6),
            PatternRule::new("refactoring", r"\brefactor(ed|ing)?\b", 5),
            PatternRule::new("version_upgrade", r"\bupgrad(e|ed|ing)\b", 5).negatable(),
            PatternRule::new("platform_port", r"\bport(ed|ing)?\s+(to|from)\b", 5),
            PatternRule::new("cosmetic_work", r"\bcosmetic\b", 5),
            PatternRule::new(
                "styling_rebrand",
                r"\b(restyl(e|ed|ing)|re-?brand(ed|ing)?)\b",
                4,
            ),
            PatternRule::new(
                "config_tweaks",
                r"\b(configuration|config)\s+(change|tweak|update)s?\b",
                4,
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::{Detector, PatternDetector};

    fn detector() -> PatternDetector {
        PatternDetector::compile(&rules()).unwrap()
    }

    #[test]
    fn test_debugging_and_maintenance_language_penalized() {
        let finding = detector().detect(
            "Most of the quarter went to debugging the scheduler and routine maintenance \
             of the deployment scripts, plus minor tweaks to logging.",
        );
        assert!(finding.penalty >= 20, "penalty was {}", finding.penalty);
        assert!(finding.evidence_count >= 3);
    }

    #[test]
    fn test_negated_routine_claim_not_penalized() {
        let finding = detector().detect("This was not routine work by any measure.");
        assert!(finding
            .spans
            .iter()
            .all(|s| s.pattern_label != "routine_work"));
    }

    #[test]
    fn test_clean_research_text_scores_zero() {
        let finding = detector().detect(
            "We designed an experiment to resolve uncertainty in the consistency model.",
        );
        assert_eq!(finding.penalty, 0);
    }

    #[test]
    fn test_penalty_clamped_at_ceiling() {
        let finding = detector().detect(&"bug fix debugging maintenance ".repeat(10));
        assert_eq!(finding.penalty, 30);
    }
}
