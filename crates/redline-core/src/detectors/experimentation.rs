//! Experimentation-evidence dimension (credit, ceiling 15).
//!
//! Credit mode: the penalty starts at the ceiling and is worked off by
//! evidence of systematic experimentation (hypotheses, tested alternatives,
//! documented failures, controlled comparisons). A narrative with no such
//! evidence takes the full 15 points.

use crate::domain::Dimension;
use crate::ruleset::{DimensionMode, DimensionRules, PatternRule};

pub(crate) fn rules() -> DimensionRules {
    DimensionRules {
        dimension: Dimension::ExperimentationEvidence,
        ceiling: 15,
        mode: DimensionMode::Credit,
        patterns: vec![
            PatternRule::new("hypothesis", r"\bhypothes(is|es|ized|ize)\b", 5),
            PatternRule::new("experiment", r"\bexperiment(s|ed|ation|al)?\b", 4),
            PatternRule::new(
                "tested_alternatives",
                r"\b(test|tri|evaluat|compar)(ed|ing|al)\s+(\w+\s+){0,2}(alternative|variant|approach|candidate|configuration|strateg)\w*",
                4,
            ),
            PatternRule::new("prototype", r"\bprototyp(e|es|ed|ing)\b", 4),
            PatternRule::new("ab_testing", r"\ba/b\s+test(s|ed|ing)?\b", 4),
            PatternRule::new("control_group", r"\bcontrol\s+(group|condition|run)s?\b", 4),
            PatternRule::new("documented_failure", r"\bfail(ed|ure)s?\b", 3),
            PatternRule::new("iteration", r"\biterat(e|ed|ion|ions|ive|ively)\b", 3),
            PatternRule::new("benchmarking", r"\bbenchmark(s|ed|ing)?\b", 3),
            PatternRule::new("measurement", r"\bmeasur(e|ed|ing|ement|ements)\b", 3),
            PatternRule::new("trial_runs", r"\btrial(s|ed)?\b", 3),
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
    fn test_no_evidence_takes_full_penalty() {
        let finding = detector().detect("We built a new dashboard for the operations team.");
        assert_eq!(finding.penalty, 15);
        assert_eq!(finding.evidence_count, 0);
    }

    #[test]
    fn test_dense_evidence_works_off_entire_penalty() {
        let finding = detector().detect(
            "We hypothesized that lock contention caused the stalls, tested three \
             alternative queue designs, and measured each against a control run. \
             The first two prototypes failed under sustained load.",
        );
        assert_eq!(finding.penalty, 0);
        assert!(finding.evidence_count >= 4);
    }

    #[test]
    fn test_partial_evidence_leaves_partial_penalty() {
        let finding = detector().detect("One experiment was attempted late in the quarter.");
        assert_eq!(finding.penalty, 15 - 4);
    }
}
