//! Specificity dimension (credit, ceiling 10).
//!
//! Credits concrete numerics: percentages, measured quantities with units,
//! version numbers, before/after comparisons. Prose that never pins a
//! number down takes the full penalty.

use crate::domain::Dimension;
use crate::ruleset::{DimensionMode, DimensionRules, PatternRule};

pub(crate) fn rules() -> DimensionRules {
    DimensionRules {
        dimension: Dimension::Specificity,
        ceiling: 10,
        mode: DimensionMode::Credit,
        patterns: vec![
            PatternRule::new(
                "measured_quantity",
                r"\b\d+(\.\d+)?\s?(ms|milliseconds?|seconds?|minutes?|hours?|kb|mb|gb|tb|qps|rps|hz|khz|mhz|percent)\b",
                3,
            ),
            PatternRule::new(
                "before_after_comparison",
                r"\bfrom\s+\d+(\.\d+)?\s*\S{0,4}\s+(down\s+|up\s+)?to\s+\d+(\.\d+)?",
                3,
            ),
            PatternRule::new("percentage", r"\b\d+(\.\d+)?\s?%", 2),
            PatternRule::new("version_number", r"\bv?\d+\.\d+(\.\d+)+\b", 2),
            PatternRule::new("explicit_ratio", r"\b\d+\s+(of|out\s+of)\s+\d+\b", 2),
            PatternRule::new(
                "counted_noun",
                r"\b\d+\s+(run|sample|iteration|trial|configuration|variant|node|thread|shard|replica)s?\b",
                2,
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
    fn test_numberless_prose_takes_full_penalty() {
        let finding =
            detector().detect("Performance improved considerably after the redesign work.");
        assert_eq!(finding.penalty, 10);
    }

    #[test]
    fn test_measured_results_work_off_penalty() {
        let finding = detector().detect(
            "p99 latency fell from 480ms to 210ms across 12 runs, a 56% reduction.",
        );
        assert_eq!(finding.penalty, 0);
        assert!(finding.evidence_count >= 3);
    }

    #[test]
    fn test_bare_version_numbers_count_little() {
        let finding = detector().detect("We shipped v2.4.1 of the service.");
        assert_eq!(finding.penalty, 10 - 2);
    }
}
