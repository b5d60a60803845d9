//! Business-risk dimension (penalty, ceiling 20).
//!
//! The rubric distinguishes technical uncertainty from commercial
//! uncertainty. Market, revenue, and competition language signals the
//! latter and is penalized; a handful of rules are negation-aware so that
//! "the risk was not commercial" is not flagged.

use crate::domain::Dimension;
use crate::ruleset::{DimensionMode, DimensionRules, PatternRule};

pub(crate) fn rules() -> DimensionRules {
    DimensionRules {
        dimension: Dimension::BusinessRisk,
        ceiling: 20,
        mode: DimensionMode::Penalty,
        patterns: vec![
            PatternRule::new("market_share", r"\bmarket\s+share\b", 10),
            PatternRule::new("revenue_language", r"\brevenue\b", 8),
            PatternRule::new("profit_language", r"\bprofit(s|able|ability)?\b", 8),
            PatternRule::new(
                "competitive_advantage",
                r"\bcompetitive\s+(advantage|edge|position)\b",
                8,
            ),
            PatternRule::new(
                "commercial_risk",
                r"\bcommercial\s+(risk|uncertainty|viability|success)\b",
                8,
            )
            .negatable(),
            PatternRule::new("sales_language", r"\bsales\s+(target|figure|goal|growth)s?\b", 6),
            PatternRule::new(
                "customer_satisfaction",
                r"\bcustomer\s+(satisfaction|retention|acquisition)\b",
                6,
            ),
            PatternRule::new("market_demand", r"\bmarket\s+(demand|opportunity|fit)\b", 6)
                .negatable(),
            PatternRule::new(
                "brand_language",
                r"\bbrand\s+(awareness|recognition|value)\b",
                6,
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
    fn test_market_language_penalized() {
        let finding = detector()
            .detect("The project aimed to grow market share and protect revenue streams.");
        assert!(finding.penalty >= 18);
        assert_eq!(finding.evidence_count, 2);
    }

    #[test]
    fn test_negated_commercial_uncertainty_not_flagged() {
        let finding =
            detector().detect("The uncertainty here was not commercial risk but algorithmic.");
        assert!(finding
            .spans
            .iter()
            .all(|s| s.pattern_label != "commercial_risk"));
    }

    #[test]
    fn test_technical_prose_scores_zero() {
        let finding = detector().detect(
            "We could not predict whether the consensus protocol would converge under \
             asymmetric network partitions.",
        );
        assert_eq!(finding.penalty, 0);
    }
}
