//! Vagueness dimension (penalty, ceiling 25).
//!
//! Marketing filler and unquantified superlatives score against the
//! narrative: they occupy space without describing what was actually
//! uncertain, attempted, or measured.

use crate::domain::Dimension;
use crate::ruleset::{DimensionMode, DimensionRules, PatternRule};

pub(crate) fn rules() -> DimensionRules {
    DimensionRules {
        dimension: Dimension::Vagueness,
        ceiling: 25,
        mode: DimensionMode::Penalty,
        patterns: vec![
            PatternRule::new("cutting_edge", r"\bcutting[\s-]edge\b", 6),
            PatternRule::new("state_of_the_art", r"\bstate[\s-]of[\s-]the[\s-]art\b", 6),
            PatternRule::new("revolutionary", r"\brevolutionar(y|ily)\b", 6),
            PatternRule::new("synergy", r"\bsynerg(y|ies|istic)\b", 6),
            PatternRule::new("innovative_claim", r"\binnovat(ive|ion)\b", 5),
            PatternRule::new("world_class", r"\bworld[\s-]class\b", 5),
            PatternRule::new("next_generation", r"\bnext[\s-]generation\b", 5),
            PatternRule::new(
                "unquantified_improvement",
                r"\bsignificant(ly)?\s+(improv|enhanc|increas|reduc)\w*",
                5,
            ),
            PatternRule::new(
                "various_enhancements",
                r"\bvarious\s+(improvement|enhancement|change|optimi[sz]ation)s\b",
                5,
            ),
            PatternRule::new("leverage_speak", r"\bleverag(e|ed|ing)\b", 4),
            PatternRule::new("seamless", r"\bseamless(ly)?\b", 4),
            PatternRule::new("robust_claim", r"\bhighly\s+robust\b", 4),
        ],
    }
}
