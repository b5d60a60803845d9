//! Versioned, injected rule configuration.
//!
//! Pattern tables, dimension ceilings, guard tuning, and scoring thresholds
//! travel together as one serde value with a version string and a SHA-256
//! digest, so every evaluation can record exactly which rules produced it
//! and rule sets can be swapped without touching code. There is no global
//! mutable pattern state anywhere in the engine.

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

use crate::detectors;
use crate::domain::{Dimension, RedlineError, Result};

/// A single weighted pattern in a dimension's table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternRule {
    /// Stable label used in redline messages and logs.
    pub label: String,

    /// Regex source. Compiled case-insensitively; multi-word phrases should
    /// join words with `\s+` so arbitrary whitespace still matches.
    pub pattern: String,

    /// Points contributed per match.
    pub points: u32,

    /// When true, a match preceded by a negation cue within the look-behind
    /// window is skipped ("the uncertainty was not commercial").
    #[serde(default)]
    pub negatable: bool,
}

impl PatternRule {
    pub fn new(label: &str, pattern: &str, points: u32) -> Self {
        Self {
            label: label.to_string(),
            pattern: pattern.to_string(),
            points,
            negatable: false,
        }
    }

    pub fn negatable(mut self) -> Self {
        self.negatable = true;
        self
    }
}

/// How a dimension turns matches into a penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionMode {
    /// Matches are disqualifying; penalty grows with matches, up to the ceiling.
    Penalty,
    /// Matches are qualifying evidence; penalty starts at the ceiling and
    /// shrinks as evidence accumulates.
    Credit,
}

/// Pattern table and scoring ceiling for one rubric dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionRules {
    pub dimension: Dimension,
    /// Maximum penalty this dimension can contribute.
    pub ceiling: u32,
    pub mode: DimensionMode,
    pub patterns: Vec<PatternRule>,
}

/// Token normalization strategy for the adversarial guard's repetition
/// counter.
///
/// `Exact` case-folds only; `Stem` additionally strips common suffixes,
/// which catches more stuffing but also counts legitimate lexical
/// variation ("experimentation"/"experimented") as repeats. Default is
/// `Exact`; the threshold and mode are calibration data, not constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenNormalization {
    #[default]
    Exact,
    Stem,
}

/// Adversarial guard tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Fixed penalty applied once when the guard triggers.
    pub penalty: u32,
    /// A token must recur at least this many times to count as stuffing.
    pub repetition_threshold: usize,
    /// Consecutive recurrences must fall within this many words of each other.
    pub window_words: usize,
    /// Number of distinct gaming signatures required to trigger.
    pub min_signatures: usize,
    /// Duplicate line-skeleton ratio at or above which structure looks templated.
    pub template_line_ratio: f64,
    /// Fraction of tokens that are disconnected numerics at or above which
    /// the text looks metric-padded.
    pub numeric_density: f64,
    pub normalization: TokenNormalization,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            penalty: 25,
            repetition_threshold: 3,
            window_words: 60,
            min_signatures: 2,
            template_line_ratio: 0.5,
            numeric_density: 0.2,
            normalization: TokenNormalization::Exact,
        }
    }
}

/// Classification thresholds and the substance gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Risk scores strictly below this classify as qualifying.
    pub qualifying_threshold: u32,
    /// Scores within this distance of the threshold get low confidence and
    /// a needs-review flag.
    pub review_margin: u32,
    /// Narratives below this word count, or with zero qualifying evidence,
    /// are scored at every dimension's ceiling (the trivial-baseline floor).
    pub min_substance_words: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            qualifying_threshold: 20,
            review_margin: 8,
            min_substance_words: 40,
        }
    }
}

/// The full rule configuration for one engine instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ruleset {
    /// Rules version recorded on every evaluation.
    pub version: String,
    /// Exactly one table per dimension, in canonical order.
    pub dimensions: Vec<DimensionRules>,
    pub guard: GuardConfig,
    pub scoring: ScoringConfig,
}

impl Ruleset {
    /// The curated default rule set shipped with the engine.
    pub fn builtin() -> Self {
        Self {
            version: "builtin-2026.1".to_string(),
            dimensions: vec![
                detectors::routine::rules(),
                detectors::vagueness::rules(),
                detectors::business_risk::rules(),
                detectors::experimentation::rules(),
                detectors::specificity::rules(),
            ],
            guard: GuardConfig::default(),
            scoring: ScoringConfig::default(),
        }
    }

    /// Load a rule set from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let ruleset: Ruleset = serde_json::from_str(json)?;
        ruleset.validate()?;
        Ok(ruleset)
    }

    /// Table for one dimension, if present.
    pub fn dimension(&self, dimension: Dimension) -> Option<&DimensionRules> {
        self.dimensions.iter().find(|d| d.dimension == dimension)
    }

    /// SHA-256 hex digest of the canonical JSON encoding.
    pub fn digest(&self) -> Result<String> {
        let bytes = serde_json::to_vec(self)?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }

    /// Fail-fast structural validation, run before any evaluation.
    pub fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(RedlineError::InvalidRuleset(
                "version must not be empty".to_string(),
            ));
        }

        for expected in Dimension::all() {
            let count = self
                .dimensions
                .iter()
                .filter(|d| d.dimension == expected)
                .count();
            if count != 1 {
                return Err(RedlineError::InvalidRuleset(format!(
                    "dimension {expected} must appear exactly once, found {count}"
                )));
            }
        }

        let ceiling_sum: u32 = self.dimensions.iter().map(|d| d.ceiling).sum();
        if ceiling_sum != 100 {
            return Err(RedlineError::InvalidRuleset(format!(
                "dimension ceilings must sum to 100, got {ceiling_sum}"
            )));
        }

        for table in &self.dimensions {
            if table.ceiling == 0 {
                return Err(RedlineError::InvalidRuleset(format!(
                    "dimension {} has a zero ceiling",
                    table.dimension
                )));
            }
            if table.patterns.is_empty() {
                return Err(RedlineError::InvalidRuleset(format!(
                    "dimension {} has an empty pattern table",
                    table.dimension
                )));
            }
            for rule in &table.patterns {
                if rule.points == 0 {
                    return Err(RedlineError::InvalidPattern {
                        label: rule.label.clone(),
                        reason: "points must be positive".to_string(),
                    });
                }
                regex::RegexBuilder::new(&rule.pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| RedlineError::InvalidPattern {
                        label: rule.label.clone(),
                        reason: e.to_string(),
                    })?;
            }
        }

        if self.guard.penalty > 100 {
            return Err(RedlineError::InvalidRuleset(format!(
                "guard penalty {} exceeds 100",
                self.guard.penalty
            )));
        }
        if self.guard.repetition_threshold < 2 {
            return Err(RedlineError::InvalidRuleset(
                "guard repetition_threshold must be at least 2".to_string(),
            ));
        }
        if self.guard.min_signatures == 0 || self.guard.min_signatures > 3 {
            return Err(RedlineError::InvalidRuleset(
                "guard min_signatures must be in 1..=3".to_string(),
            ));
        }

        if self.scoring.qualifying_threshold == 0 || self.scoring.qualifying_threshold > 100 {
            return Err(RedlineError::InvalidScoringConfig(format!(
                "qualifying_threshold {} must be in 1..=100",
                self.scoring.qualifying_threshold
            )));
        }
        if self.scoring.review_margin == 0 {
            return Err(RedlineError::InvalidScoringConfig(
                "review_margin must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_ruleset_validates() {
        let ruleset = Ruleset::builtin();
        ruleset.validate().expect("builtin ruleset must validate");
    }

    #[test]
    fn test_builtin_ceilings_sum_to_100() {
        let ruleset = Ruleset::builtin();
        let sum: u32 = ruleset.dimensions.iter().map(|d| d.ceiling).sum();
        assert_eq!(sum, 100);
    }

    #[test]
    fn test_digest_is_stable_for_identical_rulesets() {
        let a = Ruleset::builtin();
        let b = Ruleset::builtin();
        assert_eq!(a.digest().unwrap(), b.digest().unwrap());
    }

    #[test]
    fn test_digest_changes_when_rules_change() {
        let a = Ruleset::builtin();
        let mut b = Ruleset::builtin();
        b.scoring.qualifying_threshold = 30;
        assert_ne!(a.digest().unwrap(), b.digest().unwrap());
    }

    #[test]
    fn test_missing_dimension_rejected() {
        let mut ruleset = Ruleset::builtin();
        ruleset.dimensions.pop();
        assert!(matches!(
            ruleset.validate(),
            Err(RedlineError::InvalidRuleset(_))
        ));
    }

    #[test]
    fn test_bad_ceiling_sum_rejected() {
        let mut ruleset = Ruleset::builtin();
        ruleset.dimensions[0].ceiling += 5;
        let err = ruleset.validate().unwrap_err();
        assert!(err.to_string().contains("sum to 100"));
    }

    #[test]
    fn test_invalid_regex_rejected() {
        let mut ruleset = Ruleset::builtin();
        ruleset.dimensions[0]
            .patterns
            .push(PatternRule::new("broken", "(unclosed", 5));
        assert!(matches!(
            ruleset.validate(),
            Err(RedlineError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_serde_roundtrip_preserves_ruleset() {
        let ruleset = Ruleset::builtin();
        let json = serde_json::to_string(&ruleset).unwrap();
        let back = Ruleset::from_json(&json).unwrap();
        assert_eq!(ruleset, back);
    }

    #[test]
    fn test_zero_review_margin_rejected() {
        let mut ruleset = Ruleset::builtin();
        ruleset.scoring.review_margin = 0;
        assert!(matches!(
            ruleset.validate(),
            Err(RedlineError::InvalidScoringConfig(_))
        ));
    }
}
