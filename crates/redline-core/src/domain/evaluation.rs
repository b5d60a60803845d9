//! Evaluation output model: component scores, risk bands, redline issues.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::guard::GuardVerdict;

/// The five rubric dimensions, in aggregation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    RoutineEngineering,
    Vagueness,
    BusinessRisk,
    ExperimentationEvidence,
    Specificity,
}

impl Dimension {
    /// All dimensions in canonical order.
    pub fn all() -> [Dimension; 5] {
        [
            Dimension::RoutineEngineering,
            Dimension::Vagueness,
            Dimension::BusinessRisk,
            Dimension::ExperimentationEvidence,
            Dimension::Specificity,
        ]
    }

    /// Whether this dimension credits qualifying evidence (as opposed to
    /// penalizing disqualifying language).
    pub fn is_credit(self) -> bool {
        matches!(
            self,
            Dimension::ExperimentationEvidence | Dimension::Specificity
        )
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Dimension::RoutineEngineering => "routine_engineering",
            Dimension::Vagueness => "vagueness",
            Dimension::BusinessRisk => "business_risk",
            Dimension::ExperimentationEvidence => "experimentation_evidence",
            Dimension::Specificity => "specificity",
        };
        write!(f, "{s}")
    }
}

/// Pass/fail decision derived from the total risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    Qualifying,
    NonQualifying,
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Classification::Qualifying => write!(f, "QUALIFYING"),
            Classification::NonQualifying => write!(f, "NON_QUALIFYING"),
        }
    }
}

/// Coarse risk band derived from fixed score ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    /// 0–19
    Low,
    /// 20–39
    Moderate,
    /// 40–59
    High,
    /// 60–79
    VeryHigh,
    /// 80–100
    Critical,
}

impl RiskCategory {
    /// Band for a clamped risk score.
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=19 => RiskCategory::Low,
            20..=39 => RiskCategory::Moderate,
            40..=59 => RiskCategory::High,
            60..=79 => RiskCategory::VeryHigh,
            _ => RiskCategory::Critical,
        }
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RiskCategory::Low => "low",
            RiskCategory::Moderate => "moderate",
            RiskCategory::High => "high",
            RiskCategory::VeryHigh => "very_high",
            RiskCategory::Critical => "critical",
        };
        write!(f, "{s}")
    }
}

/// Severity tier of a redline issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// Per-dimension penalties plus the guard-inclusive total.
///
/// # Invariants
///
/// `total_penalty` equals the sum of the five dimension penalties plus the
/// adversarial guard penalty, clamped to `[0, 100]`. Each dimension penalty
/// is already clamped to its configured ceiling by the detector. The guard
/// penalty is intentionally *not* folded into any dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub routine_engineering: u32,
    pub vagueness: u32,
    pub business_risk: u32,
    pub experimentation_evidence: u32,
    pub specificity: u32,
    pub total_penalty: u32,
}

impl ComponentScores {
    /// Penalty for a single dimension.
    pub fn get(&self, dimension: Dimension) -> u32 {
        match dimension {
            Dimension::RoutineEngineering => self.routine_engineering,
            Dimension::Vagueness => self.vagueness,
            Dimension::BusinessRisk => self.business_risk,
            Dimension::ExperimentationEvidence => self.experimentation_evidence,
            Dimension::Specificity => self.specificity,
        }
    }

    /// Sum of the five dimension penalties, excluding the guard.
    pub fn dimension_sum(&self) -> u32 {
        self.routine_engineering
            + self.vagueness
            + self.business_risk
            + self.experimentation_evidence
            + self.specificity
    }
}

/// A single flagged issue in the redline report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedlineIssue {
    pub dimension: Option<Dimension>,
    pub severity: Severity,
    /// What was matched and why it matters.
    pub message: String,
    /// Byte offsets of the triggering span, when one exists.
    pub span: Option<(usize, usize)>,
    /// The matched text, when a span exists.
    pub snippet: Option<String>,
}

/// Ordered list of flagged issues with severity bucket counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Redline {
    pub total_issues: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub issues: Vec<RedlineIssue>,
}

impl Redline {
    /// Build a redline from issues, deriving the bucket counts.
    pub fn from_issues(issues: Vec<RedlineIssue>) -> Self {
        let critical = issues
            .iter()
            .filter(|i| i.severity == Severity::Critical)
            .count();
        let high = issues
            .iter()
            .filter(|i| i.severity == Severity::High)
            .count();
        let medium = issues
            .iter()
            .filter(|i| i.severity == Severity::Medium)
            .count();
        Self {
            total_issues: issues.len(),
            critical,
            high,
            medium,
            issues,
        }
    }
}

/// The complete, immutable outcome of scoring one narrative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Narrative this result belongs to.
    pub narrative_id: Uuid,

    /// Total risk in `[0, 100]`; lower is more compliant.
    pub risk_score: u32,

    /// Pass/fail against the configured qualifying threshold.
    pub classification: Classification,

    /// Coarse band for the risk score.
    pub risk_category: RiskCategory,

    /// Distance-from-boundary confidence in `[0, 1]`.
    pub confidence: f64,

    /// True when the score sits inside the review margin around the
    /// classification boundary.
    pub needs_review: bool,

    /// Per-dimension penalties and guard-inclusive total.
    pub component_scores: ComponentScores,

    /// Adversarial guard outcome, additive and separate from components.
    pub guard: GuardVerdict,

    /// Flagged issues, ordered by severity then dimension.
    pub redline: Redline,

    /// Dimensions whose detector degraded (truncated scan) on this input.
    pub degraded_dimensions: Vec<Dimension>,

    /// Ruleset identity for reproducibility.
    pub rules_version: String,
    /// SHA-256 hex digest of the canonical ruleset JSON.
    pub rules_digest: String,

    /// When the evaluation ran.
    pub evaluated_at: DateTime<Utc>,
}

impl EvaluationResult {
    /// True when the narrative qualifies.
    pub fn is_qualifying(&self) -> bool {
        self.classification == Classification::Qualifying
    }
}
