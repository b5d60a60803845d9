//! Rubric dimension detectors.
//!
//! Each detector maps narrative text to a bounded penalty plus the evidence
//! spans that produced it. All five are instances of one pattern engine
//! configured from an injected [`DimensionRules`] table; there is no
//! per-dimension subclassing, only data. The per-dimension modules hold the
//! curated builtin tables:
//!
//! - [`routine`] — routine-engineering language (penalty, ceiling 30)
//! - [`vagueness`] — marketing filler (penalty, ceiling 25)
//! - [`business_risk`] — commercial-risk language (penalty, ceiling 20)
//! - [`experimentation`] — systematic-experimentation evidence (credit, 15)
//! - [`specificity`] — concrete numerics and measurements (credit, 10)

pub mod business_risk;
pub mod experimentation;
pub mod routine;
pub mod specificity;
pub mod vagueness;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{Dimension, RedlineError, Result};
use crate::ruleset::{DimensionMode, DimensionRules, Ruleset};

/// Inputs longer than this are scanned only up to the cap. The finding is
/// marked degraded so the aggregator can surface a diagnostic flag.
const MAX_SCAN_BYTES: usize = 1 << 20;

/// Look-behind distance, in bytes, for negation cues.
const NEGATION_WINDOW: usize = 48;

const NEGATION_CUES: &str =
    r"\b(not|no|never|without|neither|nor|rather\s+than|instead\s+of|avoid(?:ed|ing)?)\b";

/// A matched evidence span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of the match start within the scanned text.
    pub start: usize,
    /// Byte offset one past the match end.
    pub end: usize,
    /// The matched text.
    pub snippet: String,
    /// Label of the pattern rule that fired.
    pub pattern_label: String,
}

/// Per-detector output for one evaluation call. Ephemeral; recomputed on
/// every call, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorFinding {
    pub dimension: Dimension,
    /// Penalty after clamping to the dimension ceiling.
    pub penalty: u32,
    /// The ceiling the penalty was clamped to.
    pub ceiling: u32,
    /// Number of evidence spans that fired.
    pub evidence_count: usize,
    pub spans: Vec<Span>,
    /// True when the scan was truncated or otherwise degraded.
    pub degraded: bool,
}

impl DetectorFinding {
    /// Zero-evidence, zero-penalty finding used when a detector cannot
    /// produce a meaningful result. The evaluation still completes; the
    /// aggregator records the dimension as degraded.
    pub fn degraded_zero(dimension: Dimension, ceiling: u32) -> Self {
        Self {
            dimension,
            penalty: 0,
            ceiling,
            evidence_count: 0,
            spans: Vec::new(),
            degraded: true,
        }
    }
}

/// The detector capability: text in, bounded finding out.
///
/// Implementations are stateless across calls and must never panic on
/// arbitrary input, empty, malformed, or extremely long text included.
pub trait Detector: Send + Sync {
    fn dimension(&self) -> Dimension;
    fn detect(&self, text: &str) -> DetectorFinding;
}

struct CompiledRule {
    label: String,
    regex: Regex,
    points: u32,
    negatable: bool,
}

/// The single pattern-table detector implementation behind all five
/// dimensions.
pub struct PatternDetector {
    dimension: Dimension,
    ceiling: u32,
    mode: DimensionMode,
    rules: Vec<CompiledRule>,
    negation: Regex,
}

impl PatternDetector {
    /// Compile a detector from one dimension's rule table.
    pub fn compile(table: &DimensionRules) -> Result<Self> {
        let mut rules = Vec::with_capacity(table.patterns.len());
        for rule in &table.patterns {
            let regex = RegexBuilder::new(&rule.pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| RedlineError::InvalidPattern {
                    label: rule.label.clone(),
                    reason: e.to_string(),
                })?;
            rules.push(CompiledRule {
                label: rule.label.clone(),
                regex,
                points: rule.points,
                negatable: rule.negatable,
            });
        }

        let negation = RegexBuilder::new(NEGATION_CUES)
            .case_insensitive(true)
            .build()
            .map_err(|e| RedlineError::InvalidPattern {
                label: "negation_cues".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            dimension: table.dimension,
            ceiling: table.ceiling,
            mode: table.mode,
            rules,
            negation,
        })
    }

    /// True when a negation cue appears shortly before `start`.
    fn is_negated(&self, text: &str, start: usize) -> bool {
        let mut window_start = start.saturating_sub(NEGATION_WINDOW);
        while window_start > 0 && !text.is_char_boundary(window_start) {
            window_start -= 1;
        }
        self.negation.is_match(&text[window_start..start])
    }
}

impl Detector for PatternDetector {
    fn dimension(&self) -> Dimension {
        self.dimension
    }

    fn detect(&self, text: &str) -> DetectorFinding {
        let mut degraded = false;
        let scanned = if text.len() > MAX_SCAN_BYTES {
            degraded = true;
            let mut cap = MAX_SCAN_BYTES;
            while cap > 0 && !text.is_char_boundary(cap) {
                cap -= 1;
            }
            warn!(
                dimension = %self.dimension,
                bytes = text.len(),
                "input exceeds scan cap, truncating"
            );
            &text[..cap]
        } else {
            text
        };

        let mut raw: u32 = 0;
        let mut spans = Vec::new();

        for rule in &self.rules {
            for m in rule.regex.find_iter(scanned) {
                if rule.negatable && self.is_negated(scanned, m.start()) {
                    continue;
                }
                raw = raw.saturating_add(rule.points);
                spans.push(Span {
                    start: m.start(),
                    end: m.end(),
                    snippet: m.as_str().to_string(),
                    pattern_label: rule.label.clone(),
                });
            }
        }

        spans.sort_by_key(|s| (s.start, s.end));

        let penalty = match self.mode {
            DimensionMode::Penalty => raw.min(self.ceiling),
            DimensionMode::Credit => self.ceiling - raw.min(self.ceiling),
        };

        DetectorFinding {
            dimension: self.dimension,
            penalty,
            ceiling: self.ceiling,
            evidence_count: spans.len(),
            spans,
            degraded,
        }
    }
}

/// Compile the fixed, ordered detector list for a validated ruleset.
pub fn build_detectors(ruleset: &Ruleset) -> Result<Vec<Box<dyn Detector>>> {
    let mut detectors: Vec<Box<dyn Detector>> = Vec::with_capacity(5);
    for dimension in Dimension::all() {
        let table = ruleset.dimension(dimension).ok_or_else(|| {
            RedlineError::InvalidRuleset(format!("missing dimension table: {dimension}"))
        })?;
        detectors.push(Box::new(PatternDetector::compile(table)?));
    }
    Ok(detectors)
}
