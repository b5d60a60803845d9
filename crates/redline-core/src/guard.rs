//! Adversarial guard: gaming detection over combined detector evidence.
//!
//! Detectors measure rubric compliance; the guard measures whether the
//! narrative was engineered to trigger favorable matches without genuine
//! content. Its penalty is additive to the total risk score and is never
//! folded into a component score, so consumers can always separate "failed
//! the rubric" from "gamed the rubric".

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::detectors::DetectorFinding;
use crate::domain::Dimension;
use crate::ruleset::{GuardConfig, TokenNormalization};

/// A gaming signature the guard recognized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GuardSignature {
    /// One favorable-evidence dimension leaning on a single recurring token.
    KeywordStuffing {
        dimension: Dimension,
        token: String,
        count: usize,
    },
    /// Many lines sharing the same structural skeleton.
    TemplatedStructure { duplicate_ratio: f64 },
    /// Numeric tokens padding the text without surrounding prose.
    MetricPadding { density: f64 },
}

/// Guard outcome for one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardVerdict {
    pub triggered: bool,
    /// Fixed penalty; zero when not triggered.
    pub penalty: u32,
    pub signatures: Vec<GuardSignature>,
}

impl GuardVerdict {
    /// Verdict for a narrative with no gaming signatures.
    pub fn clean() -> Self {
        Self {
            triggered: false,
            penalty: 0,
            signatures: Vec::new(),
        }
    }
}

/// Inspect the text and combined findings for gaming signatures.
///
/// Triggers when at least `min_signatures` distinct signatures fire; each
/// stuffed favorable dimension counts as one signature, so two stuffed
/// dimensions alone are sufficient at the default setting.
pub fn inspect(text: &str, findings: &[DetectorFinding], config: &GuardConfig) -> GuardVerdict {
    let mut signatures = Vec::new();

    for finding in findings {
        if !finding.dimension.is_credit() {
            continue;
        }
        if let Some(sig) = stuffing_signature(text, finding, config) {
            signatures.push(sig);
        }
    }

    if let Some(ratio) = templated_ratio(text) {
        if ratio >= config.template_line_ratio {
            signatures.push(GuardSignature::TemplatedStructure {
                duplicate_ratio: ratio,
            });
        }
    }

    if let Some(density) = disconnected_numeric_density(text) {
        if density >= config.numeric_density {
            signatures.push(GuardSignature::MetricPadding { density });
        }
    }

    let triggered = signatures.len() >= config.min_signatures;
    if triggered {
        debug!(signatures = signatures.len(), "adversarial guard triggered");
    }

    GuardVerdict {
        triggered,
        penalty: if triggered { config.penalty } else { 0 },
        signatures,
    }
}

/// Stuffing check for one favorable dimension: does any normalized evidence
/// token recur at least `repetition_threshold` times, with consecutive
/// occurrences no more than `window_words` apart?
fn stuffing_signature(
    text: &str,
    finding: &DetectorFinding,
    config: &GuardConfig,
) -> Option<GuardSignature> {
    use std::collections::HashMap;

    let mut positions: HashMap<String, Vec<usize>> = HashMap::new();
    for span in &finding.spans {
        let token = normalize_token(&span.snippet, config.normalization);
        let word_index = text[..span.start.min(text.len())].split_whitespace().count();
        positions.entry(token).or_default().push(word_index);
    }

    for (token, mut indices) in positions {
        indices.sort_unstable();
        let mut run = 1usize;
        let mut best = 1usize;
        for pair in indices.windows(2) {
            if pair[1] - pair[0] <= config.window_words {
                run += 1;
                best = best.max(run);
            } else {
                run = 1;
            }
        }
        if best >= config.repetition_threshold {
            return Some(GuardSignature::KeywordStuffing {
                dimension: finding.dimension,
                token,
                count: best,
            });
        }
    }
    None
}

fn normalize_token(snippet: &str, normalization: TokenNormalization) -> String {
    let folded = snippet.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    match normalization {
        TokenNormalization::Exact => folded,
        TokenNormalization::Stem => folded
            .split(' ')
            .map(stem_word)
            .collect::<Vec<_>>()
            .join(" "),
    }
}

/// Crude suffix stripping. Intentionally conservative: only strips when a
/// meaningful stem remains.
fn stem_word(word: &str) -> String {
    const SUFFIXES: [&str; 9] = [
        "ations", "ation", "ized", "izes", "ize", "ing", "ed", "es", "s",
    ];
    for suffix in SUFFIXES {
        if word.len() > suffix.len() + 3 {
            if let Some(stem) = word.strip_suffix(suffix) {
                return stem.to_string();
            }
        }
    }
    word.to_string()
}

/// Ratio of non-unique line skeletons, or `None` for texts too short to
/// exhibit structure.
fn templated_ratio(text: &str) -> Option<f64> {
    use std::collections::HashSet;

    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.len() < 4 {
        return None;
    }

    let skeletons: Vec<String> = lines.iter().map(|l| line_skeleton(l)).collect();
    let unique: HashSet<&String> = skeletons.iter().collect();
    Some(1.0 - unique.len() as f64 / skeletons.len() as f64)
}

/// First three words, case-folded, digits masked.
fn line_skeleton(line: &str) -> String {
    line.split_whitespace()
        .take(3)
        .map(|w| {
            w.to_lowercase()
                .chars()
                .map(|c| if c.is_ascii_digit() { '#' } else { c })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fraction of tokens that are numerics appearing in runs of two or more,
/// or `None` for texts too short to judge.
fn disconnected_numeric_density(text: &str) -> Option<f64> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() < 20 {
        return None;
    }

    let numeric: Vec<bool> = tokens.iter().map(|t| is_numeric_token(t)).collect();
    let mut disconnected = 0usize;
    let mut i = 0usize;
    while i < numeric.len() {
        if numeric[i] {
            let mut j = i;
            while j < numeric.len() && numeric[j] {
                j += 1;
            }
            if j - i >= 2 {
                disconnected += j - i;
            }
            i = j;
        } else {
            i += 1;
        }
    }

    Some(disconnected as f64 / tokens.len() as f64)
}

fn is_numeric_token(token: &str) -> bool {
    let trimmed = token.trim_matches(|c: char| !c.is_ascii_alphanumeric() && c != '.');
    if trimmed.is_empty() {
        return false;
    }
    trimmed.trim_end_matches('%').parse::<f64>().is_ok()
}
