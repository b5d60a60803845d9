//! Evaluation artifacts and human-readable redline summaries.
//!
//! Artifacts are written as `<dir>/<narrative_id>/evaluation.json` with a
//! SHA-256 digest sidecar; reads verify integrity before deserializing.

use std::path::{Path, PathBuf};

use sha2::{Digest as _, Sha256};

use crate::domain::{EvaluationResult, RedlineError, Result};

/// Persist `<dir>/<narrative_id>/evaluation.json` and
/// `<dir>/<narrative_id>/evaluation.digest`.
pub fn write_evaluation_artifact(result: &EvaluationResult, dir: &Path) -> Result<PathBuf> {
    let run_dir = dir.join(result.narrative_id.to_string());
    std::fs::create_dir_all(&run_dir)?;

    let path = run_dir.join("evaluation.json");
    let digest_path = run_dir.join("evaluation.digest");
    let json = serde_json::to_vec_pretty(result)?;
    let digest = hex::encode(Sha256::digest(&json));

    std::fs::write(&path, &json)?;
    std::fs::write(&digest_path, digest.as_bytes())?;

    Ok(path)
}

/// Read and verify `<dir>/<narrative_id>/evaluation.json` integrity.
pub fn read_evaluation_artifact(narrative_id: &str, dir: &Path) -> Result<EvaluationResult> {
    let run_dir = dir.join(narrative_id);
    let path = run_dir.join("evaluation.json");
    let digest_path = run_dir.join("evaluation.digest");

    let json = std::fs::read(&path)?;
    let digest = std::fs::read_to_string(&digest_path)?;
    let actual = hex::encode(Sha256::digest(&json));
    if digest.trim() != actual {
        return Err(RedlineError::DigestMismatch {
            expected: digest.trim().to_string(),
            actual,
        });
    }
    let result: EvaluationResult = serde_json::from_slice(&json)?;
    Ok(result)
}

/// Render a short markdown summary of an evaluation.
pub fn render_redline_md(result: &EvaluationResult) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "## Narrative {} — {} (risk {}, {})\n\n",
        result.narrative_id, result.classification, result.risk_score, result.risk_category
    ));
    out.push_str(&format!(
        "confidence {:.2}{} | rules {} ({})\n\n",
        result.confidence,
        if result.needs_review {
            ", needs review"
        } else {
            ""
        },
        result.rules_version,
        &result.rules_digest[..12.min(result.rules_digest.len())],
    ));

    out.push_str("| dimension | penalty |\n|---|---|\n");
    out.push_str(&format!(
        "| routine_engineering | {} |\n",
        result.component_scores.routine_engineering
    ));
    out.push_str(&format!(
        "| vagueness | {} |\n",
        result.component_scores.vagueness
    ));
    out.push_str(&format!(
        "| business_risk | {} |\n",
        result.component_scores.business_risk
    ));
    out.push_str(&format!(
        "| experimentation_evidence | {} |\n",
        result.component_scores.experimentation_evidence
    ));
    out.push_str(&format!(
        "| specificity | {} |\n",
        result.component_scores.specificity
    ));
    out.push_str(&format!("| guard | {} |\n\n", result.guard.penalty));

    out.push_str(&format!(
        "### Redline ({} issues: {} critical / {} high / {} medium)\n\n",
        result.redline.total_issues,
        result.redline.critical,
        result.redline.high,
        result.redline.medium
    ));
    for issue in &result.redline.issues {
        let dimension = issue
            .dimension
            .map(|d| d.to_string())
            .unwrap_or_else(|| "general".to_string());
        out.push_str(&format!(
            "- [{}] {}: {}\n",
            issue.severity, dimension, issue.message
        ));
    }
    out
}
