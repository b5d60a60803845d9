//! The narrative: the immutable unit of evaluation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A free-text research narrative submitted for scoring.
///
/// Narratives are never edited in place: a revised draft from the
/// generating party becomes a new `Narrative` that supersedes the old one
/// within a refinement run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Narrative {
    /// Unique identifier for this draft.
    pub narrative_id: Uuid,

    /// The raw text to score.
    pub text: String,

    /// When the draft was received.
    pub created_at: DateTime<Utc>,
}

impl Narrative {
    /// Wrap raw text as a new narrative.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            narrative_id: Uuid::new_v4(),
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    /// Whitespace-delimited word count.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrative_serde_roundtrip() {
        let narrative = Narrative::new("We formed a hypothesis about cache behavior.");
        let json = serde_json::to_string(&narrative).unwrap();
        let back: Narrative = serde_json::from_str(&json).unwrap();
        assert_eq!(narrative, back);
    }

    #[test]
    fn test_word_count_ignores_extra_whitespace() {
        let narrative = Narrative::new("  one\ttwo \n three  ");
        assert_eq!(narrative.word_count(), 3);
    }

    #[test]
    fn test_empty_narrative_is_representable() {
        let narrative = Narrative::new("");
        assert_eq!(narrative.word_count(), 0);
    }
}
