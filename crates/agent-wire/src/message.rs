//! Message and response payloads exchanged with a remote party.

use serde::{Deserialize, Serialize};

/// Outbound message: free text, structured data, or both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartyMessage {
    /// Human-readable instruction or brief.
    pub text: Option<String>,

    /// Structured context (critique payloads, scoring summaries).
    pub data: Option<serde_json::Value>,
}

impl PartyMessage {
    /// Message carrying only text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            data: None,
        }
    }

    /// Attach a structured payload.
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// True when the message carries neither payload.
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.data.is_none()
    }
}

/// Inbound response: a finite (non-streaming) result per call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartyResponse {
    /// Text payload, if the party produced one.
    pub text: Option<String>,

    /// Structured payload, if the party produced one.
    pub data: Option<serde_json::Value>,
}

impl PartyResponse {
    /// Response carrying only text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            data: None,
        }
    }

    /// True when the response carries neither payload.
    ///
    /// Callers treat an empty response as a failed remote task: the party
    /// answered, but produced nothing to score.
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.data.is_none()
    }
}
