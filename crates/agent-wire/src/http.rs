//! Thin HTTP party client.
//!
//! Posts the message as JSON to `<base_url>/parties/<recipient>/messages`
//! and decodes the JSON body as a [`PartyResponse`]. Deliberately thin:
//! no discovery, no auth beyond an optional bearer token, no retries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::PartyClient;
use crate::error::{WireError, WireResult};
use crate::message::{PartyMessage, PartyResponse};

/// HTTP client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpPartyConfig {
    /// Base URL of the party host.
    pub base_url: String,
    /// Optional bearer token.
    pub token: Option<String>,
}

impl Default for HttpPartyConfig {
    fn default() -> Self {
        HttpPartyConfig {
            base_url: std::env::var("REDLINE_PARTY_URL")
                .unwrap_or_else(|_| "http://localhost:8801".to_string()),
            token: std::env::var("REDLINE_PARTY_TOKEN").ok(),
        }
    }
}

impl HttpPartyConfig {
    /// Config from environment variables (`REDLINE_PARTY_URL`, `REDLINE_PARTY_TOKEN`).
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Config for a specific host.
    pub fn new(base_url: &str) -> Self {
        HttpPartyConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Set the bearer token.
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }
}

/// `PartyClient` over plain HTTP JSON.
pub struct HttpPartyClient {
    config: HttpPartyConfig,
    http_client: reqwest::Client,
}

impl HttpPartyClient {
    /// Create a new HTTP party client.
    pub fn new(config: HttpPartyConfig) -> WireResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent("redline-agent-wire/0.2")
            .build()
            .map_err(|e| WireError::Transport(e.to_string()))?;

        Ok(HttpPartyClient {
            config,
            http_client,
        })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> WireResult<Self> {
        Self::new(HttpPartyConfig::from_env())
    }

    fn message_url(&self, recipient: &str) -> String {
        format!(
            "{}/parties/{}/messages",
            self.config.base_url.trim_end_matches('/'),
            recipient
        )
    }
}

#[async_trait]
impl PartyClient for HttpPartyClient {
    async fn send(&self, recipient: &str, message: PartyMessage) -> WireResult<PartyResponse> {
        let url = self.message_url(recipient);
        debug!(recipient = %recipient, url = %url, "posting party message");

        let mut request = self.http_client.post(&url).json(&message);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| WireError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WireError::RemoteTaskFailed(format!(
                "party returned {status}: {body}"
            )));
        }

        let payload: PartyResponse = response
            .json()
            .await
            .map_err(|e| WireError::Transport(format!("invalid response body: {e}")))?;

        if payload.is_empty() {
            return Err(WireError::RemoteTaskFailed(
                "party returned an empty response".to_string(),
            ));
        }

        Ok(payload)
    }
}
