//! In-memory fakes for the party client (testing only)
//!
//! Provides `ScriptedParty`, `FailingParty`, and `StallingParty` that
//! satisfy the [`PartyClient`] contract without any external dependencies.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::client::PartyClient;
use crate::error::{WireError, WireResult};
use crate::message::{PartyMessage, PartyResponse};

// ---------------------------------------------------------------------------
// ScriptedParty
// ---------------------------------------------------------------------------

/// Replays a queue of canned responses in order.
///
/// When the queue runs dry the last response is repeated, which models a
/// generator that stops improving. Every received message is recorded for
/// assertion in tests.
#[derive(Debug, Default)]
pub struct ScriptedParty {
    responses: Mutex<VecDeque<PartyResponse>>,
    last: Mutex<Option<PartyResponse>>,
    received: Mutex<Vec<(String, PartyMessage)>>,
}

impl ScriptedParty {
    pub fn new(responses: Vec<PartyResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            last: Mutex::new(None),
            received: Mutex::new(Vec::new()),
        }
    }

    /// Party that always answers with the same narrative text.
    pub fn repeating(text: &str) -> Self {
        Self::new(vec![PartyResponse::text(text)])
    }

    /// Messages received so far, in order.
    pub fn received(&self) -> Vec<(String, PartyMessage)> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl PartyClient for ScriptedParty {
    async fn send(&self, recipient: &str, message: PartyMessage) -> WireResult<PartyResponse> {
        self.received
            .lock()
            .unwrap()
            .push((recipient.to_string(), message));

        let mut queue = self.responses.lock().unwrap();
        let response = match queue.pop_front() {
            Some(r) => {
                *self.last.lock().unwrap() = Some(r.clone());
                r
            }
            None => match self.last.lock().unwrap().clone() {
                Some(r) => r,
                None => {
                    return Err(WireError::RemoteTaskFailed(
                        "scripted party has no responses".to_string(),
                    ))
                }
            },
        };

        if response.is_empty() {
            return Err(WireError::RemoteTaskFailed(
                "scripted party produced an empty response".to_string(),
            ));
        }
        Ok(response)
    }
}

// ---------------------------------------------------------------------------
// FailingParty
// ---------------------------------------------------------------------------

/// Fails every call with a transport error.
#[derive(Debug, Default)]
pub struct FailingParty;

#[async_trait]
impl PartyClient for FailingParty {
    async fn send(&self, _recipient: &str, _message: PartyMessage) -> WireResult<PartyResponse> {
        Err(WireError::Transport("connection refused".to_string()))
    }
}

// ---------------------------------------------------------------------------
// StallingParty
// ---------------------------------------------------------------------------

/// Never resolves. Pairs with `tokio::time::timeout` in orchestrator tests.
#[derive(Debug, Default)]
pub struct StallingParty;

#[async_trait]
impl PartyClient for StallingParty {
    async fn send(&self, _recipient: &str, _message: PartyMessage) -> WireResult<PartyResponse> {
        std::future::pending::<()>().await;
        unreachable!("pending future never resolves")
    }
}
