//! The `PartyClient` trait: the sole seam between the refinement loop and
//! whatever transport actually moves messages.

use async_trait::async_trait;

use crate::error::WireResult;
use crate::message::{PartyMessage, PartyResponse};

/// Send one message to a named remote party and await its response.
///
/// Guarantees expected of implementations:
/// - One call yields at most one response; no streaming.
/// - A response with neither text nor data must be surfaced as
///   `WireError::RemoteTaskFailed`, never as an empty `Ok`.
/// - Implementations do not retry; retry policy belongs to the caller.
///
/// Implementations must be shareable across tasks (`Send + Sync`) so that
/// independent refinement runs can reuse one client.
#[async_trait]
pub trait PartyClient: Send + Sync {
    /// Deliver `message` to `recipient` and return its response.
    async fn send(&self, recipient: &str, message: PartyMessage) -> WireResult<PartyResponse>;
}
