//! Error types for party messaging.

use thiserror::Error;

/// Errors a party client can surface to its caller.
///
/// The orchestrator treats all three variants the same way (terminate the
/// run with a remote-failure reason); the split exists so logs and reports
/// can distinguish a slow party from a broken transport from a party that
/// answered "I failed".
#[derive(Error, Debug)]
pub enum WireError {
    /// The per-call deadline elapsed before a response arrived.
    #[error("call to {recipient} timed out after {elapsed_ms}ms")]
    Timeout { recipient: String, elapsed_ms: u64 },

    /// The transport could not deliver the message or the response.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The remote party accepted the message but reported a failed task.
    #[error("remote task failed: {0}")]
    RemoteTaskFailed(String),
}

/// Result type for wire operations.
pub type WireResult<T> = std::result::Result<T, WireError>;
