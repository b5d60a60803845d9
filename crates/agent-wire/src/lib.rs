//! Party-to-party messaging contract for Redline.
//!
//! This crate defines the abstraction the refinement orchestrator uses to
//! talk to a remote generating party:
//! - `PartyClient`: async send-one-message-get-one-response trait
//! - `PartyMessage` / `PartyResponse`: text and/or structured payloads
//! - `WireError`: timeout / transport / remote-task-failure taxonomy
//!
//! The contract is backend-agnostic. A thin HTTP implementation lives in
//! `http`; in-memory fakes for tests live in `fakes`. Discovery,
//! authentication, and wire encoding are the transport's problem, not ours.

pub mod client;
pub mod error;
pub mod fakes;
pub mod http;
pub mod message;

pub use client::PartyClient;
pub use error::{WireError, WireResult};
pub use fakes::{FailingParty, ScriptedParty, StallingParty};
pub use http::{HttpPartyClient, HttpPartyConfig};
pub use message::{PartyMessage, PartyResponse};
