//! Global atomic counters for Redline observability.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single
//! `tracing::info!` event (e.g. at the end of a run).

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Lightweight atomic counters — no allocations, no locking.
pub struct Metrics {
    narratives_scored: AtomicU64,
    guard_triggered: AtomicU64,
    refinement_iterations: AtomicU64,
    remote_failures: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            narratives_scored: AtomicU64::new(0),
            guard_triggered: AtomicU64::new(0),
            refinement_iterations: AtomicU64::new(0),
            remote_failures: AtomicU64::new(0),
        }
    }

    /// Increment the narratives-scored counter by one.
    pub fn inc_narratives_scored(&self) {
        self.narratives_scored.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the guard-triggered counter by one.
    pub fn inc_guard_triggered(&self) {
        self.guard_triggered.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the refinement-iterations counter by one.
    pub fn inc_refinement_iterations(&self) {
        self.refinement_iterations.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the remote-failures counter by one.
    pub fn inc_remote_failures(&self) {
        self.remote_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Emit all current counter values as a single `info!` event.
    ///
    /// Call this at natural boundaries (end of a run, CLI exit) rather
    /// than on every increment.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            narratives_scored = self.narratives_scored(),
            guard_triggered = self.guard_triggered(),
            refinement_iterations = self.refinement_iterations(),
            remote_failures = self.remote_failures(),
        );
    }

    /// Read the current narratives-scored count.
    pub fn narratives_scored(&self) -> u64 {
        self.narratives_scored.load(Ordering::Relaxed)
    }

    /// Read the current guard-triggered count.
    pub fn guard_triggered(&self) -> u64 {
        self.guard_triggered.load(Ordering::Relaxed)
    }

    /// Read the current refinement-iterations count.
    pub fn refinement_iterations(&self) -> u64 {
        self.refinement_iterations.load(Ordering::Relaxed)
    }

    /// Read the current remote-failures count.
    pub fn remote_failures(&self) -> u64 {
        self.remote_failures.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero (useful in tests).
    pub fn reset(&self) {
        self.narratives_scored.store(0, Ordering::Relaxed);
        self.guard_triggered.store(0, Ordering::Relaxed);
        self.refinement_iterations.store(0, Ordering::Relaxed);
        self.remote_failures.store(0, Ordering::Relaxed);
    }
}
