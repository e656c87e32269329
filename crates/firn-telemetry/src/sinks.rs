//! Pluggable event sinks.
//!
//! Sinks consume events from the bus. Tests use in-memory sinks; the
//! `tracing` sink forwards events to whatever subscriber is installed.

use crate::events::SolverEvent;

/// Trait for event consumers.
pub trait EventSink: Send {
    /// Process a single event.
    fn handle(&mut self, event: &SolverEvent);

    /// Called when a solve finishes. Flush buffers, close files, etc.
    fn finalize(&mut self) {}

    /// Human-readable name for this sink.
    fn name(&self) -> &str;
}

/// Collects events into a `Vec` for inspection in tests.
#[derive(Default)]
pub struct VecSink {
    /// Collected events, in arrival order.
    pub events: Vec<SolverEvent>,
}

impl VecSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for VecSink {
    fn handle(&mut self, event: &SolverEvent) {
        self.events.push(event.clone());
    }

    fn name(&self) -> &str {
        "vec_sink"
    }
}

/// Forwards events to the `tracing` subscriber.
pub struct TracingSink;

impl EventSink for TracingSink {
    fn handle(&mut self, event: &SolverEvent) {
        tracing::info!(step = event.step, event = ?event.kind, "solver_event");
    }

    fn name(&self) -> &str {
        "tracing_sink"
    }
}
