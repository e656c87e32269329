//! Event bus — broadcast-style dispatch with pluggable sinks.
//!
//! `emit` is cheap and non-blocking (an `mpsc` send), so the solver can
//! call it from inside its iteration loop. Sinks only run during `flush`,
//! which the solver calls once per step after the parallel work is done.

use std::sync::mpsc;

use crate::events::SolverEvent;
use crate::sinks::EventSink;

/// Broadcast event bus for solver telemetry.
pub struct EventBus {
    sender: mpsc::Sender<SolverEvent>,
    receiver: mpsc::Receiver<SolverEvent>,
    sinks: Vec<Box<dyn EventSink>>,
    /// A disabled bus drops events silently.
    enabled: bool,
}

impl EventBus {
    /// Creates a new bus with no sinks.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            sinks: Vec::new(),
            enabled: true,
        }
    }

    /// Registers a sink to receive events on `flush`.
    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Enables or disables the bus.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Returns true if the bus is active.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of registered sinks.
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Emit an event. No-op when disabled.
    pub fn emit(&self, event: SolverEvent) {
        if !self.enabled {
            return;
        }
        // The receiver lives in the same struct, so the send cannot fail
        // while the bus exists; drop the result regardless.
        let _ = self.sender.send(event);
    }

    /// Dispatch all pending events to the registered sinks.
    pub fn flush(&mut self) {
        while let Ok(event) = self.receiver.try_recv() {
            for sink in &mut self.sinks {
                sink.handle(&event);
            }
        }
    }

    /// Flush and then finalize every sink.
    pub fn finalize(&mut self) {
        self.flush();
        for sink in &mut self.sinks {
            sink.finalize();
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
