//! # firn-telemetry
//!
//! Event bus for solver telemetry. The implicit solver emits structured
//! events (per-iteration residuals, convergence reports) that can be
//! consumed by pluggable sinks — in-memory buffers for tests, `tracing`
//! for log output.

pub mod bus;
pub mod events;
pub mod sinks;

pub use bus::EventBus;
pub use events::{EventKind, SolverEvent};
pub use sinks::EventSink;
