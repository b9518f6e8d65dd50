//! Observability for stepwise.
//!
//! - `tracing_setup`: global subscriber with optional OpenTelemetry export
//! - `sink`: `TracingSink`, an `ObservabilitySink` that emits tracing events

pub mod sink;
pub mod tracing_setup;

pub use sink::{TracingSink, sink_for};
