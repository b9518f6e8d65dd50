//! Orchestration engine: sequential step execution with durable checkpointing.
//!
//! - `resume` -- resume-point detection and cross-process attempt numbering
//! - `backoff` -- exponential backoff bounded by the resilience policy
//! - `sink` -- best-effort observability notifications
//! - `executor` -- the `OrchestrationEngine` run loop

pub mod backoff;
pub mod executor;
pub mod resume;
pub mod sink;

pub use executor::{EngineError, OrchestrationEngine};
pub use resume::{ResumePoint, next_base_attempt, resume_point};
pub use sink::{NoopSink, ObservabilitySink, SinkError};
