//! Storage trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (stepwise-infra) implements. The engine never depends on a specific
//! storage technology.

pub mod artifact;
pub mod checkpoint;

pub use artifact::ArtifactStore;
pub use checkpoint::CheckpointStore;
