//! Orchestration engine and port definitions for stepwise.
//!
//! This crate defines the "ports" (storage and hashing traits) that the
//! infrastructure layer implements, the step contract business logic plugs
//! into, and the engine that drives a step list against a run record. It
//! depends only on `stepwise-types` -- never on `stepwise-infra` or any
//! filesystem code.

pub mod engine;
pub mod hash;
pub mod step;
pub mod store;
