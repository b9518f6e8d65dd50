//! Shared domain types for stepwise.
//!
//! This crate contains the durable data model of a workflow run (`RunRecord`,
//! `AttemptLog`), the per-step `ResiliencePolicy`, engine configuration, and
//! the storage error types shared by the core and infra crates.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod policy;
pub mod run;
