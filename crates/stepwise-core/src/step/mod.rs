//! Step contract: the only extension point business logic implements.
//!
//! - `contract` -- `Step` trait and `StepError`
//! - `owner` -- `StepOwner` trait and the `Agent` owner with its environment
//! - `box_step` -- object-safe wrapper for heterogeneous step lists

pub mod box_step;
pub mod contract;
pub mod owner;

pub use box_step::BoxStep;
pub use contract::{Step, StepError};
pub use owner::{Agent, Environment, StepOwner};
