//! Cryptographic operations for stepwise.
//!
//! - `hash`: SHA-256 content hashing for artifact addressing

pub mod hash;
