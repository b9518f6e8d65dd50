//! Infrastructure layer for stepwise.
//!
//! Contains implementations of the storage ports defined in `stepwise-core`:
//! the filesystem checkpoint store, the content-addressed artifact store,
//! SHA-256 hashing, and data-directory/config resolution.

pub mod config;
pub mod crypto;
pub mod filesystem;
pub mod storage;
