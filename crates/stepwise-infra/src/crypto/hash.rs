//! SHA-256 content hashing for artifact references.
//!
//! Implements the `ContentHasher` trait from `stepwise-core` using the
//! `sha2` crate (RustCrypto ecosystem).

use sha2::{Digest, Sha256};

use stepwise_core::hash::ContentHasher;

/// SHA-256 implementation of `ContentHasher`.
///
/// Computes lowercase hex-encoded SHA-256 digests of raw bytes. The artifact
/// store names blobs after the first 16 characters of this digest.
#[derive(Debug, Clone, Copy)]
pub struct Sha256ContentHasher;

impl Sha256ContentHasher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Sha256ContentHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentHasher for Sha256ContentHasher {
    fn compute_hash(&self, content: &[u8]) -> String {
        let digest = Sha256::digest(content);
        format!("{:x}", digest)
    }
}
