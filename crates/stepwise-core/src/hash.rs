//! ContentHasher trait for content-addressed artifact references.
//!
//! Defined in stepwise-core so stores can address blobs without coupling to a
//! specific hashing algorithm. The `Sha256ContentHasher` adapter lives in
//! stepwise-infra.

/// Abstraction over content hashing.
pub trait ContentHasher: Send + Sync {
    /// Compute a lowercase hex-encoded digest of `content`.
    fn compute_hash(&self, content: &[u8]) -> String;
}
