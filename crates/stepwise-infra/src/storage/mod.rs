//! Filesystem-backed storage for run records and raw artifacts.
//!
//! Layout under the configured directories:
//! ```text
//! {checkpoint_dir}/
//!   {run_id}.json
//! {artifact_dir}/
//!   {run_id}/
//!     raw_{hash16}.bin
//! ```

pub mod artifact;
pub mod checkpoint;

pub use artifact::FsArtifactStore;
pub use checkpoint::FsCheckpointStore;
