//! Filesystem helpers shared by the stores.
//!
//! - data directory resolution (`STEPWISE_DATA_DIR`, then `~/.stepwise`)
//! - atomic file replacement via a sibling temp file and `rename`

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

/// Suffix appended to a target file name while it is being written.
pub const TEMP_SUFFIX: &str = ".tmp";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `STEPWISE_DATA_DIR` environment variable
/// 2. `~/.stepwise`
/// 3. `.stepwise` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("STEPWISE_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".stepwise");
    }

    PathBuf::from(".stepwise")
}

/// Sibling temp path for `path`: `{file_name}.tmp` in the same directory.
///
/// Same directory means the final `rename` never crosses filesystems.
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(TEMP_SUFFIX);
    path.with_file_name(name)
}

/// Replace `path` with `bytes` so readers see either the old or the new
/// content, never a partial write.
///
/// The bytes are written and synced to a temp file, which is then renamed
/// over the target and the parent directory is synced so the rename survives
/// a crash. The temp file is removed if any step before the rename fails.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp = temp_path(path);

    if let Err(err) = write_and_rename(&tmp, path, bytes).await {
        match tokio::fs::remove_file(&tmp).await {
            Ok(()) => {}
            Err(cleanup) if cleanup.kind() == std::io::ErrorKind::NotFound => {}
            Err(cleanup) => {
                tracing::debug!(path = %tmp.display(), error = %cleanup, "failed to remove temp file");
            }
        }
        return Err(err);
    }

    sync_parent_dir(path).await
}

async fn write_and_rename(tmp: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(tmp).await?;
    file.write_all(bytes).await?;
    // tokio buffers writes; flush surfaces their errors before the sync.
    file.flush().await?;
    file.sync_all().await?;
    drop(file);

    tokio::fs::rename(tmp, path).await
}

#[cfg(unix)]
async fn sync_parent_dir(path: &Path) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    tokio::fs::File::open(parent).await?.sync_all().await
}

#[cfg(not(unix))]
async fn sync_parent_dir(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
