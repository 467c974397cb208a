//! Filesystem utilities: atomic publication and temp cleanup.

use std::path::Path;

use tokio::fs;
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};

/// Move a file from `src` to `dst`, creating parent directories as needed.
///
/// A plain rename is attempted first. When the rename fails with EXDEV
/// (the paths are on different filesystems) the file is copied to a
/// temporary name next to `dst` and renamed into place, so a partially
/// copied file is never observable at the destination path.
pub async fn move_file(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> MediaResult<()> {
    let src = src.as_ref();
    let dst = dst.as_ref();

    if let Some(parent) = dst.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    match fs::rename(src, dst).await {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device(&e) => {
            debug!("cross-device rename, copying instead: {} -> {}", src.display(), dst.display());
            copy_then_rename(src, dst).await
        }
        Err(e) => Err(MediaError::from(e)),
    }
}

/// EXDEV is 18 on Linux and macOS.
fn is_cross_device(e: &std::io::Error) -> bool {
    e.raw_os_error() == Some(18)
}

async fn copy_then_rename(src: &Path, dst: &Path) -> MediaResult<()> {
    let staged = dst.with_extension("part");

    fs::copy(src, &staged).await?;

    if let Err(e) = fs::rename(&staged, dst).await {
        let _ = fs::remove_file(&staged).await;
        return Err(MediaError::from(e));
    }

    // Source removal is best-effort; the publish already happened.
    if let Err(e) = fs::remove_file(src).await {
        warn!("failed to remove source after move: {}: {e}", src.display());
    }

    Ok(())
}

/// Remove a directory tree, tolerating absence and logging other failures.
///
/// Used for per-collection temp directories after a batch; a leftover temp
/// directory must never fail the batch.
pub async fn remove_dir_best_effort(dir: impl AsRef<Path>) {
    let dir = dir.as_ref();
    match fs::remove_dir_all(dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("failed to clean temp directory {}: {e}", dir.display()),
    }
}

/// Remove a directory only when it is empty; absence and non-emptiness are
/// both fine.
pub async fn remove_dir_if_empty(dir: impl AsRef<Path>) {
    let dir = dir.as_ref();
    match fs::remove_dir(dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        // DirectoryNotEmpty is unstable to match on; remove_dir only
        // succeeds on empty directories, so any other error is ignorable.
        Err(e) => debug!("leaving temp directory {} in place: {e}", dir.display()),
    }
}
