//! Work discovery and completion checks.
//!
//! Completion is keyed purely on output file existence: a stem with a
//! produced file is done, everything else is pending. No manifest, no
//! checksums. Re-running discovery over completed work yields nothing.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use ncast_models::Collection;

/// Set of stems already produced in `dir`, by suffix-stripping filenames
/// with extension `ext`. A missing directory yields the empty set.
pub async fn completed_stems(dir: &Path, ext: &str) -> io::Result<HashSet<String>> {
    let mut read_dir = match tokio::fs::read_dir(dir).await {
        Ok(rd) => rd,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HashSet::new()),
        Err(e) => return Err(e),
    };

    let mut stems = HashSet::new();
    while let Some(entry) = read_dir.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|e| e == ext) {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                stems.insert(stem.to_string());
            }
        }
    }
    Ok(stems)
}

/// Candidate inputs in `dir` with extension `ext`, as `(stem, path)` pairs
/// in directory enumeration order.
pub async fn stems_with_ext(dir: &Path, ext: &str) -> io::Result<Vec<(String, PathBuf)>> {
    let mut read_dir = tokio::fs::read_dir(dir).await?;

    let mut items = Vec::new();
    while let Some(entry) = read_dir.next_entry().await? {
        let path = entry.path();
        if !path.is_file() || !path.extension().is_some_and(|e| e == ext) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            items.push((stem.to_string(), path));
        }
    }
    Ok(items)
}

/// Collections under `root`: one per subdirectory.
pub async fn list_collections(root: &Path) -> io::Result<Vec<Collection>> {
    let mut read_dir = tokio::fs::read_dir(root).await?;

    let mut collections = Vec::new();
    while let Some(entry) = read_dir.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            if let Some(name) = entry.file_name().to_str() {
                collections.push(Collection::new(name));
            }
        }
    }
    Ok(collections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn completed_stems_strips_only_the_target_extension() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("0001.mp3"), b"").unwrap();
        std::fs::write(dir.path().join("0002.mp3"), b"").unwrap();
        std::fs::write(dir.path().join("0003.srt"), b"").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"").unwrap();

        let stems = completed_stems(dir.path(), "mp3").await.unwrap();
        assert_eq!(stems.len(), 2);
        assert!(stems.contains("0001"));
        assert!(stems.contains("0002"));
    }

    #[tokio::test]
    async fn missing_output_directory_means_nothing_is_done() {
        let dir = TempDir::new().unwrap();
        let stems = completed_stems(&dir.path().join("absent"), "mp3").await.unwrap();
        assert!(stems.is_empty());
    }

    #[tokio::test]
    async fn stems_with_ext_skips_directories_and_other_extensions() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("0001.txt"), b"one").unwrap();
        std::fs::write(dir.path().join("cover.jpg"), b"img").unwrap();
        std::fs::create_dir(dir.path().join("tmp")).unwrap();

        let items = stems_with_ext(dir.path(), "txt").await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].0, "0001");
    }

    #[tokio::test]
    async fn list_collections_returns_subdirectories_only() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("novel-a")).unwrap();
        std::fs::create_dir(dir.path().join("novel-b")).unwrap();
        std::fs::write(dir.path().join("stray.mp3"), b"").unwrap();

        let mut names: Vec<_> = list_collections(dir.path())
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["novel-a", "novel-b"]);
    }
}
