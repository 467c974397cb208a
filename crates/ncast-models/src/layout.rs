//! On-disk layout of NovelCast data directories.
//!
//! All paths are derived from a single data root:
//!
//! ```text
//! <root>/out_text/<collection>/<chapter>.txt
//! <root>/out_mp3/<collection>/<chapter>.mp3 (+ optional .srt)
//! <root>/out_mp3_merge/<collection>/<track>.mp3
//! <root>/out_mp4/<collection>/<track>.mp4
//! <root>/images/<collection>.{jpg,jpeg,png}
//! ```

use std::path::{Path, PathBuf};

/// Cover image extensions, probed in order.
pub const COVER_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Chapter text file extension.
pub const TEXT_EXT: &str = "txt";
/// Produced audio file extension.
pub const AUDIO_EXT: &str = "mp3";
/// Produced subtitle file extension.
pub const SUBTITLE_EXT: &str = "srt";
/// Produced video file extension.
pub const VIDEO_EXT: &str = "mp4";

/// Environment variable overriding the default data root.
pub const DATA_ROOT_ENV: &str = "NCAST_DATA_ROOT";

/// Resolver for every path the pipelines read or write.
#[derive(Debug, Clone)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    /// Create a layout rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Create a layout from `NCAST_DATA_ROOT`, defaulting to `./data`.
    pub fn from_env() -> Self {
        let root = std::env::var(DATA_ROOT_ENV).unwrap_or_else(|_| "data".to_string());
        Self::new(root)
    }

    /// The data root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Root of chapter text inputs, one subdirectory per collection.
    pub fn text_root(&self) -> PathBuf {
        self.root.join("out_text")
    }

    /// Root of produced chapter audio, one subdirectory per collection.
    pub fn audio_root(&self) -> PathBuf {
        self.root.join("out_mp3")
    }

    /// Root of pre-merged per-collection audio tracks.
    pub fn merged_root(&self) -> PathBuf {
        self.root.join("out_mp3_merge")
    }

    /// Root of produced videos, one subdirectory per collection.
    pub fn video_root(&self) -> PathBuf {
        self.root.join("out_mp4")
    }

    /// Directory holding cover images, one per collection.
    pub fn images_root(&self) -> PathBuf {
        self.root.join("images")
    }

    /// Text input directory of one collection.
    pub fn chapter_text_dir(&self, collection: &str) -> PathBuf {
        self.text_root().join(collection)
    }

    /// Audio output directory of one collection.
    pub fn chapter_audio_dir(&self, collection: &str) -> PathBuf {
        self.audio_root().join(collection)
    }

    /// Merged audio directory of one collection.
    pub fn merged_audio_dir(&self, collection: &str) -> PathBuf {
        self.merged_root().join(collection)
    }

    /// Video output directory of one collection.
    pub fn video_dir(&self, collection: &str) -> PathBuf {
        self.video_root().join(collection)
    }

    /// Locate the cover image for a collection by probing each supported
    /// extension against the collection name, returning the first match.
    pub fn find_cover(&self, collection: &str) -> Option<PathBuf> {
        let images = self.images_root();
        COVER_EXTENSIONS
            .iter()
            .map(|ext| images.join(format!("{collection}.{ext}")))
            .find(|candidate| candidate.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn paths_follow_the_fixed_layout() {
        let layout = DataLayout::new("/srv/ncast/data");

        assert_eq!(
            layout.chapter_text_dir("bleak-house"),
            PathBuf::from("/srv/ncast/data/out_text/bleak-house")
        );
        assert_eq!(
            layout.chapter_audio_dir("bleak-house"),
            PathBuf::from("/srv/ncast/data/out_mp3/bleak-house")
        );
        assert_eq!(
            layout.merged_audio_dir("bleak-house"),
            PathBuf::from("/srv/ncast/data/out_mp3_merge/bleak-house")
        );
        assert_eq!(
            layout.video_dir("bleak-house"),
            PathBuf::from("/srv/ncast/data/out_mp4/bleak-house")
        );
    }

    #[test]
    fn find_cover_probes_extensions_in_order() {
        let dir = TempDir::new().unwrap();
        let layout = DataLayout::new(dir.path());
        let images = layout.images_root();
        std::fs::create_dir_all(&images).unwrap();

        std::fs::write(images.join("novel.png"), b"png").unwrap();
        std::fs::write(images.join("novel.jpg"), b"jpg").unwrap();

        // jpg wins over png because it is probed first
        let cover = layout.find_cover("novel").unwrap();
        assert_eq!(cover, images.join("novel.jpg"));
    }

    #[test]
    fn find_cover_returns_none_when_absent() {
        let dir = TempDir::new().unwrap();
        let layout = DataLayout::new(dir.path());
        std::fs::create_dir_all(layout.images_root()).unwrap();

        assert!(layout.find_cover("missing").is_none());
    }
}
