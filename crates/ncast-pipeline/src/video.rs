//! Video pipeline: merged audio tracks plus cover images to videos.
//!
//! Unlike the speech pipeline, the first encoder failure aborts the
//! remaining batch; the error and the count processed so far surface
//! together in a [`BatchOutcome`].

use tokio::fs;
use tracing::{debug, info};

use ncast_media::fs_utils::{move_file, remove_dir_if_empty};
use ncast_media::{compose_still_video, FfmpegRunner};
use ncast_models::{sanitize_filename, DataLayout, VideoSettings, AUDIO_EXT, VIDEO_EXT};

use crate::discovery::{list_collections, stems_with_ext};
use crate::error::PipelineError;

/// Name of the scratch directory inside each collection's output directory.
const TEMP_DIR_NAME: &str = "tmp";

/// Items processed plus the first error, if any.
///
/// The count includes tracks skipped because their video already existed,
/// matching how operators read progress: "n of m accounted for".
#[derive(Debug)]
pub struct BatchOutcome {
    /// Tracks accounted for before the batch stopped.
    pub processed: usize,
    /// The error that stopped the batch, if it did not complete.
    pub error: Option<PipelineError>,
}

impl BatchOutcome {
    fn ok(processed: usize) -> Self {
        Self {
            processed,
            error: None,
        }
    }

    fn failed(processed: usize, error: PipelineError) -> Self {
        Self {
            processed,
            error: Some(error),
        }
    }

    /// Whether the batch completed without error.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// The audio-to-video batch pipeline.
pub struct VideoPipeline<'a> {
    layout: &'a DataLayout,
    settings: VideoSettings,
    runner: FfmpegRunner,
}

impl<'a> VideoPipeline<'a> {
    /// Create a pipeline over `layout` with default encoding settings.
    pub fn new(layout: &'a DataLayout) -> Self {
        Self::with_settings(layout, VideoSettings::default(), FfmpegRunner::new())
    }

    /// Create a pipeline with explicit settings and runner.
    pub fn with_settings(layout: &'a DataLayout, settings: VideoSettings, runner: FfmpegRunner) -> Self {
        Self {
            layout,
            settings,
            runner,
        }
    }

    /// Render every pending track of one collection.
    ///
    /// Never panics: prerequisite problems (missing cover, missing merged
    /// audio directory) come back as a zero-count outcome with an error.
    pub async fn process_collection(&self, collection: &str) -> BatchOutcome {
        let Some(cover) = self.layout.find_cover(collection) else {
            return BatchOutcome::failed(0, PipelineError::MissingCover(collection.to_string()));
        };

        let merge_dir = self.layout.merged_audio_dir(collection);
        if !merge_dir.is_dir() {
            return BatchOutcome::failed(0, PipelineError::MissingDirectory(merge_dir));
        }

        let tracks = match stems_with_ext(&merge_dir, AUDIO_EXT).await {
            Ok(tracks) => tracks,
            Err(e) => return BatchOutcome::failed(0, e.into()),
        };

        let out_dir = self.layout.video_dir(collection);
        let tmp_dir = out_dir.join(TEMP_DIR_NAME);
        let total = tracks.len();
        let mut processed = 0usize;

        for (stem, audio_path) in tracks {
            let safe_stem = sanitize_filename(&stem);
            let final_video = out_dir.join(format!("{safe_stem}.{VIDEO_EXT}"));

            if final_video.exists() {
                debug!("skipping rendered track {}/{}", collection, safe_stem);
                processed += 1;
                continue;
            }

            info!("rendering [{}/{}] {}/{}.{}", processed + 1, total, collection, safe_stem, VIDEO_EXT);

            if let Err(e) = fs::create_dir_all(&tmp_dir).await {
                return BatchOutcome::failed(processed, e.into());
            }
            let tmp_video = tmp_dir.join(format!("{safe_stem}.{VIDEO_EXT}"));

            let render = compose_still_video(&cover, &audio_path, &tmp_video, &self.settings, &self.runner).await;

            if let Err(e) = render {
                // first encoder failure aborts the remaining batch
                let _ = fs::remove_file(&tmp_video).await;
                remove_dir_if_empty(&tmp_dir).await;
                return BatchOutcome::failed(processed, e.into());
            }

            if let Err(e) = move_file(&tmp_video, &final_video).await {
                let _ = fs::remove_file(&tmp_video).await;
                remove_dir_if_empty(&tmp_dir).await;
                return BatchOutcome::failed(processed, e.into());
            }

            processed += 1;
            info!("rendered {}/{}.{}", collection, safe_stem, VIDEO_EXT);
        }

        remove_dir_if_empty(&tmp_dir).await;
        BatchOutcome::ok(processed)
    }

    /// Render pending tracks of every collection under the merged root,
    /// stopping at the first collection that errors.
    pub async fn process_all(&self) -> BatchOutcome {
        let merged_root = self.layout.merged_root();
        if !merged_root.is_dir() {
            return BatchOutcome::failed(0, PipelineError::MissingDirectory(merged_root));
        }

        let collections = match list_collections(&merged_root).await {
            Ok(collections) => collections,
            Err(e) => return BatchOutcome::failed(0, e.into()),
        };

        let mut total = 0usize;
        for collection in collections {
            info!("processing collection {collection}");
            let outcome = self.process_collection(collection.name()).await;
            total += outcome.processed;

            if let Some(error) = outcome.error {
                return BatchOutcome::failed(total, error);
            }
            info!("collection {} complete, {} tracks accounted for", collection, outcome.processed);
        }

        BatchOutcome::ok(total)
    }

}
