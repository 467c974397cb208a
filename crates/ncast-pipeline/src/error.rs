//! Pipeline error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors that can occur while running a batch.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("cover image not found for collection '{0}'")]
    MissingCover(String),

    #[error("directory not found: {0}")]
    MissingDirectory(PathBuf),

    #[error("speech synthesis failed: {0}")]
    Tts(#[from] ncast_tts::TtsError),

    #[error("video composition failed: {0}")]
    Media(#[from] ncast_media::MediaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
