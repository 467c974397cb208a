//! FFmpeg CLI wrapper for NovelCast.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building with multiple inputs
//! - A runner that captures full stderr and supports an optional timeout
//! - Still-image + audio video composition
//! - Atomic cross-device file moves and temp-directory cleanup

pub mod command;
pub mod compose;
pub mod error;
pub mod fs_utils;

pub use command::{check_ffmpeg, FfmpegCommand, FfmpegRunner};
pub use compose::compose_still_video;
pub use error::{MediaError, MediaResult};
pub use fs_utils::{move_file, remove_dir_best_effort, remove_dir_if_empty};
