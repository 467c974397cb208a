//! Shared data model for the NovelCast pipelines.
//!
//! This crate provides:
//! - The on-disk layout of collection data (`DataLayout`)
//! - Collection identity
//! - Filename sanitization shared by both pipelines
//! - Video encoding settings and constants

pub mod collection;
pub mod encoding;
pub mod layout;
pub mod sanitize;

pub use collection::Collection;
pub use encoding::VideoSettings;
pub use layout::{DataLayout, AUDIO_EXT, COVER_EXTENSIONS, SUBTITLE_EXT, TEXT_EXT, VIDEO_EXT};
pub use sanitize::sanitize_filename;
