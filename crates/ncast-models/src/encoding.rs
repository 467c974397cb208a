//! Video encoding settings for still-image composition.

use serde::{Deserialize, Serialize};

/// Output width (16:9 at 480p).
pub const VIDEO_WIDTH: u32 = 854;
/// Output height.
pub const VIDEO_HEIGHT: u32 = 480;

/// Default video codec.
pub const DEFAULT_VIDEO_CODEC: &str = "h264";
/// Default audio codec.
pub const DEFAULT_AUDIO_CODEC: &str = "aac";
/// Default encoding preset.
pub const DEFAULT_PRESET: &str = "medium";
/// Default tune profile; `stillimage` keeps bitrate low for static covers.
pub const DEFAULT_TUNE: &str = "stillimage";
/// Default audio bitrate.
pub const DEFAULT_AUDIO_BITRATE: &str = "192k";
/// Default pixel format, required for broad player compatibility.
pub const DEFAULT_PIXEL_FORMAT: &str = "yuv420p";

/// Encoding settings for composed videos.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSettings {
    /// Video codec (e.g. "h264")
    #[serde(default = "default_codec")]
    pub codec: String,

    /// Encoding preset (e.g. "medium")
    #[serde(default = "default_preset")]
    pub preset: String,

    /// Tune profile (e.g. "stillimage")
    #[serde(default = "default_tune")]
    pub tune: String,

    /// Audio codec
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    /// Audio bitrate
    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate: String,

    /// Pixel format
    #[serde(default = "default_pixel_format")]
    pub pixel_format: String,

    /// Output width
    #[serde(default = "default_width")]
    pub width: u32,

    /// Output height
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_codec() -> String {
    DEFAULT_VIDEO_CODEC.to_string()
}
fn default_preset() -> String {
    DEFAULT_PRESET.to_string()
}
fn default_tune() -> String {
    DEFAULT_TUNE.to_string()
}
fn default_audio_codec() -> String {
    DEFAULT_AUDIO_CODEC.to_string()
}
fn default_audio_bitrate() -> String {
    DEFAULT_AUDIO_BITRATE.to_string()
}
fn default_pixel_format() -> String {
    DEFAULT_PIXEL_FORMAT.to_string()
}
fn default_width() -> u32 {
    VIDEO_WIDTH
}
fn default_height() -> u32 {
    VIDEO_HEIGHT
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            codec: default_codec(),
            preset: default_preset(),
            tune: default_tune(),
            audio_codec: default_audio_codec(),
            audio_bitrate: default_audio_bitrate(),
            pixel_format: default_pixel_format(),
            width: VIDEO_WIDTH,
            height: VIDEO_HEIGHT,
        }
    }
}

impl VideoSettings {
    /// Resolution string in FFmpeg `-s` format.
    pub fn resolution(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_resolution_is_480p() {
        assert_eq!(VideoSettings::default().resolution(), "854x480");
    }

    #[test]
    fn defaults_survive_empty_json() {
        let settings: VideoSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.codec, "h264");
        assert_eq!(settings.tune, "stillimage");
        assert_eq!(settings.audio_bitrate, "192k");
    }
}
