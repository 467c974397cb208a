//! The synthesis interface the speech pipeline is written against.

use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::TtsResult;
use crate::subtitle::SubtitleCue;

/// One synthesis request.
#[derive(Debug, Clone, Serialize)]
pub struct SpeechRequest {
    /// Chapter text to narrate.
    pub text: String,
    /// Voice identifier, e.g. `zh-CN-YunxiNeural`.
    pub voice: String,
    /// Rate adjustment string, e.g. `+0%` or `-10%`.
    pub rate: String,
}

impl SpeechRequest {
    /// Create a request.
    pub fn new(text: impl Into<String>, voice: impl Into<String>, rate: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: voice.into(),
            rate: rate.into(),
        }
    }
}

/// A speech synthesis engine.
///
/// Implementations are black boxes to the pipeline: they consume a request
/// and produce an audio file at the path the caller chose. The pipeline
/// owns temp-then-move publication; implementations just write to `output`.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesize `request` into an audio file at `output`.
    async fn synthesize(&self, request: &SpeechRequest, output: &Path) -> TtsResult<()>;

    /// Timestamped caption cues for `request`.
    ///
    /// Returns [`crate::TtsError::CaptionsUnsupported`] when the service
    /// cannot stream captions; callers then fall back to a single
    /// full-span cue via [`crate::subtitle::full_span_srt`].
    async fn captions(&self, request: &SpeechRequest) -> TtsResult<Vec<SubtitleCue>>;
}
