//! Speech synthesis collaborator for NovelCast.
//!
//! This crate provides:
//! - The [`Synthesizer`] trait the speech pipeline is written against
//! - An HTTP client implementation ([`HttpSynthesizer`]) with bounded
//!   retries for retryable failures
//! - SRT subtitle rendering, including the full-span fallback cue used
//!   when the service cannot stream captions
//! - The fixed voice catalog

pub mod client;
pub mod error;
pub mod subtitle;
pub mod synthesizer;
pub mod voice;

pub use client::{HttpSynthesizer, SpeechClientConfig};
pub use error::{TtsError, TtsResult};
pub use subtitle::{full_span_srt, render_srt, SubtitleCue};
pub use synthesizer::{SpeechRequest, Synthesizer};
pub use voice::{is_known_voice, CHINESE_VOICES};
