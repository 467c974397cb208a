//! SRT subtitle rendering.

use serde::{Deserialize, Serialize};

/// End timestamp of the fallback cue: effectively "until the audio ends".
const FULL_SPAN_END: &str = "99:59:59,999";

/// A single timestamped caption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleCue {
    /// Cue start, milliseconds from the beginning of the audio.
    pub start_ms: u64,
    /// Cue end, milliseconds from the beginning of the audio.
    pub end_ms: u64,
    /// Caption text.
    pub text: String,
}

/// Render cues as an SRT document, numbering from 1.
pub fn render_srt(cues: &[SubtitleCue]) -> String {
    let mut out = String::new();
    for (idx, cue) in cues.iter().enumerate() {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            idx + 1,
            format_timestamp(cue.start_ms),
            format_timestamp(cue.end_ms),
            cue.text
        ));
    }
    out
}

/// Render a single cue covering the whole audio span.
///
/// Used when the speech service cannot stream captions; the full chapter
/// text becomes one cue that players display for the entire duration.
pub fn full_span_srt(text: &str) -> String {
    format!("1\n00:00:00,000 --> {FULL_SPAN_END}\n{text}\n")
}

/// Format milliseconds as an SRT timestamp (`HH:MM:SS,mmm`).
fn format_timestamp(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms / 60_000) % 60;
    let seconds = (ms / 1_000) % 60;
    let millis = ms % 1_000;
    format!("{hours:02}:{minutes:02}:{seconds:02},{millis:03}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_render_with_padding() {
        assert_eq!(format_timestamp(0), "00:00:00,000");
        assert_eq!(format_timestamp(61_205), "00:01:01,205");
        assert_eq!(format_timestamp(3_600_000 + 23 * 60_000 + 45_067), "01:23:45,067");
    }

    #[test]
    fn cues_are_numbered_from_one() {
        let cues = vec![
            SubtitleCue {
                start_ms: 0,
                end_ms: 1_500,
                text: "第一句".to_string(),
            },
            SubtitleCue {
                start_ms: 1_500,
                end_ms: 3_000,
                text: "第二句".to_string(),
            },
        ];

        let srt = render_srt(&cues);
        assert!(srt.starts_with("1\n00:00:00,000 --> 00:00:01,500\n第一句\n"));
        assert!(srt.contains("2\n00:00:01,500 --> 00:00:03,000\n第二句\n"));
    }

    #[test]
    fn fallback_covers_the_whole_span() {
        let srt = full_span_srt("整章文本");
        assert_eq!(srt, "1\n00:00:00,000 --> 99:59:59,999\n整章文本\n");
    }
}
