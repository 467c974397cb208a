//! Speech pipeline: text chapters to narrated audio.

use std::path::Path;

use tokio::fs;
use tracing::{debug, info, warn};

use ncast_media::fs_utils::{move_file, remove_dir_best_effort};
use ncast_models::{sanitize_filename, DataLayout, AUDIO_EXT, SUBTITLE_EXT, TEXT_EXT};
use ncast_tts::{full_span_srt, render_srt, SpeechRequest, Synthesizer, TtsError};

use crate::discovery::{completed_stems, list_collections, stems_with_ext};
use crate::error::{PipelineError, PipelineResult};
use crate::retry::RetrySettings;

/// Name of the scratch directory inside each collection's output directory.
const TEMP_DIR_NAME: &str = "tmp";

/// Options for a speech conversion run.
#[derive(Debug, Clone)]
pub struct SpeechOptions {
    /// Voice identifier passed to the synthesis service.
    pub voice: String,
    /// Rate adjustment string, e.g. `+0%`.
    pub rate: String,
    /// Whether to produce an `.srt` next to each audio file.
    pub subtitles: bool,
    /// Total produced-audio count to reach across passes; zero means a
    /// single pass with no target.
    pub target_count: u64,
}

/// What one pass over all collections did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Chapters converted and published this pass.
    pub converted: usize,
    /// Chapters skipped because their output already existed.
    pub skipped: usize,
    /// Chapters that failed; they stay pending for the next pass.
    pub failed: usize,
}

/// Result of a full (possibly multi-pass) speech run.
#[derive(Debug, Clone, Copy)]
pub struct SpeechSummary {
    /// Total produced audio files on disk after the run.
    pub produced: u64,
    /// Passes performed.
    pub passes: u32,
    /// Chapters converted across all passes of this run.
    pub converted: usize,
}

/// The text-to-audio batch pipeline.
pub struct SpeechPipeline<'a> {
    layout: &'a DataLayout,
    synth: &'a dyn Synthesizer,
    options: SpeechOptions,
}

impl<'a> SpeechPipeline<'a> {
    /// Create a pipeline over `layout` using `synth`.
    pub fn new(layout: &'a DataLayout, synth: &'a dyn Synthesizer, options: SpeechOptions) -> Self {
        Self {
            layout,
            synth,
            options,
        }
    }

    /// Run passes until the target count is met, the pass budget runs out,
    /// or no further progress is structurally possible.
    pub async fn run(&self, retry: &RetrySettings) -> PipelineResult<SpeechSummary> {
        let mut passes = 0u32;
        let mut converted_total = 0usize;

        loop {
            passes += 1;
            if passes > 1 {
                let delay = retry.delay_before_pass(passes);
                debug!("waiting {delay:?} before pass {passes}");
                tokio::time::sleep(delay).await;
            }

            let report = self.run_pass().await?;
            converted_total += report.converted;
            let produced = self.produced_total().await?;

            let summary = SpeechSummary {
                produced,
                passes,
                converted: converted_total,
            };

            if self.options.target_count == 0 || produced >= self.options.target_count {
                return Ok(summary);
            }

            if report.failed == 0 {
                // Every input already has an output yet the target is
                // still unmet; more passes cannot close the gap.
                warn!(
                    "target {} unreachable: {} outputs exist and no chapters are pending",
                    self.options.target_count, produced
                );
                return Ok(summary);
            }

            if passes >= retry.max_passes {
                warn!(
                    "pass budget exhausted after {} passes: {} of {} produced",
                    passes, produced, self.options.target_count
                );
                return Ok(summary);
            }

            info!(
                "{} of {} produced after pass {}, retrying failed chapters",
                produced, self.options.target_count, passes
            );
        }
    }

    /// One pass over every collection: convert each chapter whose audio
    /// does not exist yet. Per-chapter failures are logged and skipped.
    pub async fn run_pass(&self) -> PipelineResult<PassReport> {
        let text_root = self.layout.text_root();
        if !text_root.is_dir() {
            return Err(PipelineError::MissingDirectory(text_root));
        }

        let mut report = PassReport::default();

        for collection in list_collections(&text_root).await? {
            let text_dir = self.layout.chapter_text_dir(collection.name());
            let audio_dir = self.layout.chapter_audio_dir(collection.name());
            let tmp_dir = audio_dir.join(TEMP_DIR_NAME);
            fs::create_dir_all(&tmp_dir).await?;

            let done = completed_stems(&audio_dir, AUDIO_EXT).await?;

            for (stem, text_path) in stems_with_ext(&text_dir, TEXT_EXT).await? {
                let safe_stem = sanitize_filename(&stem);
                if done.contains(&safe_stem) {
                    debug!("skipping converted chapter {}/{}", collection, safe_stem);
                    report.skipped += 1;
                    continue;
                }

                let tmp_audio = tmp_dir.join(format!("{safe_stem}.{AUDIO_EXT}"));
                let tmp_srt = tmp_dir.join(format!("{safe_stem}.{SUBTITLE_EXT}"));

                let outcome = self
                    .convert_and_publish(&text_path, &audio_dir, &safe_stem, &tmp_audio, &tmp_srt)
                    .await;

                match outcome {
                    Ok(()) => {
                        report.converted += 1;
                        info!("converted {}/{}.{}", collection, safe_stem, AUDIO_EXT);
                    }
                    Err(e) => {
                        warn!("conversion failed for {}/{}: {e}", collection, safe_stem);
                        let _ = fs::remove_file(&tmp_audio).await;
                        let _ = fs::remove_file(&tmp_srt).await;
                        report.failed += 1;
                    }
                }
            }

            remove_dir_best_effort(&tmp_dir).await;
        }

        Ok(report)
    }

    /// Total produced audio files across all collections.
    pub async fn produced_total(&self) -> PipelineResult<u64> {
        let audio_root = self.layout.audio_root();
        if !audio_root.is_dir() {
            return Ok(0);
        }

        let mut total = 0u64;
        for collection in list_collections(&audio_root).await? {
            let dir = self.layout.chapter_audio_dir(collection.name());
            total += completed_stems(&dir, AUDIO_EXT).await?.len() as u64;
        }
        Ok(total)
    }

    /// Synthesize one chapter and publish its outputs.
    ///
    /// Publication failures are part of the per-chapter outcome: the
    /// chapter counts as failed and the pass moves on, the same as a
    /// synthesis failure.
    async fn convert_and_publish(
        &self,
        text_path: &Path,
        audio_dir: &Path,
        safe_stem: &str,
        tmp_audio: &Path,
        tmp_srt: &Path,
    ) -> PipelineResult<()> {
        self.convert_chapter(text_path, tmp_audio, tmp_srt).await?;

        let final_audio = audio_dir.join(format!("{safe_stem}.{AUDIO_EXT}"));
        move_file(tmp_audio, &final_audio).await?;
        if self.options.subtitles && tmp_srt.exists() {
            let final_srt = audio_dir.join(format!("{safe_stem}.{SUBTITLE_EXT}"));
            move_file(tmp_srt, &final_srt).await?;
        }
        Ok(())
    }

    /// Synthesize one chapter into temp files.
    async fn convert_chapter(
        &self,
        text_path: &Path,
        tmp_audio: &Path,
        tmp_srt: &Path,
    ) -> PipelineResult<()> {
        let text = fs::read_to_string(text_path).await?;
        let request = SpeechRequest::new(text, &self.options.voice, &self.options.rate);

        self.synth.synthesize(&request, tmp_audio).await?;

        if self.options.subtitles {
            let srt = match self.synth.captions(&request).await {
                Ok(cues) => render_srt(&cues),
                Err(TtsError::CaptionsUnsupported) => full_span_srt(&request.text),
                Err(e) => return Err(e.into()),
            };
            fs::write(tmp_srt, srt).await?;
        }

        Ok(())
    }
}
