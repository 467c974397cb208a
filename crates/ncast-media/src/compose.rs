//! Still-image video composition.

use std::path::Path;

use ncast_models::VideoSettings;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Compose a static cover image and an audio track into a video.
///
/// The image is looped for the duration of the audio (`-shortest`), scaled
/// to the configured resolution. The caller chooses `output`; writing to a
/// temp path and publishing afterwards is the pipeline's job.
pub async fn compose_still_video(
    image: impl AsRef<Path>,
    audio: impl AsRef<Path>,
    output: impl AsRef<Path>,
    settings: &VideoSettings,
    runner: &FfmpegRunner,
) -> MediaResult<()> {
    let image = image.as_ref();
    let audio = audio.as_ref();

    if !image.exists() {
        return Err(MediaError::FileNotFound(image.to_path_buf()));
    }
    if !audio.exists() {
        return Err(MediaError::FileNotFound(audio.to_path_buf()));
    }

    let cmd = FfmpegCommand::new(output.as_ref())
        .input_with_args(["-loop", "1"], image)
        .input(audio)
        .video_codec(&settings.codec)
        .preset(&settings.preset)
        .tune(&settings.tune)
        .audio_codec(&settings.audio_codec)
        .audio_bitrate(&settings.audio_bitrate)
        .pixel_format(&settings.pixel_format)
        .shortest()
        .size(settings.width, settings.height);

    runner.run(&cmd).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_inputs_are_reported_before_ffmpeg_runs() {
        let dir = TempDir::new().unwrap();
        let image = dir.path().join("cover.jpg");
        let audio = dir.path().join("track.mp3");
        let output = dir.path().join("out.mp4");

        let err = compose_still_video(
            &image,
            &audio,
            &output,
            &VideoSettings::default(),
            &FfmpegRunner::new(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, MediaError::FileNotFound(p) if p == image));
    }

    #[test]
    fn compose_arguments_match_the_encoder_contract() {
        let settings = VideoSettings::default();
        let cmd = FfmpegCommand::new("out.mp4")
            .input_with_args(["-loop", "1"], "cover.jpg")
            .input("track.mp3")
            .video_codec(&settings.codec)
            .preset(&settings.preset)
            .tune(&settings.tune)
            .audio_codec(&settings.audio_codec)
            .audio_bitrate(&settings.audio_bitrate)
            .pixel_format(&settings.pixel_format)
            .shortest()
            .size(settings.width, settings.height);

        let args = cmd.build_args();
        let joined = args.join(" ");
        assert!(joined.contains("-loop 1 -i cover.jpg"));
        assert!(joined.contains("-i track.mp3"));
        assert!(joined.contains("-c:v h264"));
        assert!(joined.contains("-tune stillimage"));
        assert!(joined.contains("-c:a aac"));
        assert!(joined.contains("-b:a 192k"));
        assert!(joined.contains("-pix_fmt yuv420p"));
        assert!(joined.contains("-shortest"));
        assert!(joined.contains("-s 854x480"));
    }
}
