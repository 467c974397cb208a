//! NovelCast command-line interface.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ncast_media::check_ffmpeg;
use ncast_models::DataLayout;
use ncast_pipeline::{RetrySettings, SpeechOptions, SpeechPipeline, VideoPipeline};
use ncast_tts::{is_known_voice, HttpSynthesizer, CHINESE_VOICES};

#[derive(Parser)]
#[command(name = "novelcast", version, about = "Batch-convert novel chapters to narrated audio and cover videos")]
struct Cli {
    /// Data root containing out_text, out_mp3, out_mp3_merge, out_mp4 and
    /// images (defaults to NCAST_DATA_ROOT, then ./data)
    #[arg(long, global = true)]
    data_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert pending text chapters into narrated audio
    Speech {
        /// Voice identifier, e.g. zh-CN-YunxiNeural
        voice: String,

        /// Rate adjustment, e.g. +0% or -10%
        rate: String,

        /// Also produce an .srt subtitle file per chapter
        #[arg(long)]
        subtitles: bool,

        /// Keep running passes until this many audio files exist
        /// (0 = single pass)
        #[arg(long, default_value_t = 0)]
        target_count: u64,

        /// Pass budget when a target count is set
        #[arg(long, default_value_t = 5)]
        max_passes: u32,

        /// Seconds between retry passes (doubles each pass)
        #[arg(long, default_value_t = 2)]
        retry_delay: u64,
    },

    /// Compose merged audio tracks with cover images into videos
    Video {
        /// Collection to process; all collections when omitted
        collection: Option<String>,
    },

    /// List supported voice identifiers
    Voices,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let layout = match cli.data_root {
        Some(root) => DataLayout::new(root),
        None => DataLayout::from_env(),
    };

    match cli.command {
        Commands::Speech {
            voice,
            rate,
            subtitles,
            target_count,
            max_passes,
            retry_delay,
        } => {
            if !is_known_voice(&voice) {
                warn!("voice '{voice}' is not in the known catalog; passing it through anyway");
            }

            let synth = HttpSynthesizer::from_env().context("creating speech client")?;
            let options = SpeechOptions {
                voice,
                rate,
                subtitles,
                target_count,
            };
            let retry = RetrySettings::default()
                .with_max_passes(max_passes)
                .with_base_delay(Duration::from_secs(retry_delay));

            let pipeline = SpeechPipeline::new(&layout, &synth, options);
            let summary = pipeline.run(&retry).await?;

            info!(
                "speech run complete: {} chapters converted in {} pass(es), {} audio files on disk",
                summary.converted, summary.passes, summary.produced
            );

            if target_count > 0 && summary.produced < target_count {
                bail!(
                    "target not met: {} of {} audio files produced",
                    summary.produced,
                    target_count
                );
            }
            Ok(())
        }

        Commands::Video { collection } => {
            check_ffmpeg().context("video composition requires FFmpeg")?;

            let pipeline = VideoPipeline::new(&layout);
            let outcome = match &collection {
                Some(name) => pipeline.process_collection(name).await,
                None => pipeline.process_all().await,
            };

            match outcome.error {
                None => {
                    info!("video run complete: {} track(s) accounted for", outcome.processed);
                    Ok(())
                }
                Some(e) => {
                    bail!("stopped after {} track(s): {e}", outcome.processed)
                }
            }
        }

        Commands::Voices => {
            for voice in CHINESE_VOICES {
                println!("{voice}");
            }
            Ok(())
        }
    }
}
