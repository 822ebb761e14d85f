use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use lyric_canvas_core::{
    AppConfig, CaptionParser, CaptionTrack, ExtractOutcome, FrameComposer, LyricCanvasError,
    Palette, PaletteExtractor, PixelBuffer, SchemePolicy,
};
use tracing_subscriber::EnvFilter;

/// Upper bound on snapshots emitted by a single `frames` run.
const MAX_FRAMES: u64 = 1_000_000;

#[tokio::main]
async fn main() -> lyric_canvas_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AppConfig::from_json_file(path)?,
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Captions { input, at } => run_captions(&config, &input, at),
        Commands::Palette { image, policy } => run_palette(config, image, policy).await,
        Commands::Frames {
            input,
            fps,
            cover,
            duration,
            output,
        } => run_frames(config, &input, fps, cover, duration, output.as_deref()).await,
    }
}

fn run_captions(
    config: &AppConfig,
    input: &Path,
    at: Option<f64>,
) -> lyric_canvas_core::Result<()> {
    let track = load_track(config, input)?;
    tracing::info!(?input, captions = track.len(), "parsed caption file");

    match at {
        Some(time) => {
            let report = serde_json::json!({
                "time": time,
                "current": track.current_line(time),
                "next": track.next_line(time),
                "current_index": track.current_index(time),
                "last_shown_index": track.last_shown_index(time),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        None => println!("{}", serde_json::to_string_pretty(track.lines())?),
    }
    Ok(())
}

async fn run_palette(
    mut config: AppConfig,
    image: PathBuf,
    policy: Option<PolicyArg>,
) -> lyric_canvas_core::Result<()> {
    if let Some(policy) = policy {
        config.color.policy = policy.into();
    }

    let palette = extract_or_default(&config, image).await;
    println!("{}", serde_json::to_string_pretty(&palette)?);
    println!("{}", palette.css_gradient(lyric_canvas_core::palette::DEFAULT_GRADIENT_ANGLE));
    Ok(())
}

async fn run_frames(
    config: AppConfig,
    input: &Path,
    fps: f64,
    cover: Option<PathBuf>,
    duration: Option<f64>,
    output: Option<&Path>,
) -> lyric_canvas_core::Result<()> {
    let track = load_track(&config, input)?;
    let end = duration
        .or_else(|| track.lines().iter().map(|line| line.end_time).reduce(f64::max))
        .unwrap_or(0.0);
    let frame_count = frame_count(end, fps)?;

    let mut composer = FrameComposer::new(track);
    if let Some(cover) = cover {
        composer.set_palette(extract_or_default(&config, cover).await);
    }

    let frames = composer.frames(frame_count, fps);
    tracing::info!(frames = frames.len(), fps, "composed frame snapshots");
    let json = serde_json::to_string_pretty(&frames)?;
    match output {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}

/// Number of frames needed to cover `[0, end]` at `fps`, both ends included.
fn frame_count(end: f64, fps: f64) -> lyric_canvas_core::Result<u64> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(LyricCanvasError::InvalidInput("fps must be a positive number"));
    }
    if !end.is_finite() || end < 0.0 {
        return Err(LyricCanvasError::InvalidInput(
            "duration must be a non-negative number",
        ));
    }

    let frames = end * fps;
    if frames >= MAX_FRAMES as f64 {
        return Err(LyricCanvasError::InvalidInput("too many frames requested"));
    }
    Ok((frames.ceil() as u64).saturating_add(1))
}

fn load_track(config: &AppConfig, input: &Path) -> lyric_canvas_core::Result<CaptionTrack> {
    let content = std::fs::read_to_string(input)?;
    Ok(CaptionTrack::parse(&content, &CaptionParser::new(config.captions)))
}

/// Extracts a palette from the cover, falling back to the default scheme when
/// the image cannot be decoded.
async fn extract_or_default(config: &AppConfig, image: PathBuf) -> Palette {
    let extractor = PaletteExtractor::new(config.color.clone());
    match extractor.extract_palette(decode_image(image)).await {
        Ok(ExtractOutcome::Applied(palette)) => palette,
        Ok(ExtractOutcome::Superseded) => extractor
            .current_palette()
            .unwrap_or_else(|_| Palette::default_scheme()),
        Err(err) => {
            tracing::warn!(error = %err, "falling back to the default palette");
            Palette::default_scheme()
        }
    }
}

async fn decode_image(path: PathBuf) -> lyric_canvas_core::Result<PixelBuffer> {
    let decoded = tokio::task::spawn_blocking(move || image::open(&path))
        .await
        .map_err(LyricCanvasError::decode)?
        .map_err(LyricCanvasError::decode)?
        .to_rgba8();
    let (width, height) = decoded.dimensions();
    PixelBuffer::from_rgba(width, height, decoded.into_raw())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Lyric timing and cover palette tools", long_about = None)]
struct Cli {
    /// Optional JSON configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse an SRT file and print its captions, or query them at one instant.
    Captions {
        /// Path to the SRT file.
        input: PathBuf,
        /// Playback time in seconds to query.
        #[arg(long)]
        at: Option<f64>,
    },
    /// Extract a background palette from a cover image.
    Palette {
        image: PathBuf,
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,
    },
    /// Emit per-frame caption and background snapshots as JSON.
    Frames {
        /// Path to the SRT file.
        input: PathBuf,
        #[arg(long, default_value_t = 30.0)]
        fps: f64,
        /// Cover image used for the background gradient.
        #[arg(long)]
        cover: Option<PathBuf>,
        /// Length in seconds. Defaults to the end of the last caption.
        #[arg(long)]
        duration: Option<f64>,
        /// Write the snapshots here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PolicyArg {
    LightnessBlend,
    HueRotation,
}

impl From<PolicyArg> for SchemePolicy {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::LightnessBlend => SchemePolicy::LightnessBlend,
            PolicyArg::HueRotation => SchemePolicy::HueRotation,
        }
    }
}
