//! Core library for the Lyric Canvas renderer.
//!
//! Two independent engines live here. The caption side parses SRT-style timed
//! lyrics and answers "what is showing at time t" queries. The color side
//! samples a cover image, clusters its pixels with k-means and derives a
//! three-color gradient from the most vivid cluster. Drawing, animation and
//! audio playback belong to the caller.

pub mod assets;
pub mod cluster;
pub mod color;
pub mod config;
pub mod error;
pub mod extract;
pub mod palette;
pub mod render;
pub mod sampler;
pub mod srt;
pub mod timeline;

pub use assets::{ImageKey, SchemeCache};
pub use cluster::{dominant_color, k_means, Centroid};
pub use color::{Hsl, Rgb};
pub use config::{AppConfig, CaptionConfig, ColorConfig, MalformedTimePolicy};
pub use error::{LyricCanvasError, Result};
pub use extract::{palette_from_pixels, ExtractOutcome, PaletteExtractor, RequestToken};
pub use palette::{generate_scheme, Palette, PaletteColor, SchemePolicy};
pub use render::{FrameComposer, FrameSnapshot};
pub use sampler::{sample, ColorSample, PixelBuffer, SamplerSettings};
pub use srt::{parse_captions, CaptionLine, CaptionParser};
pub use timeline::{
    current_index, current_line, last_shown_index, next_line, CaptionTrack, PlaybackClock, NO_LINE,
};
