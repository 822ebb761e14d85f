use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{color::Rgb, palette::SchemePolicy, Result};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub captions: CaptionConfig,
    pub color: ColorConfig,
}

impl AppConfig {
    /// Reads a JSON configuration file. Missing sections and fields fall back
    /// to their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// What the caption parser does with a block whose timing line is malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedTimePolicy {
    /// Drop the offending line and keep waiting for a valid timing line. Text
    /// lines that follow are swallowed until one matches.
    Stall,
    /// Discard the whole block and resume at the next blank line.
    SkipBlock,
}

impl Default for MalformedTimePolicy {
    fn default() -> Self {
        if cfg!(feature = "strict-captions") {
            Self::SkipBlock
        } else {
            Self::Stall
        }
    }
}

/// Configuration specific to the caption parser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionConfig {
    pub malformed_time: MalformedTimePolicy,
}

/// Configuration for pixel sampling, clustering and palette generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Visit every `stride`-th pixel.
    pub stride: usize,
    /// Pixels with alpha below this value are skipped.
    pub alpha_threshold: u8,
    /// Inclusive brightness band, measured as `(r + g + b) / 3`.
    pub min_brightness: f32,
    pub max_brightness: f32,
    pub clusters: usize,
    pub iterations: usize,
    pub policy: SchemePolicy,
    /// Returned by clustering when no pixel survives sampling.
    pub fallback: Rgb,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            stride: 3,
            alpha_threshold: 128,
            min_brightness: 10.0,
            max_brightness: 250.0,
            clusters: 5,
            iterations: 10,
            policy: SchemePolicy::LightnessBlend,
            fallback: Rgb::new(255, 200, 200),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = AppConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.color.clusters, 5);
        assert_eq!(config.color.iterations, 10);
    }

    #[test]
    fn partial_sections_are_merged_with_defaults() {
        let config = AppConfig::from_json_str(
            r#"{ "captions": { "malformed_time": "skip_block" },
                 "color": { "clusters": 3, "policy": "hue_rotation" } }"#,
        )
        .unwrap();

        assert_eq!(config.captions.malformed_time, MalformedTimePolicy::SkipBlock);
        assert_eq!(config.color.clusters, 3);
        assert_eq!(config.color.policy, SchemePolicy::HueRotation);
        assert_eq!(config.color.stride, 3);
        assert_eq!(config.color.fallback, Rgb::new(255, 200, 200));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = AppConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, crate::LyricCanvasError::Json(_)));
    }
}
