//! Parser for SRT-style timed lyrics.
//!
//! Blocks are separated by blank lines and consist of an index line, a timing
//! line (`HH:MM:SS,mmm --> HH:MM:SS,mmm`) and one or more text lines. The
//! parser never fails: malformed blocks are dropped and the rest of the
//! document still comes through.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::{CaptionConfig, MalformedTimePolicy};

/// One timed caption. Times are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionLine {
    /// Numbering carried over from the source. Not guaranteed to be unique or
    /// contiguous, and `NaN` when the index line was not a number.
    pub index: f64,
    pub start_time: f64,
    pub end_time: f64,
    pub text: String,
}

impl CaptionLine {
    pub fn new(index: f64, start_time: f64, end_time: f64, text: impl Into<String>) -> Self {
        Self {
            index,
            start_time,
            end_time,
            text: text.into(),
        }
    }

    /// Returns `true` when `time` falls inside `[start_time, end_time]`.
    pub fn is_active_at(&self, time: f64) -> bool {
        time >= self.start_time && time <= self.end_time
    }
}

/// Parses timed text using the default [`CaptionConfig`].
pub fn parse_captions(content: &str) -> Vec<CaptionLine> {
    CaptionParser::new(CaptionConfig::default()).parse(content)
}

/// Parses a single `HH:MM:SS,mmm` timestamp into seconds.
pub fn parse_timestamp(value: &str) -> Option<f64> {
    let (clock, millis) = value.trim().split_once(',')?;
    let mut parts = clock.split(':');
    let hours: f64 = parts.next()?.parse().ok()?;
    let minutes: f64 = parts.next()?.parse().ok()?;
    let seconds: f64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    let millis: f64 = millis.parse().ok()?;
    Some(hours * 3600.0 + minutes * 60.0 + seconds + millis / 1000.0)
}

/// Extracts `(start, end)` from a timing line, if it contains one.
pub fn parse_time_range(line: &str) -> Option<(f64, f64)> {
    let caps = time_range_pattern().captures(line)?;
    let start = parse_timestamp(caps.get(1)?.as_str())?;
    let end = parse_timestamp(caps.get(2)?.as_str())?;
    Some((start, end))
}

fn time_range_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\d{2}:\d{2}:\d{2},\d{3})\s*-->\s*(\d{2}:\d{2}:\d{2},\d{3})")
            .expect("timing pattern is valid")
    })
}

/// Where the parser is inside the current block. Each state only carries the
/// fields that are known at that point.
#[derive(Debug, Clone, PartialEq)]
enum ParseState {
    ExpectIndex,
    ExpectTime {
        index: f64,
    },
    ExpectText {
        index: f64,
        start_time: f64,
        end_time: f64,
        text: String,
    },
    /// Waiting for the blank line that ends a rejected block.
    SkipBlock,
}

impl ParseState {
    /// Closes the current block, returning a caption if it collected text.
    fn finish(self) -> Option<CaptionLine> {
        match self {
            ParseState::ExpectText {
                index,
                start_time,
                end_time,
                text,
            } if !text.is_empty() => Some(CaptionLine {
                index,
                start_time,
                end_time,
                text: text.trim().to_string(),
            }),
            _ => None,
        }
    }
}

/// Line-oriented state machine that turns timed text into [`CaptionLine`]s.
#[derive(Debug, Clone, Default)]
pub struct CaptionParser {
    config: CaptionConfig,
}

impl CaptionParser {
    pub fn new(config: CaptionConfig) -> Self {
        Self { config }
    }

    pub fn parse(&self, content: &str) -> Vec<CaptionLine> {
        let mut captions = Vec::new();
        let mut state = ParseState::ExpectIndex;
        let mut discarded = 0usize;

        for line in trim_text(content).lines() {
            let line = trim_text(line);

            if line.is_empty() {
                let finished = std::mem::replace(&mut state, ParseState::ExpectIndex);
                if let Some(caption) = finished.finish() {
                    captions.push(caption);
                }
                continue;
            }

            state = match state {
                ParseState::ExpectIndex => ParseState::ExpectTime {
                    index: parse_index(line),
                },
                ParseState::ExpectTime { index } => match self.time_range(line) {
                    Some((start_time, end_time)) => ParseState::ExpectText {
                        index,
                        start_time,
                        end_time,
                        text: String::new(),
                    },
                    None => {
                        discarded += 1;
                        match self.config.malformed_time {
                            MalformedTimePolicy::Stall => ParseState::ExpectTime { index },
                            MalformedTimePolicy::SkipBlock => ParseState::SkipBlock,
                        }
                    }
                },
                ParseState::ExpectText {
                    index,
                    start_time,
                    end_time,
                    mut text,
                } => {
                    if !text.is_empty() {
                        text.push('\n');
                    }
                    text.push_str(line);
                    ParseState::ExpectText {
                        index,
                        start_time,
                        end_time,
                        text,
                    }
                }
                ParseState::SkipBlock => ParseState::SkipBlock,
            };
        }

        if let Some(caption) = state.finish() {
            captions.push(caption);
        }

        tracing::debug!(
            captions = captions.len(),
            discarded_lines = discarded,
            "parsed timed captions"
        );
        captions
    }

    /// Timing line accepted under the configured policy. `Stall` keeps
    /// inverted ranges (start after end) as written; `SkipBlock` treats them
    /// as malformed.
    fn time_range(&self, line: &str) -> Option<(f64, f64)> {
        let (start, end) = parse_time_range(line)?;
        match self.config.malformed_time {
            MalformedTimePolicy::SkipBlock if start > end => None,
            _ => Some((start, end)),
        }
    }
}

/// Trims whitespace and byte order marks, which editors often leave at the
/// start of SRT files.
fn trim_text(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

/// Mirrors lenient integer parsing: leading digits (with an optional sign) are
/// used and anything else yields `NaN`.
fn parse_index(line: &str) -> f64 {
    let bytes = line.as_bytes();
    let sign_len = usize::from(matches!(bytes.first(), Some(b'+') | Some(b'-')));
    let digits = bytes[sign_len..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return f64::NAN;
    }
    line[..sign_len + digits].parse().unwrap_or(f64::NAN)
}
