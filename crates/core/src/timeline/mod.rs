//! Point-in-time lookups over a parsed caption sequence.
//!
//! Every query is a linear scan over lines that are expected to be ordered by
//! `start_time`. Nothing is cached or mutated, so the functions can be called
//! once per rendered frame from any number of threads.

use crate::srt::{CaptionLine, CaptionParser};

/// Returned by the index queries when no line qualifies.
pub const NO_LINE: isize = -1;

/// Playback position in seconds.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PlaybackClock {
    pub time_seconds: f64,
}

impl PlaybackClock {
    pub fn at(time_seconds: f64) -> Self {
        Self { time_seconds }
    }

    /// Clock positioned at a video frame. A zero frame rate pins the clock to
    /// the start.
    pub fn from_frame(frame: u64, fps: f64) -> Self {
        if fps <= 0.0 {
            return Self::default();
        }
        Self::at(frame as f64 / fps)
    }

    pub fn reset(&mut self) {
        self.time_seconds = 0.0;
    }

    pub fn advance(&mut self, delta: f64) {
        self.time_seconds = (self.time_seconds + delta).max(0.0);
    }
}

/// First line whose `[start_time, end_time]` range contains `time`. On a
/// boundary shared by two adjacent lines the earlier one wins.
pub fn current_line(lines: &[CaptionLine], time: f64) -> Option<&CaptionLine> {
    lines.iter().find(|line| line.is_active_at(time))
}

/// First line that starts strictly after `time`.
pub fn next_line(lines: &[CaptionLine], time: f64) -> Option<&CaptionLine> {
    lines.iter().find(|line| line.start_time > time)
}

/// Position of [`current_line`] in the sequence, or [`NO_LINE`].
pub fn current_index(lines: &[CaptionLine], time: f64) -> isize {
    lines
        .iter()
        .position(|line| line.is_active_at(time))
        .map_or(NO_LINE, |position| position as isize)
}

/// Position of the line with the greatest `start_time <= time`, whether or not
/// it has ended. Holds the display position steady through silent gaps.
pub fn last_shown_index(lines: &[CaptionLine], time: f64) -> isize {
    let mut best: Option<(usize, f64)> = None;
    for (position, line) in lines.iter().enumerate() {
        if line.start_time > time {
            continue;
        }
        match best {
            Some((_, start)) if line.start_time < start => {}
            _ => best = Some((position, line.start_time)),
        }
    }
    best.map_or(NO_LINE, |(position, _)| position as isize)
}

/// Owned, immutable caption sequence with the query functions as methods.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CaptionTrack {
    lines: Vec<CaptionLine>,
}

impl CaptionTrack {
    /// Wraps lines in the order given. They are not re-sorted.
    pub fn new(lines: Vec<CaptionLine>) -> Self {
        Self { lines }
    }

    pub fn parse(content: &str, parser: &CaptionParser) -> Self {
        Self::new(parser.parse(content))
    }

    pub fn lines(&self) -> &[CaptionLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn current_line(&self, time: f64) -> Option<&CaptionLine> {
        current_line(&self.lines, time)
    }

    pub fn next_line(&self, time: f64) -> Option<&CaptionLine> {
        next_line(&self.lines, time)
    }

    pub fn current_index(&self, time: f64) -> isize {
        current_index(&self.lines, time)
    }

    pub fn last_shown_index(&self, time: f64) -> isize {
        last_shown_index(&self.lines, time)
    }
}

impl From<Vec<CaptionLine>> for CaptionTrack {
    fn from(lines: Vec<CaptionLine>) -> Self {
        Self::new(lines)
    }
}
