use serde::{Deserialize, Serialize};

use crate::{
    palette::{Palette, DEFAULT_GRADIENT_ANGLE},
    timeline::{CaptionTrack, PlaybackClock},
};

/// Everything the renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub time: f64,
    pub current_text: Option<String>,
    pub next_text: Option<String>,
    pub current_index: isize,
    pub last_shown_index: isize,
    pub background: String,
}

/// Combines a caption track with the active palette. The renderer asks for a
/// snapshot once per frame.
#[derive(Debug)]
pub struct FrameComposer {
    track: CaptionTrack,
    palette: Palette,
    gradient_angle: u16,
}

impl FrameComposer {
    pub fn new(track: CaptionTrack) -> Self {
        Self {
            track,
            palette: Palette::default_scheme(),
            gradient_angle: DEFAULT_GRADIENT_ANGLE,
        }
    }

    pub fn with_gradient_angle(mut self, angle_degrees: u16) -> Self {
        self.gradient_angle = angle_degrees;
        self
    }

    pub fn track(&self) -> &CaptionTrack {
        &self.track
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    pub fn snapshot(&self, clock: &PlaybackClock) -> FrameSnapshot {
        let time = clock.time_seconds;
        FrameSnapshot {
            time,
            current_text: self.track.current_line(time).map(|line| line.text.clone()),
            next_text: self.track.next_line(time).map(|line| line.text.clone()),
            current_index: self.track.current_index(time),
            last_shown_index: self.track.last_shown_index(time),
            background: self.palette.css_gradient(self.gradient_angle),
        }
    }

    /// Snapshots for frames `0..frame_count` at `fps`.
    pub fn frames(&self, frame_count: u64, fps: f64) -> Vec<FrameSnapshot> {
        (0..frame_count)
            .map(|frame| self.snapshot(&PlaybackClock::from_frame(frame, fps)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{color::Rgb, palette::generate_scheme, palette::SchemePolicy, srt::CaptionLine};

    fn composer() -> FrameComposer {
        FrameComposer::new(CaptionTrack::new(vec![
            CaptionLine::new(1.0, 0.0, 1.0, "hello"),
            CaptionLine::new(2.0, 2.0, 3.0, "world"),
        ]))
    }

    #[test]
    fn snapshot_reports_gap_holding() {
        let snapshot = composer().snapshot(&PlaybackClock::at(1.5));
        assert_eq!(snapshot.current_text, None);
        assert_eq!(snapshot.next_text.as_deref(), Some("world"));
        assert_eq!(snapshot.current_index, -1);
        assert_eq!(snapshot.last_shown_index, 0);
    }

    #[test]
    fn snapshot_uses_the_active_palette() {
        let mut composer = composer().with_gradient_angle(90);
        composer.set_palette(generate_scheme(Rgb::new(0, 0, 0), SchemePolicy::LightnessBlend));

        let snapshot = composer.snapshot(&PlaybackClock::at(0.5));
        assert_eq!(snapshot.current_text.as_deref(), Some("hello"));
        assert_eq!(
            snapshot.background,
            "linear-gradient(90deg, rgb(26, 26, 26), rgb(0, 0, 0), rgb(51, 51, 51))"
        );
    }

    #[test]
    fn frames_step_through_time() {
        let frames = composer().frames(8, 2.0);
        assert_eq!(frames.len(), 8);
        assert_eq!(frames[5].time, 2.5);
        assert_eq!(frames[5].current_text.as_deref(), Some("world"));
    }
}
