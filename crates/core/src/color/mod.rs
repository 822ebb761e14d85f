//! RGB and HSL color values plus the conversions between them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Converts to HSL with hue in degrees and saturation/lightness in percent.
    pub fn to_hsl(self) -> Hsl {
        let (hue, saturation, lightness) =
            hsl_components(self.r as f32, self.g as f32, self.b as f32);
        Hsl {
            hue,
            saturation: saturation * 100.0,
            lightness: lightness * 100.0,
        }
    }

    /// Mean of the three channels.
    pub fn brightness(self) -> f32 {
        (self.r as f32 + self.g as f32 + self.b as f32) / 3.0
    }

    /// Moves every channel toward white by `factor` (0 keeps the color, 1 is
    /// pure white).
    pub fn lighten(self, factor: f32) -> Self {
        let blend = |v: u8| {
            let v = v as f32;
            clamp_channel(v + (255.0 - v) * factor)
        };
        Self::new(blend(self.r), blend(self.g), blend(self.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// HSL color. Hue is in degrees `[0, 360)`, saturation and lightness are
/// percentages `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

impl Hsl {
    /// Builds a color, wrapping the hue into `[0, 360)` and clamping the
    /// percentages into `[0, 100]`.
    pub fn new(hue: f32, saturation: f32, lightness: f32) -> Self {
        Self {
            hue: wrap_hue(hue),
            saturation: saturation.clamp(0.0, 100.0),
            lightness: lightness.clamp(0.0, 100.0),
        }
    }

    pub fn to_rgb(self) -> Rgb {
        let s = self.saturation / 100.0;
        let l = self.lightness / 100.0;
        if s <= f32::EPSILON {
            let v = clamp_channel(l * 255.0);
            return Rgb::new(v, v, v);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let h = self.hue / 360.0;
        Rgb::new(
            clamp_channel(hue_to_channel(p, q, h + 1.0 / 3.0) * 255.0),
            clamp_channel(hue_to_channel(p, q, h) * 255.0),
            clamp_channel(hue_to_channel(p, q, h - 1.0 / 3.0) * 255.0),
        )
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            round_to_tenth(self.hue),
            round_to_tenth(self.saturation),
            round_to_tenth(self.lightness)
        )
    }
}

/// Hue (degrees), saturation and lightness (both `[0, 1]`) of a color whose
/// channels are given on the 0-255 scale. Channels may be fractional.
pub fn hsl_components(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let red = r / 255.0;
    let green = g / 255.0;
    let blue = b / 255.0;

    let max = red.max(green).max(blue);
    let min = red.min(green).min(blue);
    let diff = max - min;
    let lightness = (max + min) / 2.0;

    if diff == 0.0 {
        return (0.0, 0.0, lightness);
    }

    let saturation = if lightness > 0.5 {
        diff / (2.0 - max - min)
    } else {
        diff / (max + min)
    };

    let hue = if max == red {
        (green - blue) / diff + if green < blue { 6.0 } else { 0.0 }
    } else if max == green {
        (blue - red) / diff + 2.0
    } else {
        (red - green) / diff + 4.0
    };

    (wrap_hue(hue * 60.0), saturation, lightness)
}

/// Wraps any hue, including negative ones, into `[0, 360)`.
pub fn wrap_hue(hue: f32) -> f32 {
    let wrapped = hue.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

pub(crate) fn clamp_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn round_to_tenth(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.05
    }

    #[test]
    fn converts_primaries_to_hsl() {
        let red = Rgb::new(255, 0, 0).to_hsl();
        assert!(approx(red.hue, 0.0));
        assert!(approx(red.saturation, 100.0));
        assert!(approx(red.lightness, 50.0));

        let blue = Rgb::new(0, 0, 255).to_hsl();
        assert!(approx(blue.hue, 240.0));
    }

    #[test]
    fn grays_have_no_saturation() {
        let (hue, saturation, lightness) = hsl_components(128.0, 128.0, 128.0);
        assert_eq!(hue, 0.0);
        assert_eq!(saturation, 0.0);
        assert!((lightness - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn hsl_round_trips_through_rgb() {
        let original = Rgb::new(200, 100, 50);
        assert_eq!(original.to_hsl().to_rgb(), original);
    }

    #[test]
    fn lighten_moves_toward_white_and_stays_in_range() {
        let base = Rgb::new(200, 100, 0);
        assert_eq!(base.lighten(0.0), base);
        assert_eq!(base.lighten(1.0), Rgb::new(255, 255, 255));
        assert_eq!(base.lighten(0.2), Rgb::new(211, 131, 51));
        assert_eq!(Rgb::new(255, 255, 255).lighten(0.5), Rgb::new(255, 255, 255));
    }

    #[test]
    fn wraps_negative_hues() {
        assert!(approx(wrap_hue(-5.0), 355.0));
        assert!(approx(wrap_hue(370.0), 10.0));
        assert_eq!(Hsl::new(365.0, 120.0, -3.0), Hsl::new(5.0, 100.0, 0.0));
    }

    #[test]
    fn renders_css() {
        assert_eq!(Rgb::new(220, 180, 200).to_string(), "rgb(220, 180, 200)");
        assert_eq!(Hsl::new(12.0, 75.0, 82.0).to_string(), "hsl(12, 75%, 82%)");
    }
}
