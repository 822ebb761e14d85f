use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::{Hsl, Rgb};

/// Gradient angle used by the background renderer.
pub const DEFAULT_GRADIENT_ANGLE: u16 = 135;

/// How a three-color scheme is derived from the dominant color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemePolicy {
    /// Blend the base toward white by 10%, 0% and 20%.
    #[default]
    LightnessBlend,
    /// Keep the base hue and emit fixed pastel saturation/lightness variants.
    HueRotation,
}

/// One palette entry, in whichever space the policy produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "space", rename_all = "snake_case")]
pub enum PaletteColor {
    Rgb(Rgb),
    Hsl(Hsl),
}

impl PaletteColor {
    pub fn to_rgb(self) -> Rgb {
        match self {
            PaletteColor::Rgb(rgb) => rgb,
            PaletteColor::Hsl(hsl) => hsl.to_rgb(),
        }
    }
}

impl fmt::Display for PaletteColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteColor::Rgb(rgb) => fmt::Display::fmt(rgb, f),
            PaletteColor::Hsl(hsl) => fmt::Display::fmt(hsl, f),
        }
    }
}

/// Ordered three-color background description.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub colors: [PaletteColor; 3],
}

impl Palette {
    /// Soft pink scheme shown before, or instead of, an extracted one.
    pub fn default_scheme() -> Self {
        Self {
            colors: [
                PaletteColor::Rgb(Rgb::new(220, 180, 200)),
                PaletteColor::Rgb(Rgb::new(200, 160, 180)),
                PaletteColor::Rgb(Rgb::new(240, 200, 220)),
            ],
        }
    }

    pub fn css_gradient(&self, angle_degrees: u16) -> String {
        let [first, second, third] = &self.colors;
        format!("linear-gradient({angle_degrees}deg, {first}, {second}, {third})")
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::default_scheme()
    }
}

/// Derives a three-color scheme from `base`.
pub fn generate_scheme(base: Rgb, policy: SchemePolicy) -> Palette {
    match policy {
        SchemePolicy::LightnessBlend => Palette {
            colors: [
                PaletteColor::Rgb(base.lighten(0.1)),
                PaletteColor::Rgb(base),
                PaletteColor::Rgb(base.lighten(0.2)),
            ],
        },
        SchemePolicy::HueRotation => {
            let hue = base.to_hsl().hue;
            Palette {
                colors: [
                    PaletteColor::Hsl(Hsl::new(hue, 75.0, 82.0)),
                    PaletteColor::Hsl(Hsl::new(hue + 10.0, 80.0, 78.0)),
                    PaletteColor::Hsl(Hsl::new(hue - 5.0, 70.0, 85.0)),
                ],
            }
        }
    }
}
