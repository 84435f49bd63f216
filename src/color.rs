//! Conversion between displayable sRGB and OKLCH.

use std::fmt;

use palette::{FromColor, Oklch, Srgb};
use serde::{Deserialize, Serialize};

/// Chroma below which a color is considered to have no hue.
pub const ACHROMATIC_CHROMA: f32 = 5e-4;

/// Hue angle of a perceptual color.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "degrees")]
pub enum Hue {
    /// An angle in `[0, 360)` degrees. Build it with [`Hue::from_degrees`]
    /// (or through [`PerceptualColor::new`], which renormalizes) so the angle
    /// stays in range.
    Hued(f32),
    /// Grays have no meaningful hue.
    Achromatic,
}

impl Hue {
    /// Normalize an angle into `[0, 360)`.
    pub fn from_degrees(degrees: f32) -> Self {
        let mut h = degrees.rem_euclid(360.0);
        if h >= 360.0 {
            h = 0.0;
        }
        Hue::Hued(h)
    }

    pub fn degrees(self) -> Option<f32> {
        match self {
            Hue::Hued(h) => Some(h),
            Hue::Achromatic => None,
        }
    }

    pub fn is_achromatic(self) -> bool {
        matches!(self, Hue::Achromatic)
    }

    /// Rotate a defined hue; achromatic stays achromatic.
    pub fn rotate(self, degrees: f32) -> Self {
        match self {
            Hue::Hued(h) => Hue::from_degrees(h + degrees),
            Hue::Achromatic => Hue::Achromatic,
        }
    }
}

/// A color in OKLCH.
///
/// `lightness` is in `[0, 1]`, `chroma` is non-negative (in practice at most
/// ~0.4 for sRGB colors).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerceptualColor {
    pub lightness: f32,
    pub chroma: f32,
    pub hue: Hue,
}

impl PerceptualColor {
    /// Build a color, marking it achromatic when the chroma is negligible.
    ///
    /// Hued angles are wrapped into `[0, 360)`.
    pub fn new(lightness: f32, chroma: f32, hue: Hue) -> Self {
        let chroma = chroma.max(0.0);
        let hue = match hue {
            _ if chroma < ACHROMATIC_CHROMA => Hue::Achromatic,
            Hue::Hued(h) => Hue::from_degrees(h),
            Hue::Achromatic => Hue::Achromatic,
        };
        Self { lightness, chroma, hue }
    }

    /// Lightness on a 0–100 scale with one decimal, e.g. `62.8`.
    pub fn lightness_text(&self) -> String {
        format!("{:.1}", self.lightness * 100.0)
    }

    /// Chroma with three decimals, e.g. `0.257`.
    pub fn chroma_text(&self) -> String {
        format!("{:.3}", self.chroma)
    }

    /// Hue in degrees with one decimal, or `none` when achromatic.
    ///
    /// `none` is the undefined-hue marker (a CSS Color 4 powerless hue). It is
    /// never replaced by a numeric fallback such as `0.0`; the wasm export
    /// reports the same case as `undefined`.
    pub fn hue_text(&self) -> String {
        match self.hue {
            Hue::Hued(h) => format!("{h:.1}"),
            Hue::Achromatic => "none".to_string(),
        }
    }
}

/// CSS Color 4 notation, e.g. `oklch(62.8% 0.258 29.2)`.
impl fmt::Display for PerceptualColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "oklch({}% {} {})",
            self.lightness_text(),
            self.chroma_text(),
            self.hue_text()
        )
    }
}

/// Convert an 8-bit sRGB color to OKLCH.
pub fn to_perceptual(rgb: Srgb<u8>) -> PerceptualColor {
    let oklch: Oklch<f32> = Oklch::from_color(rgb.into_format::<f32>());
    PerceptualColor::new(
        oklch.l,
        oklch.chroma,
        Hue::from_degrees(oklch.hue.into_positive_degrees()),
    )
}

/// Convert OKLCH back to 8-bit sRGB.
///
/// Out-of-gamut results are clamped per channel; there is no gamut mapping.
/// An achromatic hue is rendered with angle 0, which only matters if the
/// chroma is non-negligible.
pub fn to_display(color: PerceptualColor) -> Srgb<u8> {
    let hue = color.hue.degrees().unwrap_or(0.0);
    let oklch = Oklch::new(color.lightness, color.chroma, hue);
    let rgb: Srgb<f32> = Srgb::from_color(oklch);

    let channel = |v: f32| (v * 255.0).round().clamp(0.0, 255.0) as u8;
    Srgb::new(channel(rgb.red), channel(rgb.green), channel(rgb.blue))
}

/// `#rrggbb` in lowercase.
pub fn to_hex(rgb: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
}
