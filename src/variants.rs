//! Stylistic palette variants derived in OKLCH.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::color::{Hue, PerceptualColor};

/// Highest chroma the variants push towards.
const CHROMA_CAP: f32 = 0.37;

/// Lightness every highlighter swatch is placed at.
const HIGHLIGHTER_LIGHTNESS: f32 = 0.8;

/// The ten derived palette styles, in presentation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Soft,
    Inverted,
    Vibrant,
    Highlighter,
    Monochrome,
    Dark,
    Neon,
    Analogous,
    Warm,
    Cool,
}

impl Variant {
    pub const ALL: [Variant; 10] = [
        Variant::Soft,
        Variant::Inverted,
        Variant::Vibrant,
        Variant::Highlighter,
        Variant::Monochrome,
        Variant::Dark,
        Variant::Neon,
        Variant::Analogous,
        Variant::Warm,
        Variant::Cool,
    ];

    /// Short identifier, suitable for CSS variable names.
    pub fn key(self) -> &'static str {
        match self {
            Variant::Soft => "soft",
            Variant::Inverted => "inverted",
            Variant::Vibrant => "vibrant",
            Variant::Highlighter => "highlighter",
            Variant::Monochrome => "monochrome",
            Variant::Dark => "dark",
            Variant::Neon => "neon",
            Variant::Analogous => "analogous",
            Variant::Warm => "warm",
            Variant::Cool => "cool",
        }
    }

    /// Human-readable palette title.
    pub fn name(self) -> &'static str {
        match self {
            Variant::Soft => "Soft Pastels",
            Variant::Inverted => "Complementary",
            Variant::Vibrant => "Vibrant Bold",
            Variant::Highlighter => "Highlighter Neon",
            Variant::Monochrome => "Monochrome",
            Variant::Dark => "Dark Mode",
            Variant::Neon => "Neon Electric",
            Variant::Analogous => "Analogous Harmony",
            Variant::Warm => "Warm Tones",
            Variant::Cool => "Cool Tones",
        }
    }

    /// Derive this variant from a whole palette.
    ///
    /// Every style except [`Variant::Highlighter`] maps each color on its own;
    /// the highlighter looks at all hues at once and returns the same number of
    /// colors.
    pub fn apply(self, colors: &[PerceptualColor]) -> Vec<PerceptualColor> {
        match self {
            Variant::Highlighter => highlighter(colors),
            _ => colors.iter().map(|&c| self.map_color(c)).collect(),
        }
    }

    /// Per-color transform. The highlighter is palette-wide and is handled in
    /// [`apply`](Self::apply), so it passes colors through here.
    fn map_color(self, color: PerceptualColor) -> PerceptualColor {
        let PerceptualColor { lightness: l, chroma: c, hue: h } = color;
        match self {
            Variant::Soft => PerceptualColor::new((l + 0.15).min(0.95), c * 0.4, h),
            Variant::Inverted => PerceptualColor::new(1.0 - l, c, h.rotate(180.0)),
            Variant::Vibrant => {
                PerceptualColor::new(l.clamp(0.4, 0.7), (c * 1.8).min(CHROMA_CAP), h)
            }
            Variant::Monochrome => PerceptualColor::new(l, 0.0, Hue::Achromatic),
            Variant::Dark => PerceptualColor::new((l * 0.5).max(0.15), c * 0.9, h),
            Variant::Neon => PerceptualColor::new(0.65, (c * 2.5).min(CHROMA_CAP), h),
            Variant::Analogous => PerceptualColor::new(l, c, h.rotate(30.0)),
            Variant::Warm => PerceptualColor::new(l.max(0.45), c * 0.85, shift_into(h, 30.0)),
            Variant::Cool => {
                PerceptualColor::new((l + 0.05).min(0.75), c * 0.85, shift_into(h, 220.0))
            }
            Variant::Highlighter => color,
        }
    }
}

/// Compress a hue into a 72° band starting at `base`.
/// Undefined hues land on `base` itself.
fn shift_into(hue: Hue, base: f32) -> Hue {
    match hue {
        Hue::Hued(h) => Hue::from_degrees(base + h * 0.2),
        Hue::Achromatic => Hue::Hued(base),
    }
}

/// `count` hues spaced evenly around the wheel, anchored at the median-position
/// entry of the sorted `hues` (or at 0 when there are none).
pub fn highlighter_hues(hues: &[f32], count: usize) -> Vec<f32> {
    if count == 0 {
        return Vec::new();
    }

    let mut sorted = hues.to_vec();
    sorted.sort_by(f32::total_cmp);
    let start = sorted.get(sorted.len() / 2).copied().unwrap_or(0.0);

    let step = 360.0 / count as f32;
    (0..count)
        .map(|i| (start + step * i as f32).rem_euclid(360.0))
        .collect()
}

/// Approximate the most chroma sRGB can show for `hue` at `lightness`.
pub fn max_chroma(hue: f32, lightness: f32) -> f32 {
    let h = hue.rem_euclid(360.0);

    let base = if (60.0..=120.0).contains(&h) {
        0.37 // yellow-green
    } else if (240.0..=270.0).contains(&h) {
        0.31 // blue
    } else if h <= 30.0 || h >= 330.0 {
        0.33 // red
    } else if (180.0..=210.0).contains(&h) {
        0.29 // cyan
    } else if (270.0..=330.0).contains(&h) {
        0.32 // purple
    } else {
        0.35
    };

    // Chroma room shrinks towards black and white.
    let capacity = ((lightness - 0.1) * PI).sin().max(0.7);
    base * capacity
}

fn highlighter(colors: &[PerceptualColor]) -> Vec<PerceptualColor> {
    let hues: Vec<f32> = colors.iter().map(|c| c.hue.degrees().unwrap_or(0.0)).collect();

    highlighter_hues(&hues, colors.len())
        .into_iter()
        .map(|h| {
            PerceptualColor::new(
                HIGHLIGHTER_LIGHTNESS,
                max_chroma(h, HIGHLIGHTER_LIGHTNESS),
                Hue::from_degrees(h),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f32 = 1e-5;

    fn lch(l: f32, c: f32, h: f32) -> PerceptualColor {
        PerceptualColor::new(l, c, Hue::Hued(h))
    }

    fn single(variant: Variant, color: PerceptualColor) -> PerceptualColor {
        variant.apply(&[color])[0]
    }

    fn assert_close(a: PerceptualColor, l: f32, c: f32, h: Option<f32>) {
        assert!((a.lightness - l).abs() < EPS, "lightness {} != {l}", a.lightness);
        assert!((a.chroma - c).abs() < EPS, "chroma {} != {c}", a.chroma);
        match (a.hue.degrees(), h) {
            (Some(x), Some(y)) => assert!((x - y).abs() < 1e-3, "hue {x} != {y}"),
            (None, None) => {}
            (x, y) => panic!("hue {x:?} != {y:?}"),
        }
    }

    #[test]
    fn inverted_and_vibrant() {
        let c = lch(0.5, 0.1, 200.0);
        assert_close(single(Variant::Inverted, c), 0.5, 0.1, Some(20.0));
        assert_close(single(Variant::Vibrant, c), 0.5, 0.18, Some(200.0));
    }

    #[test]
    fn per_color_formulas() {
        let c = lch(0.3, 0.2, 100.0);
        assert_close(single(Variant::Soft, c), 0.45, 0.08, Some(100.0));
        assert_close(single(Variant::Vibrant, c), 0.4, 0.36, Some(100.0));
        assert_close(single(Variant::Dark, c), 0.15, 0.18, Some(100.0));
        assert_close(single(Variant::Neon, c), 0.65, 0.37, Some(100.0));
        assert_close(single(Variant::Analogous, c), 0.3, 0.2, Some(130.0));
        assert_close(single(Variant::Warm, c), 0.45, 0.17, Some(50.0));
        assert_close(single(Variant::Cool, c), 0.35, 0.17, Some(240.0));

        let bright = lch(0.9, 0.05, 350.0);
        assert_close(single(Variant::Soft, bright), 0.95, 0.02, Some(350.0));
        assert_close(single(Variant::Dark, bright), 0.45, 0.045, Some(350.0));
        assert_close(single(Variant::Analogous, bright), 0.9, 0.05, Some(20.0));
        assert_close(single(Variant::Cool, bright), 0.75, 0.0425, Some(290.0));
        assert_close(single(Variant::Warm, bright), 0.9, 0.0425, Some(100.0));
    }

    #[test]
    fn achromatic_inputs_stay_undefined() {
        let gray = PerceptualColor::new(0.6, 0.0, Hue::Achromatic);
        for variant in [Variant::Soft, Variant::Inverted, Variant::Analogous, Variant::Warm, Variant::Cool] {
            assert!(single(variant, gray).hue.is_achromatic(), "{variant:?}");
        }
        assert_close(single(Variant::Inverted, gray), 0.4, 0.0, None);
    }

    #[test]
    fn warm_and_cool_fall_back_to_their_anchor() {
        // A faint but measurable chroma keeps the anchor hue.
        let faint = PerceptualColor { lightness: 0.5, chroma: 0.01, hue: Hue::Achromatic };
        assert_eq!(single(Variant::Warm, faint).hue, Hue::Hued(30.0));
        assert_eq!(single(Variant::Cool, faint).hue, Hue::Hued(220.0));
    }

    #[test]
    fn highlighter_spacing_from_median() {
        let palette = [lch(0.5, 0.1, 300.0), lch(0.5, 0.1, 10.0), lch(0.5, 0.1, 90.0), lch(0.5, 0.1, 200.0)];
        let out = Variant::Highlighter.apply(&palette);
        assert_eq!(out.len(), 4);

        // Sorted hues: 10, 90, 200, 300 -> median position 2 -> 200.
        let hues: Vec<f32> = out.iter().map(|c| c.hue.degrees().unwrap()).collect();
        for (h, want) in hues.iter().zip([200.0, 290.0, 20.0, 110.0]) {
            assert!((h - want).abs() < 1e-3, "{hues:?}");
        }
        for c in &out {
            assert!((c.lightness - 0.8).abs() < EPS);
        }
    }

    #[test]
    fn highlighter_treats_gray_as_zero() {
        let palette = [PerceptualColor::new(0.5, 0.0, Hue::Achromatic), lch(0.5, 0.1, 120.0)];
        // Sorted: 0, 120 -> index 1 -> 120.
        let out = Variant::Highlighter.apply(&palette);
        assert_eq!(out[0].hue, Hue::Hued(120.0));
        assert_eq!(out[1].hue, Hue::Hued(300.0));
    }

    #[test]
    fn highlighter_without_hues_starts_at_zero() {
        assert_eq!(highlighter_hues(&[], 4), vec![0.0, 90.0, 180.0, 270.0]);
        assert!(highlighter_hues(&[10.0], 0).is_empty());
        assert!(Variant::Highlighter.apply(&[]).is_empty());
    }

    #[test]
    fn max_chroma_table() {
        let k = (0.7_f32 * PI).sin();
        assert!((max_chroma(90.0, 0.8) - 0.37 * k).abs() < EPS);
        assert!((max_chroma(250.0, 0.8) - 0.31 * k).abs() < EPS);
        assert!((max_chroma(15.0, 0.8) - 0.33 * k).abs() < EPS);
        assert!((max_chroma(345.0, 0.8) - 0.33 * k).abs() < EPS);
        assert!((max_chroma(195.0, 0.8) - 0.29 * k).abs() < EPS);
        assert!((max_chroma(300.0, 0.8) - 0.32 * k).abs() < EPS);
        assert!((max_chroma(150.0, 0.8) - 0.35 * k).abs() < EPS);
        // Boundaries resolve in table order.
        assert!((max_chroma(270.0, 0.8) - 0.31 * k).abs() < EPS);
        assert!((max_chroma(330.0, 0.8) - 0.33 * k).abs() < EPS);
        // Extreme lightness is floored at 70% capacity.
        assert!((max_chroma(90.0, 0.05) - 0.37 * 0.7).abs() < EPS);
    }

    #[test]
    fn every_variant_keeps_palette_length() {
        let palette = [lch(0.2, 0.1, 10.0), lch(0.7, 0.2, 150.0), lch(0.9, 0.0, 0.0)];
        for variant in Variant::ALL {
            assert_eq!(variant.apply(&palette).len(), palette.len(), "{variant:?}");
        }
    }

    proptest! {
        #[test]
        fn monochrome_has_no_chroma(l in 0.0f32..=1.0, c in 0.0f32..0.4, h in 0.0f32..360.0) {
            let out = single(Variant::Monochrome, lch(l, c, h));
            prop_assert_eq!(out.chroma, 0.0);
            prop_assert!(out.hue.is_achromatic());
            prop_assert_eq!(out.lightness, l);
        }

        #[test]
        fn highlighter_hues_are_evenly_spaced(
            hues in prop::collection::vec(0.0f32..360.0, 1..20),
        ) {
            let n = hues.len();
            let out = highlighter_hues(&hues, n);
            let step = 360.0 / n as f32;
            for pair in out.windows(2) {
                let gap = (pair[1] - pair[0]).rem_euclid(360.0);
                prop_assert!((gap - step).abs() < 1e-2);
            }
        }
    }
}
