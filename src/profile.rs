//! Assembling a full color profile for one image.

use std::num::NonZeroU8;

use image::{DynamicImage, GenericImageView, RgbaImage, imageops::FilterType};
use palette::Srgb;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::cluster::{DEFAULT_MAX_ITERATIONS, by_frequency, cluster_with_rng};
use crate::color::{PerceptualColor, to_display, to_hex, to_perceptual};
use crate::error::Result;
use crate::quantize::{DEFAULT_BUCKET_SIZE, quantize};
use crate::variants::Variant;

/// Settings for [`build_profile`] and friends.
///
/// Every field has a default, so a partial JSON document is a valid config.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileOptions {
    /// Number of colors in the primary palette and its variants.
    pub colors: usize,
    /// Quantization bucket width per channel.
    pub bucket_size: NonZeroU8,
    /// Cap on k-means refinement rounds.
    pub max_iterations: usize,
    /// Longest side the image is shrunk to before extracting the primary palette.
    pub primary_max_side: u32,
    /// Longest side the image is shrunk to before extracting the micro palette.
    pub micro_max_side: u32,
    /// Number of colors in the micro palette.
    pub micro_colors: usize,
    /// Fixed seed for k-means++; `None` draws from the thread RNG.
    pub seed: Option<u64>,
}

impl ProfileOptions {
    pub const fn new() -> Self {
        Self {
            colors: 8,
            bucket_size: DEFAULT_BUCKET_SIZE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            primary_max_side: 150,
            micro_max_side: 100,
            micro_colors: 256,
            seed: None,
        }
    }

    pub const fn colors(self, colors: usize) -> Self {
        Self { colors, ..self }
    }

    pub const fn bucket_size(self, bucket_size: NonZeroU8) -> Self {
        Self { bucket_size, ..self }
    }

    pub const fn seed(self, seed: u64) -> Self {
        Self { seed: Some(seed), ..self }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// One swatch of a palette.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorEntry {
    pub rgb: [u8; 3],
    pub hex: String,
    pub oklch: PerceptualColor,
}

impl ColorEntry {
    /// Entry for a color sampled from the image.
    pub fn from_rgb(rgb: Srgb<u8>) -> Self {
        Self {
            rgb: [rgb.red, rgb.green, rgb.blue],
            hex: to_hex(rgb),
            oklch: to_perceptual(rgb),
        }
    }

    /// Entry for a computed color. The OKLCH values are kept as computed,
    /// while the RGB values are the clamped display color.
    pub fn from_perceptual(oklch: PerceptualColor) -> Self {
        let rgb = to_display(oklch);
        Self {
            rgb: [rgb.red, rgb.green, rgb.blue],
            hex: to_hex(rgb),
            oklch,
        }
    }
}

/// A named, ordered set of colors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub key: String,
    pub name: String,
    pub colors: Vec<ColorEntry>,
}

impl Palette {
    pub fn new(key: &str, name: &str, colors: Vec<ColorEntry>) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            colors,
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Everything extracted from a single image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorProfile {
    /// The extracted colors, most common first.
    pub primary: Palette,
    /// One palette per [`Variant`], in [`Variant::ALL`] order.
    pub variants: Vec<Palette>,
    /// The large sample palette.
    pub micro: Palette,
}

impl ColorProfile {
    /// Primary palette followed by the variants.
    pub fn palettes(&self) -> impl Iterator<Item = &Palette> {
        std::iter::once(&self.primary).chain(&self.variants)
    }

    /// Look up a palette by key (`"primary"`, `"soft"`, ..., `"micro"`).
    pub fn palette(&self, key: &str) -> Option<&Palette> {
        self.palettes()
            .chain(std::iter::once(&self.micro))
            .find(|p| p.key == key)
    }

    pub fn variant(&self, variant: Variant) -> Option<&Palette> {
        self.palette(variant.key())
    }
}

/// Cluster `samples`, collapsing the weighted copies that come back verbatim
/// when there are no more samples than `k`.
fn representative_colors<R: Rng + ?Sized>(
    samples: &[Srgb<u8>],
    k: usize,
    max_iterations: usize,
    rng: &mut R,
) -> Result<Vec<Srgb<u8>>> {
    let colors = cluster_with_rng(samples, k, max_iterations, rng)?;
    if samples.len() <= k {
        Ok(by_frequency(&colors))
    } else {
        Ok(colors)
    }
}

/// Primary palette with its ten variants, from an RGBA buffer.
pub fn extract_palettes<R: Rng + ?Sized>(
    pixels: &[u8],
    options: &ProfileOptions,
    rng: &mut R,
) -> Result<(Palette, Vec<Palette>)> {
    let samples = quantize(pixels, options.bucket_size);
    let centroids = representative_colors(&samples, options.colors, options.max_iterations, rng)?;

    let primary: Vec<ColorEntry> = centroids.into_iter().map(ColorEntry::from_rgb).collect();
    let base: Vec<PerceptualColor> = primary.iter().map(|e| e.oklch).collect();

    let variants = Variant::ALL
        .iter()
        .map(|&v| {
            let colors = v.apply(&base).into_iter().map(ColorEntry::from_perceptual).collect();
            Palette::new(v.key(), v.name(), colors)
        })
        .collect();

    Ok((Palette::new("primary", "Extracted Colors", primary), variants))
}

/// The micro palette: many colors, no variants.
pub fn extract_micro_palette<R: Rng + ?Sized>(
    pixels: &[u8],
    options: &ProfileOptions,
    rng: &mut R,
) -> Result<Palette> {
    let samples = quantize(pixels, options.bucket_size);
    let centroids = representative_colors(&samples, options.micro_colors, options.max_iterations, rng)?;
    let colors = centroids.into_iter().map(ColorEntry::from_rgb).collect();
    Ok(Palette::new("micro", "256 Color Sample", colors))
}

/// Build a profile from two already downsampled RGBA buffers.
///
/// An empty or fully transparent buffer gives empty palettes rather than an error.
pub fn build_profile(
    primary_pixels: &[u8],
    micro_pixels: &[u8],
    options: &ProfileOptions,
) -> Result<ColorProfile> {
    let mut rng = options.rng();
    let (primary, variants) = extract_palettes(primary_pixels, options, &mut rng)?;
    let micro = extract_micro_palette(micro_pixels, options, &mut rng)?;

    log::info!(
        "built profile: {} primary colors, {} micro colors",
        primary.len(),
        micro.len()
    );
    Ok(ColorProfile { primary, variants, micro })
}

/// Shrink `img` so that it fits inside a `max_side` square, keeping its aspect
/// ratio. Images that already fit are only converted.
pub fn downscale_to_fit(img: &DynamicImage, max_side: u32) -> RgbaImage {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return img.to_rgba8();
    }

    let scale = (max_side as f32 / w as f32)
        .min(max_side as f32 / h as f32)
        .min(1.0);
    if scale >= 1.0 {
        return img.to_rgba8();
    }

    let new_w = ((w as f32 * scale).floor() as u32).max(1);
    let new_h = ((h as f32 * scale).floor() as u32).max(1);
    image::imageops::resize(img, new_w, new_h, FilterType::Triangle)
}

/// Build a profile from a decoded image.
pub fn profile_from_image(img: &DynamicImage, options: &ProfileOptions) -> Result<ColorProfile> {
    let primary = downscale_to_fit(img, options.primary_max_side);
    let micro = downscale_to_fit(img, options.micro_max_side);
    build_profile(primary.as_raw(), micro.as_raw(), options)
}

/// Decode `input` (any format the `image` crate understands) and build its profile.
pub fn profile_from_bytes(input: &[u8], options: &ProfileOptions) -> Result<ColorProfile> {
    let img = image::load_from_memory(input)?;
    profile_from_image(&img, options)
}
