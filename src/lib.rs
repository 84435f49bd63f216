use wasm_bindgen::prelude::*;
use js_sys::{Array, Object, Reflect};

pub mod cluster;
pub mod color;
mod error;
pub mod profile;
pub mod quantize;
pub mod store;
pub mod variants;

pub use color::{Hue, PerceptualColor, to_display, to_perceptual};
pub use error::{Error, Result};
pub use profile::{
    ColorEntry, ColorProfile, Palette, ProfileOptions, build_profile, downscale_to_fit,
    profile_from_bytes, profile_from_image,
};
pub use store::{ImageId, ImageStore, StoredImage};
pub use variants::Variant;

// ------------------------------------------------------------
// JS conversion helpers
// ------------------------------------------------------------

fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), JsValue> {
    Reflect::set(target, &JsValue::from_str(key), value)?;
    Ok(())
}

fn entry_to_js(entry: &ColorEntry) -> Result<Object, JsValue> {
    let obj = Object::new();

    let rgb = Array::new();
    for channel in entry.rgb {
        rgb.push(&JsValue::from(channel));
    }
    set(&obj, "rgb", &rgb)?;
    set(&obj, "hex", &JsValue::from_str(&entry.hex))?;
    set(&obj, "oklch", &JsValue::from_str(&entry.oklch.to_string()))?;
    set(&obj, "l", &JsValue::from_str(&entry.oklch.lightness_text()))?;
    set(&obj, "c", &JsValue::from_str(&entry.oklch.chroma_text()))?;
    // Achromatic colors carry `undefined` rather than a made-up angle.
    let hue = match entry.oklch.hue.degrees() {
        Some(h) => JsValue::from_str(&format!("{h:.1}")),
        None => JsValue::UNDEFINED,
    };
    set(&obj, "h", &hue)?;

    Ok(obj)
}

fn palette_to_js(palette: &Palette) -> Result<Object, JsValue> {
    let obj = Object::new();
    set(&obj, "key", &JsValue::from_str(&palette.key))?;
    set(&obj, "name", &JsValue::from_str(&palette.name))?;

    let colors = Array::new();
    for entry in &palette.colors {
        let entry = entry_to_js(entry)?;
        colors.push(&entry);
    }
    set(&obj, "colors", &colors)?;

    Ok(obj)
}

/// Extract the primary palette, its ten style variants and the micro palette
/// from an encoded image.
///
/// The returned object has the shape
/// `{ palettes: [{ key, name, colors }], micro: { key, name, colors } }`, with
/// the primary palette first. Each color is `{ rgb, hex, oklch, l, c, h }`.
///
/// Pass a `seed` to make the result reproducible.
#[wasm_bindgen]
pub fn extract_color_profile(
    input: Vec<u8>,
    n_colors: usize,
    seed: Option<u64>,
) -> Result<Object, JsValue> {
    let mut options = ProfileOptions::new().colors(n_colors);
    options.seed = seed;

    let profile = profile_from_bytes(&input, &options)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let palettes = Array::new();
    for palette in profile.palettes() {
        let palette = palette_to_js(palette)?;
        palettes.push(&palette);
    }

    let result = Object::new();
    set(&result, "palettes", &palettes)?;
    let micro = palette_to_js(&profile.micro)?;
    set(&result, "micro", &micro)?;

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    // JS objects cannot be built off-wasm; these only pin the conversion signatures.
    #[test]
    fn export_helpers_have_js_signatures() {
        let _: fn(&ColorEntry) -> Result<Object, JsValue> = entry_to_js;
        let _: fn(&Palette) -> Result<Object, JsValue> = palette_to_js;
        let _: fn(Vec<u8>, usize, Option<u64>) -> Result<Object, JsValue> = extract_color_profile;
    }
}
