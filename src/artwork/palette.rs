use std::path::Path;

use image::{ImageReader, RgbaImage};

use crate::artwork::{
    color::{Palette, Rgb},
    error::{invalid_parameter, ArtworkError},
    quantize::quantize,
};

/// Pixels with less opacity are ignored during sampling
const MIN_ALPHA: u8 = 125;
/// Pixels with all channels above this are considered background white
const WHITE_THRESHOLD: u8 = 250;
const DOMINANT_SAMPLE_COLORS: u32 = 5;

/// Extracts [color_count] representative colors from the image at [path].
/// [quality] controls the sampling density: only every n-th pixel is read,
/// so 1 is the most accurate and slowest setting.
///
/// The result always contains exactly [color_count] colors, ordered by dominance.
/// Images with fewer distinct colors yield repeated entries.
pub fn extract_palette(
    path: impl AsRef<Path>,
    color_count: u32,
    quality: u32,
) -> Result<Palette, ArtworkError> {
    validate(color_count, quality)?;
    let img = decode(path.as_ref())?;
    palette_from_image(&img, color_count, quality)
}

/// Same as [extract_palette], but works on an already decoded image.
pub fn palette_from_image(
    img: &RgbaImage,
    color_count: u32,
    quality: u32,
) -> Result<Palette, ArtworkError> {
    validate(color_count, quality)?;

    let samples = sample_pixels(img, quality as usize);
    if samples.is_empty() {
        return Err(invalid_parameter("Cannot extract a palette from an empty image"));
    }

    let mut palette = quantize(&samples, color_count as usize);
    let wanted = color_count as usize;
    if palette.len() < wanted {
        log::warn!(
            "Image only yields {} of {} requested colors, repeating them",
            palette.len(),
            wanted
        );
        let distinct = palette.len();
        for i in 0..(wanted - distinct) {
            palette.push(palette[i % distinct]);
        }
    }
    Ok(palette)
}

/// Returns the single most representative color of the image at [path].
pub fn dominant_color(path: impl AsRef<Path>, quality: u32) -> Result<Rgb, ArtworkError> {
    let palette = extract_palette(path, DOMINANT_SAMPLE_COLORS, quality)?;
    palette
        .first()
        .copied()
        .ok_or_else(|| invalid_parameter("Image has no colors"))
}

pub(crate) fn decode(path: &Path) -> Result<RgbaImage, ArtworkError> {
    let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(img.to_rgba8())
}

fn validate(color_count: u32, quality: u32) -> Result<(), ArtworkError> {
    if color_count < 1 {
        return Err(invalid_parameter("Color count must be at least 1"));
    }
    if quality < 1 {
        return Err(invalid_parameter("Quality must be at least 1"));
    }
    Ok(())
}

/// Reads every [step]-th pixel, skipping translucent and near white ones.
/// If nothing is left after filtering, the unfiltered samples are used.
fn sample_pixels(img: &RgbaImage, step: usize) -> Vec<[u8; 3]> {
    let sampled = img.pixels().step_by(step.max(1));
    let is_relevant = |px: &&image::Rgba<u8>| {
        let [r, g, b, a] = px.0;
        a >= MIN_ALPHA && !(r > WHITE_THRESHOLD && g > WHITE_THRESHOLD && b > WHITE_THRESHOLD)
    };

    let filtered: Vec<[u8; 3]> = sampled
        .clone()
        .filter(is_relevant)
        .map(|px| [px.0[0], px.0[1], px.0[2]])
        .collect();
    if !filtered.is_empty() {
        return filtered;
    }

    log::warn!("All sampled pixels are white or transparent, using them anyway");
    sampled.map(|px| [px.0[0], px.0[1], px.0[2]]).collect()
}
