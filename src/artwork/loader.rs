use std::path::{Path, PathBuf};

use image::{imageops::FilterType, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::artwork::{
    color::{Palette, Rgb},
    corners::apply_corner_mask,
    error::{invalid_parameter, ArtworkError},
    gradient::{compose_background, render_background, GradientStyle, LinearGradient},
    palette::{decode, palette_from_image},
};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ArtworkSettings {
    /// Album cover, relative to the resource directory unless absolute
    pub cover_path: PathBuf,
    /// Edge length of the square the cover is fitted into
    pub cover_size: u32,
    pub corner_radius: f32,
    pub color_count: u32,
    pub quality: u32,
    pub background_enabled: bool,
    pub gradient: GradientStyle,
    /// Opaque color underneath the background gradients
    pub base_color: Rgb,
}

impl Default for ArtworkSettings {
    fn default() -> Self {
        ArtworkSettings {
            cover_path: PathBuf::from("img/album-cover-test.jpg"),
            cover_size: 300,
            corner_radius: 25.0,
            color_count: 3,
            quality: 5,
            background_enabled: true,
            gradient: GradientStyle::default(),
            base_color: Rgb::new(18, 18, 18),
        }
    }
}

/// Everything the window needs to display one album cover.
#[derive(Debug, Clone)]
pub struct Artwork {
    /// The scaled cover with rounded corners
    pub cover: RgbaImage,
    pub palette: Palette,
    /// Empty if the background is disabled
    pub gradients: Vec<LinearGradient>,
    /// The rasterized [Artwork::gradients], if the background is enabled
    pub background: Option<RgbaImage>,
}

impl Artwork {
    /// Decodes the cover at [path] once and derives every artwork product from it.
    /// [viewport] is the size of the area the background gets painted on.
    /// This blocks on file I/O and image processing, see [load_artwork].
    pub fn load(
        path: &Path,
        settings: &ArtworkSettings,
        viewport: (u32, u32),
    ) -> Result<Artwork, ArtworkError> {
        let source = decode(path)?;

        let mut cover = fit_cover(&source, settings.cover_size)?;
        apply_corner_mask(&mut cover, settings.corner_radius)?;

        let palette = palette_from_image(&source, settings.color_count, settings.quality)?;

        let (width, height) = viewport;
        let (gradients, background) = if settings.background_enabled {
            let gradients = compose_background(&palette, width, height, &settings.gradient)?;
            let background = render_background(&gradients, width, height, settings.base_color);
            (gradients, Some(background))
        } else {
            (Vec::new(), None)
        };

        log::info!(
            "Loaded artwork {:?}: cover {}x{}, palette [{}]",
            path,
            cover.width(),
            cover.height(),
            palette
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(Artwork {
            cover,
            palette,
            gradients,
            background,
        })
    }
}

/// Loads the artwork on the blocking thread pool of the current tokio runtime,
/// so the calling (UI) thread stays responsive.
pub async fn load_artwork(
    path: PathBuf,
    settings: ArtworkSettings,
    viewport: (u32, u32),
) -> Result<Artwork, ArtworkError> {
    tokio::task::spawn_blocking(move || Artwork::load(&path, &settings, viewport))
        .await
        .map_err(|e| ArtworkError::Task(e.to_string()))?
}

/// Scales [img] to fit into a [size] x [size] square, keeping its aspect ratio.
/// Fails for a [size] of zero.
pub fn fit_cover(img: &RgbaImage, size: u32) -> Result<RgbaImage, ArtworkError> {
    if size == 0 {
        return Err(invalid_parameter("Cover size must not be zero"));
    }
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Ok(img.clone());
    }
    let scale = (size as f64 / width as f64).min(size as f64 / height as f64);
    let new_width = ((width as f64 * scale).round() as u32).clamp(1, size);
    let new_height = ((height as f64 * scale).round() as u32).clamp(1, size);
    if (new_width, new_height) == (width, height) {
        return Ok(img.clone());
    }
    Ok(image::imageops::resize(img, new_width, new_height, FilterType::Lanczos3))
}
