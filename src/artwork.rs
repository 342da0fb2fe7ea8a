//! Album artwork processing: rounded covers, color palettes and
//! the palette driven background gradients.

mod color;
mod corners;
mod error;
mod gradient;
mod loader;
mod palette;
mod quantize;

pub use crate::artwork::color::{Palette, Rgb};
pub use crate::artwork::corners::{apply_corner_mask, round_corners};
pub use crate::artwork::error::ArtworkError;
pub use crate::artwork::gradient::{
    compose_background, render_background, GradientStop, GradientStyle, LinearGradient, Point,
    GRADIENT_SLOTS,
};
pub use crate::artwork::loader::{fit_cover, load_artwork, Artwork, ArtworkSettings};
pub use crate::artwork::palette::{dominant_color, extract_palette, palette_from_image};
