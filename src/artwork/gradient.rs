use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::artwork::{
    color::{Palette, Rgb},
    error::ArtworkError,
};

/// Number of diagonal gradients layered on top of each other
pub const GRADIENT_SLOTS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    /// Offset along the gradient line in [0, 1]
    pub position: f32,
    pub color: Rgba<u8>,
}

/// A linear gradient between two points in viewport coordinates.
/// Beyond its first and last stop, the gradient pads with the stop's color.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    pub start: Point,
    pub end: Point,
    pub stops: Vec<GradientStop>,
}

/// How palette colors are turned into the background gradients.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct GradientStyle {
    /// Palette index painted on each diagonal slot:
    /// top-left to bottom-right, bottom-left to top-right, top-right to bottom-left.
    pub slot_order: [usize; GRADIENT_SLOTS],
    /// Lightening of the near stop in percent (see [Rgb::lighter])
    pub lighten_factor: u32,
    /// Position at which the color has faded out completely
    pub fade_stop: f32,
}

impl Default for GradientStyle {
    fn default() -> Self {
        GradientStyle {
            slot_order: [0, 2, 1],
            lighten_factor: 120,
            fade_stop: std::f32::consts::FRAC_1_SQRT_2,
        }
    }
}

impl GradientStyle {
    /// Minimum palette size this style can be composed from
    pub fn required_colors(&self) -> usize {
        self.slot_order
            .iter()
            .map(|idx| idx + 1)
            .max()
            .unwrap_or(0)
            .max(GRADIENT_SLOTS)
    }
}

/// Composes the layered background gradients for a [width] x [height] viewport.
/// The palette needs at least [GRADIENT_SLOTS] colors and every index of
/// [GradientStyle::slot_order] has to point into it.
/// The gradients are meant to be painted in order, each over the full viewport.
pub fn compose_background(
    palette: &Palette,
    width: u32,
    height: u32,
    style: &GradientStyle,
) -> Result<Vec<LinearGradient>, ArtworkError> {
    let required = style.required_colors();
    if palette.len() < required {
        return Err(ArtworkError::InsufficientPalette {
            required,
            actual: palette.len(),
        });
    }

    let (w, h) = (width as f32, height as f32);
    let diagonals = [
        (Point::new(0.0, 0.0), Point::new(w, h)),
        (Point::new(0.0, h), Point::new(w, 0.0)),
        (Point::new(w, 0.0), Point::new(0.0, h)),
    ];

    let gradients = diagonals
        .into_iter()
        .zip(style.slot_order)
        .map(|((start, end), idx)| {
            let color: Rgb = palette[idx];
            LinearGradient {
                start,
                end,
                stops: vec![
                    GradientStop {
                        position: 0.0,
                        color: color.lighter(style.lighten_factor).with_alpha(255),
                    },
                    GradientStop {
                        position: style.fade_stop,
                        color: color.with_alpha(0),
                    },
                ],
            }
        })
        .collect();
    Ok(gradients)
}

impl LinearGradient {
    /// Gradient parameter of the pixel centred at ([x], [y]):
    /// its projection onto the gradient line, normalized to the line's length.
    fn parameter(&self, x: f32, y: f32) -> f32 {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        let len_sq = dx * dx + dy * dy;
        if len_sq == 0.0 {
            return 0.0;
        }
        ((x - self.start.x) * dx + (y - self.start.y) * dy) / len_sq
    }

    /// Color at gradient parameter [t], padding beyond the outer stops.
    pub fn color_at(&self, t: f32) -> Rgba<u8> {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Rgba([0, 0, 0, 0]);
        };
        if t <= first.position {
            return first.color;
        }
        if t >= last.position {
            return last.color;
        }

        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t > b.position {
                continue;
            }
            let span = b.position - a.position;
            let f = if span <= 0.0 { 1.0 } else { (t - a.position) / span };
            let lerp = |ca: u8, cb: u8| (ca as f32 + (cb as f32 - ca as f32) * f).round() as u8;
            return Rgba([
                lerp(a.color[0], b.color[0]),
                lerp(a.color[1], b.color[1]),
                lerp(a.color[2], b.color[2]),
                lerp(a.color[3], b.color[3]),
            ]);
        }
        last.color
    }
}

/// Rasterizes [gradients] in order on an opaque [base] color.
/// Every gradient covers the full viewport and is blended source-over
/// onto the previous ones.
pub fn render_background(
    gradients: &[LinearGradient],
    width: u32,
    height: u32,
    base: Rgb,
) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(width, height, base.with_alpha(255));
    for gradient in gradients {
        for (x, y, px) in canvas.enumerate_pixels_mut() {
            let t = gradient.parameter(x as f32 + 0.5, y as f32 + 0.5);
            blend_over(px, gradient.color_at(t));
        }
    }
    canvas
}

/// Source-over compositing of [src] onto the opaque [dst].
fn blend_over(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let alpha = src[3] as f32 / 255.0;
    if alpha <= 0.0 {
        return;
    }
    for ch in 0..3 {
        let blended = src[ch] as f32 * alpha + dst[ch] as f32 * (1.0 - alpha);
        dst[ch] = blended.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = 255;
}
