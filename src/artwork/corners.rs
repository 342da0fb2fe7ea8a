use image::RgbaImage;

use crate::artwork::error::{invalid_parameter, ArtworkError};

/// Returns a copy of [img] whose corners are rounded with the given [radius].
/// Pixels outside of the rounded rectangle become fully transparent,
/// pixels on its boundary are antialiased.
/// A radius of zero returns an identical copy.
pub fn round_corners(img: &RgbaImage, radius: f32) -> Result<RgbaImage, ArtworkError> {
    let mut rounded = img.clone();
    apply_corner_mask(&mut rounded, radius)?;
    Ok(rounded)
}

/// Rounds the corners of [img] in place. See [round_corners].
///
/// The radius is clamped per axis to half of the image's extent,
/// so oversized radii produce elliptic corners meeting in the middle
/// instead of an error.
/// This is a naive implementation running on the CPU, but only the
/// four corner regions are ever visited.
pub fn apply_corner_mask(img: &mut RgbaImage, radius: f32) -> Result<(), ArtworkError> {
    if !radius.is_finite() || radius < 0.0 {
        return Err(invalid_parameter(format!(
            "Corner radius must be a finite, non-negative number (got {radius})"
        )));
    }

    let (width, height) = img.dimensions();
    let rx = radius.min(width as f32 / 2.0);
    let ry = radius.min(height as f32 / 2.0);
    if rx <= 0.0 || ry <= 0.0 {
        return Ok(());
    }

    // Distance of a pixel centre from the corner circle's centre along one axis
    let nearest_corner_distance = |coord: u32, axis_length: u32, r: f32| {
        let center = coord as f32 + 0.5;
        let axis_length = axis_length as f32;
        if center < r {
            Some(r - center)
        } else if center > axis_length - r {
            Some(center - (axis_length - r))
        } else {
            None // Not a corner - Ignoring
        }
    };

    for y in 0..height {
        let Some(dy) = nearest_corner_distance(y, height, ry) else {
            continue;
        };
        for x in 0..width {
            let Some(dx) = nearest_corner_distance(x, width, rx) else {
                continue;
            };

            let coverage = corner_coverage(dx, dy, rx, ry);
            if coverage >= 1.0 {
                continue;
            }
            let px = img.get_pixel_mut(x, y);
            px.0[3] = (px.0[3] as f32 * coverage).round() as u8;
        }
    }
    Ok(())
}

/// Fraction of a pixel covered by the elliptic corner arc with radii [rx] and [ry],
/// given the pixel centre's offset ([dx], [dy]) from the arc's centre.
/// Uses a one pixel wide linear ramp across the approximate signed distance.
fn corner_coverage(dx: f32, dy: f32, rx: f32, ry: f32) -> f32 {
    let nx = dx / rx;
    let ny = dy / ry;
    let signed_distance = ((nx * nx + ny * ny).sqrt() - 1.0) * rx.min(ry);
    (0.5 - signed_distance).clamp(0.0, 1.0)
}

#[cfg(test)]
mod test {
    use anyhow::{ensure, Result};
    use image::Rgba;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;

    fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba(color))
    }

    #[test]
    fn red_square_scenario() -> Result<()> {
        let img = solid(300, 300, [255, 0, 0, 255]);
        let rounded = round_corners(&img, 25.0)?;

        ensure!(rounded.dimensions() == (300, 300), "Dimensions changed");
        ensure!(rounded.get_pixel(150, 150).0 == [255, 0, 0, 255], "Centre not opaque red");
        ensure!(rounded.get_pixel(0, 0).0[3] == 0, "Corner not transparent");
        Ok(())
    }

    #[test]
    fn all_four_corners_transparent() -> Result<()> {
        let img = solid(120, 80, [10, 20, 30, 255]);
        let rounded = round_corners(&img, 16.0)?;
        for (x, y) in [(0, 0), (119, 0), (0, 79), (119, 79)] {
            ensure!(rounded.get_pixel(x, y).0[3] == 0, "Corner ({x},{y}) not transparent");
        }
        // Edge midpoints stay untouched
        for (x, y) in [(60, 0), (0, 40), (119, 40), (60, 79)] {
            ensure!(rounded.get_pixel(x, y).0[3] == 255, "Edge ({x},{y}) was masked");
        }
        Ok(())
    }

    #[test]
    fn zero_radius_is_identity() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(7);
        let img = RgbaImage::from_fn(33, 17, |_, _| Rgba(rng.random()));
        let rounded = round_corners(&img, 0.0)?;
        ensure!(rounded == img, "Radius 0 altered the image");
        Ok(())
    }

    #[test]
    fn preserves_dimensions() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let width = rng.random_range(1..64);
            let height = rng.random_range(1..64);
            let radius = rng.random_range(0.0..80.0);
            let img = solid(width, height, [1, 2, 3, 255]);
            let rounded = round_corners(&img, radius)?;
            ensure!(
                rounded.dimensions() == (width, height),
                "{width}x{height} with radius {radius} changed dimensions"
            );
        }
        Ok(())
    }

    #[test]
    fn input_is_not_mutated() -> Result<()> {
        let img = solid(40, 40, [0, 0, 255, 255]);
        let _ = round_corners(&img, 10.0)?;
        ensure!(img.pixels().all(|p| p.0[3] == 255), "Input was modified");
        Ok(())
    }

    #[test]
    fn boundary_is_antialiased() -> Result<()> {
        let rounded = round_corners(&solid(100, 100, [0, 255, 0, 255]), 30.0)?;
        let partial = rounded
            .pixels()
            .filter(|p| p.0[3] > 0 && p.0[3] < 255)
            .count();
        ensure!(partial > 0, "Expected partially transparent boundary pixels");
        Ok(())
    }

    #[test]
    fn existing_alpha_is_scaled_not_replaced() -> Result<()> {
        let rounded = round_corners(&solid(50, 50, [9, 9, 9, 100]), 10.0)?;
        ensure!(rounded.get_pixel(25, 25).0[3] == 100, "Inner alpha changed");
        ensure!(rounded.pixels().all(|p| p.0[3] <= 100), "Alpha was increased");
        Ok(())
    }

    #[test]
    fn oversized_radius_becomes_ellipse() -> Result<()> {
        let rounded = round_corners(&solid(100, 40, [5, 5, 5, 255]), 500.0)?;
        ensure!(rounded.get_pixel(50, 20).0[3] == 255, "Centre must stay opaque");
        ensure!(rounded.get_pixel(0, 0).0[3] == 0, "Corner must be transparent");
        ensure!(rounded.get_pixel(0, 20).0[3] > 0, "Left apex must be visible");
        ensure!(rounded.get_pixel(10, 0).0[3] == 0, "Top left of ellipse must be cut");
        Ok(())
    }

    #[test]
    fn corners_are_symmetric() -> Result<()> {
        let rounded = round_corners(&solid(64, 48, [0, 0, 0, 255]), 12.5)?;
        for y in 0..48 {
            for x in 0..64 {
                let a = rounded.get_pixel(x, y).0[3];
                ensure!(a == rounded.get_pixel(63 - x, y).0[3], "Not mirrored at ({x},{y})");
                ensure!(a == rounded.get_pixel(x, 47 - y).0[3], "Not flipped at ({x},{y})");
            }
        }
        Ok(())
    }

    #[test]
    fn rejects_invalid_radius() {
        let img = solid(4, 4, [0, 0, 0, 255]);
        assert!(matches!(round_corners(&img, -1.0), Err(ArtworkError::InvalidParameter(_))));
        assert!(matches!(round_corners(&img, f32::NAN), Err(ArtworkError::InvalidParameter(_))));
    }

    #[test]
    fn empty_image_is_fine() -> Result<()> {
        let rounded = round_corners(&RgbaImage::new(0, 0), 10.0)?;
        ensure!(rounded.dimensions() == (0, 0), "Expected empty image");
        Ok(())
    }
}
