use std::{fmt::Display, str::FromStr};

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::artwork::error::{invalid_parameter, ArtworkError};

/// An opaque 8-bit sRGB color as produced by palette extraction.
/// Serialized as a `#rrggbb` string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Colors ordered by dominance, most representative first.
pub type Palette = Vec<Rgb>;

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    pub fn with_alpha(self, alpha: u8) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, alpha])
    }

    /// Euclidean distance in RGB space.
    pub fn distance(&self, other: &Rgb) -> f32 {
        let d = |a: u8, b: u8| (a as f32 - b as f32).powi(2);
        (d(self.r, other.r) + d(self.g, other.g) + d(self.b, other.b)).sqrt()
    }

    /// Returns a lighter color by scaling the HSV value with [factor] percent.
    /// A factor of 150 yields a color 50% brighter. If the value overflows,
    /// the excess is taken from the saturation instead.
    /// Factors below 100 darken the color (see [Rgb::darker]), factors of 0 leave it untouched.
    pub fn lighter(&self, factor: u32) -> Rgb {
        if factor == 0 {
            return *self;
        } else if factor < 100 {
            return self.darker(10_000 / factor);
        }

        let (h, mut s, v) = self.to_hsv();
        let mut v = v * factor as f32 / 100.0;
        if v > 1.0 {
            s = (s - (v - 1.0)).max(0.0);
            v = 1.0;
        }
        Rgb::from_hsv(h, s, v)
    }

    /// Returns a darker color by dividing the HSV value by [factor] percent.
    pub fn darker(&self, factor: u32) -> Rgb {
        if factor == 0 {
            return *self;
        } else if factor < 100 {
            return self.lighter(10_000 / factor);
        }

        let (h, s, v) = self.to_hsv();
        Rgb::from_hsv(h, s, v * 100.0 / factor as f32)
    }

    /// Hue in degrees [0, 360), saturation and value in [0, 1].
    pub fn to_hsv(&self) -> (f32, f32, f32) {
        let r = self.r as f32 / 255.0;
        let g = self.g as f32 / 255.0;
        let b = self.b as f32 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let h = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        let s = if max == 0.0 { 0.0 } else { delta / max };
        (h, s, max)
    }

    pub fn from_hsv(h: f32, s: f32, v: f32) -> Rgb {
        let s = s.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);
        let c = v * s;
        let h = h.rem_euclid(360.0) / 60.0;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = v - c;
        let to_u8 = |ch: f32| ((ch + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgb::new(to_u8(r), to_u8(g), to_u8(b))
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

impl Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Parses `#rrggbb` (the leading '#' is optional).
impl FromStr for Rgb {
    type Err = ArtworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid_parameter(format!("'{s}' is not a #rrggbb color")));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| invalid_parameter(format!("'{s}' is not a #rrggbb color")))
        };
        Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = ArtworkError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_string()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lighter_scales_value() {
        let c = Rgb::new(100, 50, 0).lighter(120);
        assert_eq!(c, Rgb::new(120, 60, 0));
    }

    #[test]
    fn lighter_overflow_desaturates() {
        // Value is already at its maximum, so only saturation can give
        let c = Rgb::new(255, 0, 0).lighter(120);
        assert_eq!(c.r, 255);
        assert!(c.g > 0 && c.g == c.b, "Expected desaturated red, got {c}");
    }

    #[test]
    fn lighter_below_hundred_darkens() {
        let c = Rgb::new(200, 100, 40);
        assert_eq!(c.lighter(50), c.darker(200));
        assert_eq!(c.lighter(0), c);
    }

    #[test]
    fn hsv_round_trip_primaries() {
        for c in [Rgb::new(255, 0, 0), Rgb::new(0, 255, 0), Rgb::new(0, 0, 255), Rgb::new(12, 200, 99)] {
            let (h, s, v) = c.to_hsv();
            assert_eq!(Rgb::from_hsv(h, s, v), c);
        }
    }

    #[test]
    fn parse_hex() {
        assert_eq!("#121212".parse::<Rgb>().unwrap(), Rgb::new(18, 18, 18));
        assert_eq!("ff8000".parse::<Rgb>().unwrap(), Rgb::new(255, 128, 0));
        assert!(matches!("#12345".parse::<Rgb>(), Err(ArtworkError::InvalidParameter(_))));
        assert!(matches!("#zz0000".parse::<Rgb>(), Err(ArtworkError::InvalidParameter(_))));
        assert_eq!(Rgb::new(255, 128, 0).to_string(), "#ff8000");
    }

    #[test]
    fn serde_as_hex_string() {
        let json = serde_json::to_string(&Rgb::new(1, 2, 255)).unwrap();
        assert_eq!(json, "\"#0102ff\"");
        assert_eq!(serde_json::from_str::<Rgb>(&json).unwrap(), Rgb::new(1, 2, 255));
        assert!(serde_json::from_str::<Rgb>("\"blue\"").is_err());
    }
}
