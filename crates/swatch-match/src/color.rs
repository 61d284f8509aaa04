//! sRGB, hex and CIE L\*a\*b\* color types
//!
//! Conversions assume the D65 illuminant and the 2° standard observer.

use std::fmt;
use std::str::FromStr;

use crate::error::ColorError;

/// D65 reference white, X component
const WHITE_X: f64 = 0.95047;
/// D65 reference white, Y component
const WHITE_Y: f64 = 1.0;
/// D65 reference white, Z component
const WHITE_Z: f64 = 1.08883;

/// Below this the sRGB transfer function is linear.
const SRGB_LINEAR_THRESHOLD: f64 = 0.04045;
/// Below this the Lab companding function is linear.
const LAB_EPSILON: f64 = 0.008856;

/// An 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to CIE L\*a\*b\*.
    #[inline]
    pub fn to_lab(self) -> Lab {
        rgb_to_lab(self)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    /// Parse `RRGGBB` or `#RRGGBB`, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex_to_rgb(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// A color in CIE L\*a\*b\*.
///
/// `l` is lightness in 0..=100; `a` (green–red) and `b` (blue–yellow) are
/// roughly within -128..=127 for colors reachable from sRGB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Lab {
    #[inline]
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// CIE76 distance to `other`.
    #[inline]
    pub fn delta_e(self, other: Lab) -> f64 {
        delta_e(self, other)
    }
}

/// Remove the sRGB gamma curve from a channel in 0.0..=1.0.
#[inline]
fn srgb_to_linear(c: f64) -> f64 {
    if c > SRGB_LINEAR_THRESHOLD {
        ((c + 0.055) / 1.055).powf(2.4)
    } else {
        c / 12.92
    }
}

/// Lab companding function applied to a white-normalized XYZ component.
#[inline]
fn lab_f(t: f64) -> f64 {
    if t > LAB_EPSILON {
        t.powf(1.0 / 3.0)
    } else {
        7.787 * t + 16.0 / 116.0
    }
}

/// Convert an 8-bit sRGB color to CIE L\*a\*b\*.
pub fn rgb_to_lab(rgb: Rgb) -> Lab {
    let r = srgb_to_linear(rgb.r as f64 / 255.0);
    let g = srgb_to_linear(rgb.g as f64 / 255.0);
    let b = srgb_to_linear(rgb.b as f64 / 255.0);

    let x = (r * 0.4124 + g * 0.3576 + b * 0.1805) / WHITE_X;
    let y = (r * 0.2126 + g * 0.7152 + b * 0.0722) / WHITE_Y;
    let z = (r * 0.0193 + g * 0.1192 + b * 0.9505) / WHITE_Z;

    let (fx, fy, fz) = (lab_f(x), lab_f(y), lab_f(z));

    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// Parse a 6-digit hex color, with or without a leading `#`.
///
/// # Example
/// ```
/// use swatch_match::{hex_to_rgb, Rgb};
/// assert_eq!(hex_to_rgb("#7f3300").unwrap(), Rgb::new(127, 51, 0));
/// assert!(hex_to_rgb("7f33").is_err());
/// ```
pub fn hex_to_rgb(hex: &str) -> Result<Rgb, ColorError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);

    // from_str_radix alone would accept a leading '+'
    if digits.len() != 6 || !digits.bytes().all(|c| c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidColorFormat {
            value: hex.to_string(),
        });
    }

    let value = u32::from_str_radix(digits, 16).map_err(|_| ColorError::InvalidColorFormat {
        value: hex.to_string(),
    })?;

    Ok(Rgb {
        r: (value >> 16) as u8,
        g: ((value >> 8) & 0xFF) as u8,
        b: (value & 0xFF) as u8,
    })
}

/// Parse a hex color and convert it straight to Lab.
pub fn hex_to_lab(hex: &str) -> Result<Lab, ColorError> {
    hex_to_rgb(hex).map(rgb_to_lab)
}

/// CIE76 color difference: plain Euclidean distance in Lab.
pub fn delta_e(lab1: Lab, lab2: Lab) -> f64 {
    let dl = lab2.l - lab1.l;
    let da = lab2.a - lab1.a;
    let db = lab2.b - lab1.b;
    (dl * dl + da * da + db * db).sqrt()
}
