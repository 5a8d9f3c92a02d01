//! Color types and conversion utilities.
//!
//! Design documents carry colors as 0–1 float channels; tokens and styles
//! use uppercase hex. Perceptual comparison goes through CIE LAB.

use serde::{Deserialize, Serialize};

/// A color as stored in the design document (0.0–1.0 channels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "default_alpha")]
    pub a: f64,
}

fn default_alpha() -> f64 {
    1.0
}

impl RawColor {
    /// Convert to an 8-bit color, folding in a paint or layer opacity.
    pub fn to_color(&self, opacity: f64) -> Color {
        Color::from_unit(self.r, self.g, self.b, self.a * opacity)
    }
}

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// LAB color space for perceptual color comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabColor {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Color {
    /// Alpha at or above this value counts as solid.
    pub const SOLID_ALPHA: f64 = 0.99;

    /// Create a new color from RGB values.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a new color from RGBA values.
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create from 0.0–1.0 channels.
    pub fn from_unit(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: unit_to_byte(r),
            g: unit_to_byte(g),
            b: unit_to_byte(b),
            a: unit_to_byte(a),
        }
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (the `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 => {
                let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|n| n * 17);
                Some(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    /// Uppercase hex, with an alpha byte only when the color is not opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            self.to_rgb_hex()
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    /// Uppercase 6-digit hex, ignoring alpha.
    pub fn to_rgb_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Alpha as 0.0–1.0.
    pub fn alpha(&self) -> f64 {
        self.a as f64 / 255.0
    }

    pub fn is_solid(&self) -> bool {
        self.alpha() >= Self::SOLID_ALPHA
    }

    pub fn same_rgb(&self, other: &Color) -> bool {
        self.r == other.r && self.g == other.g && self.b == other.b
    }

    /// Convert to LAB color space for perceptual comparisons.
    pub fn to_lab(&self) -> LabColor {
        let (x, y, z) = self.to_xyz();

        // Reference white point (D65)
        let ref_x = 95.047;
        let ref_y = 100.0;
        let ref_z = 108.883;

        let fx = lab_f(x / ref_x);
        let fy = lab_f(y / ref_y);
        let fz = lab_f(z / ref_z);

        LabColor {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }

    /// Convert to XYZ color space.
    fn to_xyz(&self) -> (f64, f64, f64) {
        let (r, g, b) = self.to_linear();

        // Linear RGB to XYZ (sRGB primaries, D65 white point)
        let x = r * 0.4124564 + g * 0.3575761 + b * 0.1804375;
        let y = r * 0.2126729 + g * 0.7151522 + b * 0.0721750;
        let z = r * 0.0193339 + g * 0.1191920 + b * 0.9503041;

        (x * 100.0, y * 100.0, z * 100.0)
    }

    fn to_linear(&self) -> (f64, f64, f64) {
        (
            srgb_to_linear(self.r as f64 / 255.0),
            srgb_to_linear(self.g as f64 / 255.0),
            srgb_to_linear(self.b as f64 / 255.0),
        )
    }

    /// Perceptual distance to another color using Delta E (CIE76).
    pub fn delta_e(&self, other: &Color) -> f64 {
        self.to_lab().distance(&other.to_lab())
    }

    /// Relative luminance (0.0 black – 1.0 white).
    pub fn relative_luminance(&self) -> f64 {
        let (r, g, b) = self.to_linear();
        0.2126 * r + 0.7152 * g + 0.0722 * b
    }
}

impl LabColor {
    /// Calculate Delta E distance (CIE76).
    pub fn distance(&self, other: &LabColor) -> f64 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        (dl * dl + da * da + db * db).sqrt()
    }
}

fn unit_to_byte(c: f64) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// LAB conversion helper function.
fn lab_f(t: f64) -> f64 {
    let delta: f64 = 6.0 / 29.0;
    if t > delta.powi(3) {
        t.cbrt()
    } else {
        t / (3.0 * delta * delta) + 4.0 / 29.0
    }
}

/// Convert sRGB component to linear RGB.
fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
