//! Core value types shared across the pipeline.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in absolute document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Width divided by height; zero-height boxes report zero.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height <= 0.0 {
            0.0
        } else {
            self.width / self.height
        }
    }

    /// Check whether the vertical ranges of two boxes intersect.
    pub fn overlaps_vertically(&self, other: &Bounds) -> bool {
        self.y < other.bottom() && other.y < self.bottom()
    }

    /// Check whether the horizontal ranges of two boxes intersect.
    pub fn overlaps_horizontally(&self, other: &Bounds) -> bool {
        self.x < other.right() && other.x < self.right()
    }
}

/// A 2D offset.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

/// Format a number the way token keys and pass-through values expect it:
/// integers without a fractional part, everything else with at most two
/// decimals and no trailing zeros.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = (value * 100.0).round() / 100.0;
    if (rounded - rounded.round()).abs() < 1e-9 {
        format!("{}", rounded.round() as i64)
    } else {
        let text = format!("{:.2}", rounded);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(16.0), "16");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(0.125), "0.13");
        assert_eq!(format_number(-4.0), "-4");
        assert_eq!(format_number(f64::NAN), "0");
    }

    #[test]
    fn test_bounds_overlap() {
        let a = Bounds::new(0.0, 0.0, 100.0, 40.0);
        let b = Bounds::new(120.0, 10.0, 100.0, 40.0);
        let c = Bounds::new(0.0, 50.0, 100.0, 40.0);

        assert!(a.overlaps_vertically(&b));
        assert!(!a.overlaps_vertically(&c));
        assert!(a.overlaps_horizontally(&c));
        assert_eq!(Bounds::new(0.0, 0.0, 10.0, 0.0).aspect_ratio(), 0.0);
    }
}
