//! Extracted styles and design tokens.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::layout::{Axis, CrossAlign, MainAlign, Overflow, Padding, SizingMode};
use crate::types::format_number;

/// Gradient geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    Linear,
    Radial,
    Angular,
    Diamond,
}

/// A normalized gradient stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub position: f64,
    pub color: String,
}

/// Node background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Background {
    Solid {
        color: String,
    },
    Gradient {
        kind: GradientKind,
        stops: Vec<GradientStop>,
    },
    Image {
        image_ref: Option<String>,
        scale_mode: Option<String>,
    },
}

/// Node border.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub color: String,
    pub width: f64,
}

/// Corner rounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CornerRadius {
    Uniform(f64),
    PerCorner {
        top_left: f64,
        top_right: f64,
        bottom_right: f64,
        bottom_left: f64,
    },
}

impl CornerRadius {
    /// Distinct non-zero radius values.
    pub fn values(&self) -> Vec<f64> {
        let mut values: Vec<f64> = Vec::new();
        let corners = match *self {
            Self::Uniform(r) => vec![r],
            Self::PerCorner {
                top_left,
                top_right,
                bottom_right,
                bottom_left,
            } => vec![top_left, top_right, bottom_right, bottom_left],
        };
        for r in corners {
            if r > 0.0 && !values.iter().any(|v| (*v - r).abs() < f64::EPSILON) {
                values.push(r);
            }
        }
        values
    }
}

/// Shadow placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadowKind {
    Drop,
    Inner,
}

/// A drop or inner shadow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub kind: ShadowKind,
    pub color: String,
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub spread: f64,
}

/// Text styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Typography {
    pub family: String,
    pub size: f64,
    pub weight: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub italic: bool,
}

/// Resolved size and sizing behavior.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sizing {
    pub width: f64,
    pub height: f64,
    pub horizontal: SizingMode,
    pub vertical: SizingMode,
}

/// Offset from the parent's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Flex container properties.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlexStyle {
    pub direction: Axis,
    pub gap: f64,
    pub padding: Padding,
    pub justify: MainAlign,
    pub align: CrossAlign,
    pub wrap: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overflow: Option<Overflow>,
}

/// Flattened visual style of one IR node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtractedStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<CornerRadius>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub shadows: Vec<Shadow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typography: Option<Typography>,
    pub sizing: Sizing,
    pub position: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex: Option<FlexStyle>,
}

/// A typography token: the signature of a text style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypographyToken {
    pub family: String,
    pub size: f64,
    pub weight: u16,
    pub line_height: Option<f64>,
}

impl TypographyToken {
    /// Content key: family, size, weight and line height.
    pub fn key(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.family,
            format_number(self.size),
            self.weight,
            self.line_height.map(format_number).unwrap_or_else(|| "auto".to_string())
        )
    }
}

impl From<&Typography> for TypographyToken {
    fn from(t: &Typography) -> Self {
        Self {
            family: t.family.clone(),
            size: t.size,
            weight: t.weight,
            line_height: t.line_height,
        }
    }
}

/// A shadow token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowToken {
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub spread: f64,
    pub color: String,
}

impl ShadowToken {
    /// Geometry-only key: offset-x, offset-y, blur, spread.
    pub fn geometry_key(&self) -> String {
        format!(
            "{},{},{},{}",
            format_number(self.offset_x),
            format_number(self.offset_y),
            format_number(self.blur),
            format_number(self.spread)
        )
    }

    /// Content key including color.
    pub fn key(&self) -> String {
        format!("{},{}", self.geometry_key(), self.color)
    }
}

impl From<&Shadow> for ShadowToken {
    fn from(s: &Shadow) -> Self {
        Self {
            offset_x: s.offset_x,
            offset_y: s.offset_y,
            blur: s.blur,
            spread: s.spread,
            color: s.color.clone(),
        }
    }
}

/// Deduplicated design vocabulary of one document, in first-seen order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DesignTokens {
    pub colors: IndexMap<String, String>,
    pub spacing: IndexMap<String, f64>,
    pub radii: IndexMap<String, f64>,
    pub typography: IndexMap<String, TypographyToken>,
    pub shadows: IndexMap<String, ShadowToken>,
}

impl DesignTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a hex color; keyed by its digits.
    pub fn add_color(&mut self, hex: &str) {
        let key = hex.trim_start_matches('#').to_string();
        self.colors.entry(key).or_insert_with(|| hex.to_string());
    }

    pub fn add_spacing(&mut self, value: f64) {
        if value > 0.0 {
            self.spacing.entry(format_number(value)).or_insert(value);
        }
    }

    pub fn add_radius(&mut self, value: f64) {
        if value > 0.0 {
            self.radii.entry(format_number(value)).or_insert(value);
        }
    }

    pub fn add_typography(&mut self, token: TypographyToken) {
        self.typography.entry(token.key()).or_insert(token);
    }

    pub fn add_shadow(&mut self, token: ShadowToken) {
        self.shadows.entry(token.key()).or_insert(token);
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
            && self.spacing.is_empty()
            && self.radii.is_empty()
            && self.typography.is_empty()
            && self.shadows.is_empty()
    }
}

/// Styles of every IR node plus the document's tokens.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StylesBundle {
    pub styles: IndexMap<String, ExtractedStyle>,
    pub tokens: DesignTokens,
}

impl StylesBundle {
    pub fn get(&self, style_ref: &str) -> Option<&ExtractedStyle> {
        self.styles.get(style_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_deduplicate_by_content() {
        let mut tokens = DesignTokens::new();
        tokens.add_color("#3B82F6");
        tokens.add_color("#3B82F6");
        tokens.add_color("#FFFFFF");
        tokens.add_spacing(16.0);
        tokens.add_spacing(16.0);
        tokens.add_spacing(0.0);
        tokens.add_radius(8.0);

        assert_eq!(tokens.colors.len(), 2);
        assert_eq!(tokens.colors.get("3B82F6").map(String::as_str), Some("#3B82F6"));
        assert_eq!(tokens.spacing.len(), 1);
        assert_eq!(tokens.radii.get("8"), Some(&8.0));
    }

    #[test]
    fn test_typography_key() {
        let token = TypographyToken {
            family: "Inter".to_string(),
            size: 16.0,
            weight: 600,
            line_height: Some(24.0),
        };
        assert_eq!(token.key(), "Inter/16/600/24");

        let auto = TypographyToken { line_height: None, ..token };
        assert_eq!(auto.key(), "Inter/16/600/auto");
    }

    #[test]
    fn test_shadow_keys() {
        let token = ShadowToken {
            offset_x: 0.0,
            offset_y: 4.0,
            blur: 12.0,
            spread: 0.0,
            color: "#0000001A".to_string(),
        };
        assert_eq!(token.geometry_key(), "0,4,12,0");
        assert_eq!(token.key(), "0,4,12,0,#0000001A");
    }

    #[test]
    fn test_corner_radius_values() {
        let radius = CornerRadius::PerCorner {
            top_left: 8.0,
            top_right: 8.0,
            bottom_right: 0.0,
            bottom_left: 0.0,
        };
        assert_eq!(radius.values(), vec![8.0]);
    }
}
