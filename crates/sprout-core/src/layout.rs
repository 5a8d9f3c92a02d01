//! Flex-like layout metadata derived for every node.

use serde::{Deserialize, Serialize};

/// Layout axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Row,
    #[default]
    Column,
    /// Children overlap and are positioned absolutely, in z-order.
    Stack,
}

/// Distribution of items on the main axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MainAlign {
    #[default]
    Start,
    Center,
    End,
    SpaceBetween,
}

/// Alignment of items on the cross axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrossAlign {
    #[default]
    Start,
    Center,
    End,
    Stretch,
    Baseline,
}

/// Sizing behavior along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizingMode {
    #[default]
    Fixed,
    Hug,
    Fill,
}

/// Scrollable axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Overflow {
    Horizontal,
    Vertical,
    Both,
}

/// Whether layout was declared by the document or inferred from geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutSource {
    Explicit,
    #[default]
    Inferred,
}

/// Padding on all sides.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    /// Create uniform padding.
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Create symmetric padding.
    pub fn symmetric(horizontal: f64, vertical: f64) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    /// Total horizontal padding.
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// Total vertical padding.
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    pub fn is_zero(&self) -> bool {
        self.top == 0.0 && self.right == 0.0 && self.bottom == 0.0 && self.left == 0.0
    }

    /// Distinct non-zero side values, in top/right/bottom/left order.
    pub fn distinct_values(&self) -> Vec<f64> {
        let mut values: Vec<f64> = Vec::new();
        for side in [self.top, self.right, self.bottom, self.left] {
            if side > 0.0 && !values.iter().any(|v| (*v - side).abs() < f64::EPSILON) {
                values.push(side);
            }
        }
        values
    }
}

/// Sizing modes for both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AxisSizingModes {
    pub horizontal: SizingMode,
    pub vertical: SizingMode,
}

/// Layout model of a single node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutMeta {
    pub axis: Axis,
    pub gap: f64,
    pub padding: Padding,
    pub main_align: MainAlign,
    pub cross_align: CrossAlign,
    pub sizing: AxisSizingModes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overflow: Option<Overflow>,
    pub wrap: bool,
    pub source: LayoutSource,
}

impl LayoutMeta {
    pub fn is_scrollable(&self) -> bool {
        self.overflow.is_some()
    }
}
