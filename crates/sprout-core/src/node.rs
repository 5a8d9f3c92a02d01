//! Raw design-tool node schema.
//!
//! Mirrors the JSON a design tool's REST API returns for a node tree. Field
//! names are camelCase on the wire and every optional property defaults, so
//! partial exports deserialize cleanly.

use serde::{Deserialize, Serialize};

use crate::color::RawColor;
use crate::types::{Bounds, Vector};

/// Node type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Document,
    Canvas,
    Frame,
    Group,
    Section,
    Component,
    ComponentSet,
    Instance,
    Rectangle,
    Ellipse,
    Line,
    Vector,
    BooleanOperation,
    Star,
    RegularPolygon,
    Text,
    Slice,
    /// Placeholder emitted by the raw arena in place of a revisited node.
    CircularReference,
    #[default]
    #[serde(other)]
    Unknown,
}

impl NodeType {
    /// Path primitives that draw a glyph-like shape.
    pub fn is_vector_primitive(&self) -> bool {
        matches!(
            self,
            Self::Vector | Self::BooleanOperation | Self::Star | Self::Line | Self::RegularPolygon
        )
    }

    /// Types that can hold children.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Self::Document
                | Self::Canvas
                | Self::Frame
                | Self::Group
                | Self::Section
                | Self::Component
                | Self::ComponentSet
                | Self::Instance
        )
    }

    /// Types a single-child wrapper may be collapsed from.
    pub fn is_wrapper(&self) -> bool {
        matches!(self, Self::Frame | Self::Group | Self::Section)
    }
}

/// Paint type of a fill or stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaintType {
    #[default]
    Solid,
    GradientLinear,
    GradientRadial,
    GradientAngular,
    GradientDiamond,
    Image,
    Emoji,
    Video,
    #[serde(other)]
    Unknown,
}

/// A color stop within a gradient paint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub position: f64,
    pub color: RawColor,
}

/// A fill or stroke paint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Paint {
    #[serde(rename = "type")]
    pub paint_type: PaintType,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_one")]
    pub opacity: f64,
    pub color: Option<RawColor>,
    pub gradient_stops: Vec<ColorStop>,
    pub image_ref: Option<String>,
    pub scale_mode: Option<String>,
}

impl Paint {
    /// A visible solid paint.
    pub fn solid(color: RawColor) -> Self {
        Self {
            paint_type: PaintType::Solid,
            visible: true,
            opacity: 1.0,
            color: Some(color),
            ..Default::default()
        }
    }

    /// A visible image paint.
    pub fn image(image_ref: impl Into<String>) -> Self {
        Self {
            paint_type: PaintType::Image,
            visible: true,
            opacity: 1.0,
            image_ref: Some(image_ref.into()),
            ..Default::default()
        }
    }

    pub fn is_solid(&self) -> bool {
        self.paint_type == PaintType::Solid && self.color.is_some()
    }

    pub fn is_image(&self) -> bool {
        self.paint_type == PaintType::Image
    }

    pub fn is_gradient(&self) -> bool {
        matches!(
            self.paint_type,
            PaintType::GradientLinear
                | PaintType::GradientRadial
                | PaintType::GradientAngular
                | PaintType::GradientDiamond
        )
    }

    /// Color alpha multiplied by paint opacity.
    pub fn effective_alpha(&self) -> f64 {
        self.color.map(|c| c.a).unwrap_or(1.0) * self.opacity
    }
}

/// Effect type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectType {
    #[default]
    DropShadow,
    InnerShadow,
    LayerBlur,
    BackgroundBlur,
    #[serde(other)]
    Unknown,
}

/// A shadow or blur effect.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Effect {
    #[serde(rename = "type")]
    pub effect_type: EffectType,
    #[serde(default = "default_true")]
    pub visible: bool,
    pub color: Option<RawColor>,
    pub offset: Vector,
    pub radius: f64,
    pub spread: f64,
}

impl Effect {
    pub fn drop_shadow(color: RawColor, offset: Vector, radius: f64) -> Self {
        Self {
            effect_type: EffectType::DropShadow,
            visible: true,
            color: Some(color),
            offset,
            radius,
            spread: 0.0,
        }
    }

    pub fn is_shadow(&self) -> bool {
        matches!(self.effect_type, EffectType::DropShadow | EffectType::InnerShadow)
    }
}

/// Text style of a text node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypeStyle {
    pub font_family: Option<String>,
    pub font_weight: Option<f64>,
    pub font_size: Option<f64>,
    pub line_height_px: Option<f64>,
    pub letter_spacing: Option<f64>,
    pub text_align_horizontal: Option<String>,
    pub italic: bool,
}

/// Declared auto-layout axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutMode {
    #[default]
    None,
    Horizontal,
    Vertical,
    #[serde(other)]
    Unknown,
}

/// Declared main/cross axis alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AxisAlign {
    Min,
    Center,
    Max,
    SpaceBetween,
    Baseline,
    #[serde(other)]
    Unknown,
}

/// Declared sizing behavior for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AxisSizing {
    Fixed,
    Auto,
    Hug,
    Fill,
    #[serde(other)]
    Unknown,
}

/// Declared scroll behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverflowDirection {
    #[default]
    None,
    HorizontalScrolling,
    VerticalScrolling,
    HorizontalAndVerticalScrolling,
    #[serde(other)]
    Unknown,
}

/// Every property of a node except its children.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeProps {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_one")]
    pub opacity: f64,
    pub absolute_bounding_box: Option<Bounds>,
    pub fills: Vec<Paint>,
    pub strokes: Vec<Paint>,
    pub stroke_weight: Option<f64>,
    pub effects: Vec<Effect>,
    pub corner_radius: Option<f64>,
    pub rectangle_corner_radii: Option<[f64; 4]>,
    pub characters: Option<String>,
    pub style: Option<TypeStyle>,
    pub layout_mode: LayoutMode,
    pub item_spacing: Option<f64>,
    pub padding_left: Option<f64>,
    pub padding_right: Option<f64>,
    pub padding_top: Option<f64>,
    pub padding_bottom: Option<f64>,
    pub primary_axis_align_items: Option<AxisAlign>,
    pub counter_axis_align_items: Option<AxisAlign>,
    pub primary_axis_sizing_mode: Option<AxisSizing>,
    pub counter_axis_sizing_mode: Option<AxisSizing>,
    pub layout_sizing_horizontal: Option<AxisSizing>,
    pub layout_sizing_vertical: Option<AxisSizing>,
    pub layout_wrap: Option<String>,
    pub overflow_direction: OverflowDirection,
    pub clips_content: bool,
}

impl NodeProps {
    /// Create props with an id, name and type; everything else defaults.
    pub fn new(id: impl Into<String>, name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            node_type,
            visible: true,
            opacity: 1.0,
            ..Default::default()
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.absolute_bounding_box
    }

    pub fn visible_fills(&self) -> impl Iterator<Item = &Paint> {
        self.fills.iter().filter(|p| p.visible)
    }

    pub fn visible_strokes(&self) -> impl Iterator<Item = &Paint> {
        self.strokes.iter().filter(|p| p.visible)
    }

    pub fn visible_effects(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter().filter(|e| e.visible)
    }

    pub fn has_visible_fill(&self) -> bool {
        self.visible_fills().next().is_some()
    }

    pub fn has_visible_stroke(&self) -> bool {
        self.visible_strokes().next().is_some() && self.stroke_weight.unwrap_or(1.0) > 0.0
    }

    pub fn has_visible_effect(&self) -> bool {
        self.visible_effects().next().is_some()
    }

    pub fn has_drop_shadow(&self) -> bool {
        self.visible_effects()
            .any(|e| e.effect_type == EffectType::DropShadow)
    }

    pub fn has_solid_fill(&self) -> bool {
        self.visible_fills().any(Paint::is_solid)
    }

    pub fn has_image_fill(&self) -> bool {
        self.visible_fills().any(Paint::is_image)
    }

    pub fn has_corner_radius(&self) -> bool {
        self.corner_radius.unwrap_or(0.0) > 0.0
            || self
                .rectangle_corner_radii
                .map_or(false, |radii| radii.iter().any(|r| *r > 0.0))
    }

    pub fn is_translucent(&self) -> bool {
        self.opacity < 1.0
    }

    /// Whether the node paints anything of its own.
    pub fn has_visual_properties(&self) -> bool {
        self.has_visible_fill()
            || self.has_visible_stroke()
            || self.has_visible_effect()
            || self.has_corner_radius()
            || self.is_translucent()
    }

    pub fn has_auto_layout(&self) -> bool {
        matches!(self.layout_mode, LayoutMode::Horizontal | LayoutMode::Vertical)
    }

    /// Non-blank text content of a text node.
    pub fn text(&self) -> Option<&str> {
        if self.node_type != NodeType::Text {
            return None;
        }
        self.characters
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// A node of the raw design tree, as received from the fetch collaborator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawNode {
    #[serde(flatten)]
    pub props: NodeProps,
    #[serde(default)]
    pub children: Vec<RawNode>,
}

impl RawNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            props: NodeProps::new(id, name, node_type),
            children: Vec::new(),
        }
    }

    /// Sentinel standing in for a node reached a second time.
    pub fn circular_reference(id: &str) -> Self {
        Self::new(format!("{}#ref", id), "circular reference", NodeType::CircularReference)
    }

    pub fn with_bounds(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.props.absolute_bounding_box = Some(Bounds::new(x, y, width, height));
        self
    }

    pub fn with_fill(mut self, paint: Paint) -> Self {
        self.props.fills.push(paint);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.props.characters = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: RawNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = RawNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn id(&self) -> &str {
        &self.props.id
    }

    pub fn name(&self) -> &str {
        &self.props.name
    }
}

fn default_true() -> bool {
    true
}

fn default_one() -> f64 {
    1.0
}
