//! Style and design-token extraction.
//!
//! Every IR node gets one [`ExtractedStyle`] keyed by its `style_ref`. While
//! walking, the values that make up the document's visual vocabulary are
//! collected into [`DesignTokens`], deduplicated by content.

use indexmap::IndexMap;
use tracing::debug;

use sprout_core::{
    Background, Border, Bounds, CornerRadius, DesignTokens, EffectType, ExtractedStyle, FlexStyle,
    GradientKind, GradientStop, IrKind, IrNode, NodeProps, Paint, PaintType, Position, Role,
    Shadow, ShadowKind, ShadowToken, Sizing, StylesBundle, Typography, TypographyToken,
};
use sprout_layout::{sizing_modes, LayoutNode};

/// Id-indexed properties of every node in a layout tree, in pre-order.
pub fn collect_props(root: &LayoutNode) -> IndexMap<String, NodeProps> {
    fn walk(node: &LayoutNode, out: &mut IndexMap<String, NodeProps>) {
        out.insert(node.props.id.clone(), node.props.clone());
        for child in &node.children {
            walk(child, out);
        }
    }

    let mut props = IndexMap::new();
    walk(root, &mut props);
    props
}

/// Extract the style of every node under `root`.
pub fn extract_styles(root: &IrNode, props: &IndexMap<String, NodeProps>) -> StylesBundle {
    let mut bundle = StylesBundle::default();
    extract_node(root, None, props, &mut bundle);
    debug!(
        styles = bundle.styles.len(),
        colors = bundle.tokens.colors.len(),
        spacing = bundle.tokens.spacing.len(),
        radii = bundle.tokens.radii.len(),
        typography = bundle.tokens.typography.len(),
        shadows = bundle.tokens.shadows.len(),
        "extracted styles"
    );
    bundle
}

fn extract_node(
    node: &IrNode,
    parent: Option<&Bounds>,
    props: &IndexMap<String, NodeProps>,
    bundle: &mut StylesBundle,
) {
    let label = match &node.kind {
        IrKind::Button {
            label_ref: Some(id),
            ..
        } => props.get(id),
        _ => None,
    };
    let style = match props.get(&node.style_ref) {
        Some(p) => style_of(node, p, label, parent),
        None => geometry_only(node, parent),
    };
    collect_tokens(&style, &mut bundle.tokens);
    bundle.styles.insert(node.style_ref.clone(), style);

    for child in node.children() {
        extract_node(child, Some(&node.bounds), props, bundle);
    }
}

fn geometry_only(node: &IrNode, parent: Option<&Bounds>) -> ExtractedStyle {
    ExtractedStyle {
        sizing: Sizing {
            width: node.bounds.width,
            height: node.bounds.height,
            ..Default::default()
        },
        position: position(&node.bounds, parent),
        flex: node.layout().map(flex_style),
        ..Default::default()
    }
}

/// A button takes its typography from its label node.
fn style_of(
    node: &IrNode,
    props: &NodeProps,
    label: Option<&NodeProps>,
    parent: Option<&Bounds>,
) -> ExtractedStyle {
    let is_text = node.role() == Role::Text;
    let modes = sizing_modes(props);

    ExtractedStyle {
        background: if is_text { None } else { background(props) },
        border: border(props),
        corner_radius: corner_radius(props),
        shadows: shadows(props),
        typography: if is_text {
            typography(props)
        } else {
            label.and_then(typography)
        },
        sizing: Sizing {
            width: node.bounds.width,
            height: node.bounds.height,
            horizontal: modes.horizontal,
            vertical: modes.vertical,
        },
        position: position(&node.bounds, parent),
        opacity: (props.opacity < 1.0).then_some(props.opacity),
        flex: node.layout().map(flex_style),
    }
}

fn position(bounds: &Bounds, parent: Option<&Bounds>) -> Position {
    match parent {
        Some(p) => Position {
            x: bounds.x - p.x,
            y: bounds.y - p.y,
        },
        None => Position::default(),
    }
}

fn flex_style(layout: &sprout_core::LayoutMeta) -> FlexStyle {
    FlexStyle {
        direction: layout.axis,
        gap: layout.gap,
        padding: layout.padding,
        justify: layout.main_align,
        align: layout.cross_align,
        wrap: layout.wrap,
        overflow: layout.overflow,
    }
}

/// Hex of a solid paint with its opacity folded in.
fn solid_hex(paint: &Paint) -> Option<String> {
    paint
        .color
        .filter(|_| paint.paint_type == PaintType::Solid)
        .map(|c| c.to_color(paint.opacity).to_hex())
}

/// Background from the top-most visible fill. Fills are stored bottom to top.
fn background(props: &NodeProps) -> Option<Background> {
    let paint = props.visible_fills().last()?;
    match paint.paint_type {
        PaintType::Solid => solid_hex(paint).map(|color| Background::Solid { color }),
        PaintType::GradientLinear
        | PaintType::GradientRadial
        | PaintType::GradientAngular
        | PaintType::GradientDiamond => Some(Background::Gradient {
            kind: gradient_kind(paint.paint_type),
            stops: paint
                .gradient_stops
                .iter()
                .map(|stop| GradientStop {
                    position: stop.position,
                    color: stop.color.to_color(paint.opacity).to_hex(),
                })
                .collect(),
        }),
        PaintType::Image => Some(Background::Image {
            image_ref: paint.image_ref.clone(),
            scale_mode: paint.scale_mode.clone(),
        }),
        PaintType::Emoji | PaintType::Video | PaintType::Unknown => None,
    }
}

fn gradient_kind(paint_type: PaintType) -> GradientKind {
    match paint_type {
        PaintType::GradientRadial => GradientKind::Radial,
        PaintType::GradientAngular => GradientKind::Angular,
        PaintType::GradientDiamond => GradientKind::Diamond,
        _ => GradientKind::Linear,
    }
}

fn border(props: &NodeProps) -> Option<Border> {
    if !props.has_visible_stroke() {
        return None;
    }
    let color = props.visible_strokes().find_map(solid_hex)?;
    Some(Border {
        color,
        width: props.stroke_weight.unwrap_or(1.0),
    })
}

fn corner_radius(props: &NodeProps) -> Option<CornerRadius> {
    if let Some([tl, tr, br, bl]) = props.rectangle_corner_radii {
        if tl == tr && tr == br && br == bl {
            return (tl > 0.0).then_some(CornerRadius::Uniform(tl));
        }
        return Some(CornerRadius::PerCorner {
            top_left: tl,
            top_right: tr,
            bottom_right: br,
            bottom_left: bl,
        });
    }
    props
        .corner_radius
        .filter(|r| *r > 0.0)
        .map(CornerRadius::Uniform)
}

fn shadows(props: &NodeProps) -> Vec<Shadow> {
    props
        .visible_effects()
        .filter_map(|effect| {
            let kind = match effect.effect_type {
                EffectType::DropShadow => ShadowKind::Drop,
                EffectType::InnerShadow => ShadowKind::Inner,
                _ => return None,
            };
            Some(Shadow {
                kind,
                color: effect
                    .color
                    .map_or_else(|| "#000000".to_string(), |c| c.to_color(1.0).to_hex()),
                offset_x: effect.offset.x,
                offset_y: effect.offset.y,
                blur: effect.radius,
                spread: effect.spread,
            })
        })
        .collect()
}

fn typography(props: &NodeProps) -> Option<Typography> {
    let style = props.style.as_ref()?;
    Some(Typography {
        family: style
            .font_family
            .clone()
            .unwrap_or_else(|| "sans-serif".to_string()),
        size: style.font_size.unwrap_or(14.0),
        weight: style.font_weight.map_or(400, |w| w.round().clamp(1.0, 1000.0) as u16),
        line_height: style.line_height_px,
        letter_spacing: style.letter_spacing.filter(|s| *s != 0.0),
        color: props.visible_fills().filter_map(solid_hex).last(),
        align: style.text_align_horizontal.as_deref().map(str::to_lowercase),
        italic: style.italic,
    })
}

fn collect_tokens(style: &ExtractedStyle, tokens: &mut DesignTokens) {
    if let Some(Background::Solid { color }) = &style.background {
        tokens.add_color(color);
    }
    if let Some(border) = &style.border {
        tokens.add_color(&border.color);
    }
    if let Some(typography) = &style.typography {
        if let Some(color) = &typography.color {
            tokens.add_color(color);
        }
        tokens.add_typography(TypographyToken::from(typography));
    }
    if let Some(radius) = &style.corner_radius {
        for value in radius.values() {
            tokens.add_radius(value);
        }
    }
    if let Some(flex) = &style.flex {
        tokens.add_spacing(flex.gap);
        for value in flex.padding.distinct_values() {
            tokens.add_spacing(value);
        }
    }
    for shadow in &style.shadows {
        tokens.add_shadow(ShadowToken::from(shadow));
    }
}
