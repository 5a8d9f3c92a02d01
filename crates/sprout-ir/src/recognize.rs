//! Semantic role recognition.
//!
//! Each node is tested against an ordered list of [`Rule`]s; the first rule
//! that matches decides the role. The final rule always matches, so every
//! node gets exactly one role.

use serde::{Deserialize, Serialize};

use sprout_core::{ButtonVariant, IrKind, IrNode, NodeType, Role};
use sprout_layout::LayoutNode;

/// Size and shape thresholds used by the recognition rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierThresholds {
    /// Smallest icon side, in pixels.
    pub icon_min_size: f64,
    /// Largest icon side, in pixels.
    pub icon_max_size: f64,
    pub icon_min_aspect: f64,
    pub icon_max_aspect: f64,
    /// Tallest node that can still be a button.
    pub button_max_height: f64,
    /// Narrowest node that can still be a button.
    pub button_min_width: f64,
    /// Minimum aspect of a text button.
    pub button_min_aspect: f64,
    /// Aspect range of a square (icon or short-label) button.
    pub button_square_min_aspect: f64,
    pub button_square_max_aspect: f64,
    /// Smallest side of a card.
    pub card_min_size: f64,
    /// Fill opacity under which a filled button counts as ghost.
    pub ghost_max_opacity: f64,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            icon_min_size: 8.0,
            icon_max_size: 48.0,
            icon_min_aspect: 0.5,
            icon_max_aspect: 2.0,
            button_max_height: 80.0,
            button_min_width: 40.0,
            button_min_aspect: 1.5,
            button_square_min_aspect: 0.8,
            button_square_max_aspect: 1.2,
            card_min_size: 60.0,
            ghost_max_opacity: 0.2,
        }
    }
}

/// One entry of the recognition policy.
#[derive(Clone, Copy)]
pub struct Rule {
    pub role: Role,
    pub matches: fn(&LayoutNode, &ClassifierThresholds) -> bool,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("role", &self.role).finish()
    }
}

/// The recognition policy, in priority order.
pub const RULES: &[Rule] = &[
    Rule { role: Role::Text, matches: is_text },
    Rule { role: Role::Icon, matches: is_icon },
    Rule { role: Role::Image, matches: is_image },
    Rule { role: Role::Button, matches: is_button },
    Rule { role: Role::Card, matches: is_card },
    Rule { role: Role::Container, matches: always },
];

fn is_text(node: &LayoutNode, _: &ClassifierThresholds) -> bool {
    node.props.text().is_some()
}

fn is_icon(node: &LayoutNode, t: &ClassifierThresholds) -> bool {
    let bounds = node.bounds();
    let sized = [bounds.width, bounds.height]
        .iter()
        .all(|side| (t.icon_min_size..=t.icon_max_size).contains(side));
    let aspect = bounds.aspect_ratio();
    if !sized || !(t.icon_min_aspect..=t.icon_max_aspect).contains(&aspect) {
        return false;
    }

    node.props.node_type.is_vector_primitive()
        || node.props.has_image_fill()
        || (!node.children.is_empty()
            && node
                .children
                .iter()
                .all(|c| c.props.node_type.is_vector_primitive()))
}

fn is_image(node: &LayoutNode, _: &ClassifierThresholds) -> bool {
    node.props.has_image_fill()
}

fn is_button(node: &LayoutNode, t: &ClassifierThresholds) -> bool {
    if node.children.is_empty() {
        return false;
    }
    if !node.props.has_solid_fill() && !node.props.has_visible_stroke() {
        return false;
    }
    let bounds = node.bounds();
    if bounds.height > t.button_max_height || bounds.width < t.button_min_width {
        return false;
    }

    let aspect = bounds.aspect_ratio();
    let has_text = first_text(node).is_some();
    let has_icon = node.children.iter().any(|c| is_icon(c, t));
    let square = (t.button_square_min_aspect..=t.button_square_max_aspect).contains(&aspect);

    (has_text && aspect >= t.button_min_aspect) || (square && (has_text || has_icon))
}

fn is_card(node: &LayoutNode, t: &ClassifierThresholds) -> bool {
    if node.children.is_empty() {
        return false;
    }
    let bounds = node.bounds();
    if bounds.width < t.card_min_size || bounds.height < t.card_min_size {
        return false;
    }
    let signals = [
        node.props.has_corner_radius(),
        node.props.has_drop_shadow(),
        node.props.has_visible_fill(),
    ];
    signals.iter().filter(|s| **s).count() >= 2
}

fn always(_: &LayoutNode, _: &ClassifierThresholds) -> bool {
    true
}

/// Classifies layout trees into IR trees.
#[derive(Debug, Clone)]
pub struct Recognizer {
    thresholds: ClassifierThresholds,
    rules: &'static [Rule],
}

impl Default for Recognizer {
    fn default() -> Self {
        Self::new(ClassifierThresholds::default())
    }
}

impl Recognizer {
    pub fn new(thresholds: ClassifierThresholds) -> Self {
        Self {
            thresholds,
            rules: RULES,
        }
    }

    pub fn thresholds(&self) -> &ClassifierThresholds {
        &self.thresholds
    }

    /// Role of a single node, ignoring its descendants' roles.
    pub fn classify(&self, node: &LayoutNode) -> Role {
        self.rules
            .iter()
            .find(|rule| (rule.matches)(node, &self.thresholds))
            .map_or(Role::Container, |rule| rule.role)
    }

    /// Build the IR subtree rooted at `node`.
    pub fn recognize(&self, node: &LayoutNode) -> IrNode {
        let kind = match self.classify(node) {
            Role::Text => IrKind::Text {
                text: node.props.text().unwrap_or_default().to_string(),
            },
            Role::Icon => {
                let bounds = node.bounds();
                IrKind::Icon {
                    size: bounds.width.max(bounds.height),
                }
            }
            Role::Image => {
                let paint = node.props.visible_fills().find(|p| p.is_image());
                IrKind::Image {
                    image_ref: paint.and_then(|p| p.image_ref.clone()),
                    scale_mode: paint.and_then(|p| p.scale_mode.clone()),
                }
            }
            Role::Button => self.button(node),
            Role::Card => IrKind::Card {
                layout: node.layout,
                children: self.recognize_children(node),
            },
            Role::Container | Role::Component | Role::Repeater => IrKind::Container {
                layout: node.layout,
                children: self.recognize_children(node),
            },
        };

        IrNode {
            id: node.props.id.clone(),
            name: node.props.name.clone(),
            style_ref: node.props.id.clone(),
            bounds: node.bounds(),
            kind,
        }
    }

    fn recognize_children(&self, node: &LayoutNode) -> Vec<IrNode> {
        node.children.iter().map(|c| self.recognize(c)).collect()
    }

    fn button(&self, node: &LayoutNode) -> IrKind {
        let label_node = first_text(node);
        let label = label_node.and_then(|n| n.props.text()).map(str::to_string);
        let label_id = label_node.map(|n| n.id());

        let has_other_children = node.children.iter().any(|c| Some(c.id()) != label_id);
        let children = if has_other_children {
            self.recognize_children(node)
        } else {
            Vec::new()
        };

        IrKind::Button {
            label,
            label_ref: label_id.map(str::to_string),
            variant: self.button_variant(node),
            children,
        }
    }

    fn button_variant(&self, node: &LayoutNode) -> ButtonVariant {
        let solid = node.props.visible_fills().find(|p| p.is_solid());
        match solid {
            None if node.props.has_visible_stroke() => ButtonVariant::Outline,
            Some(paint)
                if paint.effective_alpha() * node.props.opacity
                    < self.thresholds.ghost_max_opacity =>
            {
                ButtonVariant::Ghost
            }
            _ => ButtonVariant::Primary,
        }
    }
}

/// First text node in depth-first order, excluding `node` itself.
fn first_text(node: &LayoutNode) -> Option<&LayoutNode> {
    node.children.iter().find_map(|child| {
        if child.props.node_type == NodeType::Text && child.props.text().is_some() {
            Some(child)
        } else {
            first_text(child)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprout_core::{
        Bounds, Effect, LayoutMeta, NodeProps, Paint, RawColor, Vector,
    };

    fn layout(node_type: NodeType, bounds: Bounds, children: Vec<LayoutNode>) -> LayoutNode {
        let mut props = NodeProps::new("n", "Node", node_type);
        props.absolute_bounding_box = Some(bounds);
        LayoutNode {
            props,
            layout: LayoutMeta::default(),
            children,
        }
    }

    fn text(id: &str, value: &str) -> LayoutNode {
        let mut node = layout(NodeType::Text, Bounds::new(0.0, 0.0, 60.0, 20.0), Vec::new());
        node.props.id = id.to_string();
        node.props.characters = Some(value.to_string());
        node
    }

    fn blue() -> Paint {
        Paint::solid(RawColor { r: 0.23, g: 0.51, b: 0.96, a: 1.0 })
    }

    fn white() -> Paint {
        Paint::solid(RawColor { r: 1.0, g: 1.0, b: 1.0, a: 1.0 })
    }

    #[test]
    fn test_text_rule() {
        let recognizer = Recognizer::default();
        let node = recognizer.recognize(&text("t", "Hello"));
        assert_eq!(node.kind, IrKind::Text { text: "Hello".to_string() });
    }

    #[test]
    fn test_blank_text_is_container() {
        let recognizer = Recognizer::default();
        assert_eq!(recognizer.classify(&text("t", "  ")), Role::Container);
    }

    #[test]
    fn test_icon_rule() {
        let recognizer = Recognizer::default();
        let vector = layout(NodeType::Vector, Bounds::new(0.0, 0.0, 24.0, 24.0), Vec::new());
        assert_eq!(recognizer.classify(&vector), Role::Icon);

        let glyphs = layout(
            NodeType::Frame,
            Bounds::new(0.0, 0.0, 24.0, 24.0),
            vec![
                layout(NodeType::Vector, Bounds::new(2.0, 2.0, 20.0, 20.0), Vec::new()),
                layout(NodeType::BooleanOperation, Bounds::new(4.0, 4.0, 8.0, 8.0), Vec::new()),
            ],
        );
        assert_eq!(recognizer.classify(&glyphs), Role::Icon);

        let too_big = layout(NodeType::Vector, Bounds::new(0.0, 0.0, 64.0, 64.0), Vec::new());
        assert_eq!(recognizer.classify(&too_big), Role::Container);
    }

    #[test]
    fn test_image_rule() {
        let recognizer = Recognizer::default();
        let mut node = layout(NodeType::Rectangle, Bounds::new(0.0, 0.0, 320.0, 200.0), Vec::new());
        node.props.fills.push(Paint::image("hero"));

        let ir = recognizer.recognize(&node);
        assert_eq!(
            ir.kind,
            IrKind::Image { image_ref: Some("hero".to_string()), scale_mode: None }
        );
    }

    #[test]
    fn test_button_rule() {
        let recognizer = Recognizer::default();
        let mut node = layout(
            NodeType::Frame,
            Bounds::new(0.0, 0.0, 200.0, 48.0),
            vec![text("label", "Add to Cart")],
        );
        node.props.fills.push(blue());

        let ir = recognizer.recognize(&node);
        assert_eq!(
            ir.kind,
            IrKind::Button {
                label: Some("Add to Cart".to_string()),
                label_ref: Some("label".to_string()),
                variant: ButtonVariant::Primary,
                children: Vec::new(),
            }
        );
    }

    #[test]
    fn test_nested_label_button() {
        let recognizer = Recognizer::default();
        let mut icon = layout(NodeType::Vector, Bounds::new(16.0, 12.0, 24.0, 24.0), Vec::new());
        icon.props.id = "icon".to_string();
        let mut content = layout(
            NodeType::Frame,
            Bounds::new(16.0, 12.0, 168.0, 24.0),
            vec![icon, text("label", "Add to cart")],
        );
        content.props.id = "content".to_string();
        let mut node = layout(NodeType::Frame, Bounds::new(0.0, 0.0, 200.0, 48.0), vec![content]);
        node.props.fills.push(blue());

        let ir = recognizer.recognize(&node);
        match ir.kind {
            IrKind::Button { label, label_ref, children, .. } => {
                assert_eq!(label.as_deref(), Some("Add to cart"));
                assert_eq!(label_ref.as_deref(), Some("label"));
                assert_eq!(children.len(), 1);
                assert_eq!(children[0].id, "content");
            }
            other => panic!("expected button, got {:?}", other.role()),
        }
    }

    #[test]
    fn test_button_variants() {
        let recognizer = Recognizer::default();
        let base = layout(
            NodeType::Frame,
            Bounds::new(0.0, 0.0, 120.0, 40.0),
            vec![text("label", "Cancel")],
        );

        let mut outline = base.clone();
        outline.props.strokes.push(blue());
        outline.props.stroke_weight = Some(1.0);
        assert_eq!(recognizer.button_variant(&outline), ButtonVariant::Outline);
        assert_eq!(recognizer.classify(&outline), Role::Button);

        let mut ghost = base.clone();
        let mut faint = blue();
        faint.opacity = 0.1;
        ghost.props.fills.push(faint);
        assert_eq!(recognizer.button_variant(&ghost), ButtonVariant::Ghost);
    }

    #[test]
    fn test_square_icon_button() {
        let recognizer = Recognizer::default();
        let mut node = layout(
            NodeType::Frame,
            Bounds::new(0.0, 0.0, 56.0, 56.0),
            vec![layout(NodeType::Vector, Bounds::new(16.0, 16.0, 24.0, 24.0), Vec::new())],
        );
        node.props.fills.push(blue());

        let ir = recognizer.recognize(&node);
        match ir.kind {
            IrKind::Button { label, children, .. } => {
                assert_eq!(label, None);
                assert_eq!(children.len(), 1);
                assert_eq!(children[0].role(), Role::Icon);
            }
            other => panic!("expected button, got {:?}", other.role()),
        }
    }

    #[test]
    fn test_card_rule() {
        let recognizer = Recognizer::default();
        let mut node = layout(
            NodeType::Frame,
            Bounds::new(0.0, 0.0, 320.0, 120.0),
            vec![text("title", "Product")],
        );
        node.props.fills.push(white());
        node.props.corner_radius = Some(12.0);
        assert_eq!(recognizer.classify(&node), Role::Card);

        let mut flat = node.clone();
        flat.props.corner_radius = None;
        assert_eq!(recognizer.classify(&flat), Role::Container);

        flat.props.effects.push(Effect::drop_shadow(
            RawColor { r: 0.0, g: 0.0, b: 0.0, a: 0.1 },
            Vector { x: 0.0, y: 4.0 },
            12.0,
        ));
        assert_eq!(recognizer.classify(&flat), Role::Card);
    }

    #[test]
    fn test_thresholds_deserialize_with_defaults() {
        let thresholds: ClassifierThresholds =
            serde_json::from_str(r#"{ "card_min_size": 80 }"#).unwrap();
        assert_eq!(thresholds.card_min_size, 80.0);
        assert_eq!(thresholds.icon_max_size, 48.0);
    }
}
