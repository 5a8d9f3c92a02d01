//! Interaction state detection.
//!
//! Siblings that share structure but differ in a small set of style
//! properties are usually one component rendered in different states: a tab
//! bar with one selected tab, or a row of buttons in two variants. Only
//! style properties take part in the comparison; text never does.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use sprout_core::{Background, IrNode, StylesBundle};

use crate::signature::same_structure;
use crate::DetectOptions;

const BOOLEAN_CONFIDENCE: f64 = 0.9;
const VARIANT_CONFIDENCE: f64 = 0.7;

/// Property names that distinguish states.
const STATE_PROPERTIES: &[&str] = &["background", "color", "borderColor"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateType {
    Selected,
    Active,
    Disabled,
    Variant,
}

impl StateType {
    fn keyword(&self) -> &'static str {
        match self {
            Self::Selected => "selected",
            Self::Active => "active",
            Self::Disabled => "disabled",
            Self::Variant => "variant",
        }
    }

    /// Prop carrying the state on the generated component.
    pub fn prop_name(&self) -> &'static str {
        match self {
            Self::Selected => "isSelected",
            Self::Active => "isActive",
            Self::Disabled => "isDisabled",
            Self::Variant => "variant",
        }
    }
}

/// Value of a state prop for one instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateValue {
    Bool(bool),
    Text(String),
}

/// Style properties that change between the two states. Properties one state
/// lacks are recorded as `none`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateStyles {
    pub default: IndexMap<String, String>,
    pub variant: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticState {
    pub container_id: String,
    pub state_type: StateType,
    pub prop_name: String,
    /// Instance id to its state value, in sibling order.
    pub instance_states: IndexMap<String, StateValue>,
    pub state_styles: StateStyles,
    pub default_value: StateValue,
    pub confidence: f64,
}

/// One sibling under comparison with its flattened style properties. Keys
/// are dotted child-index paths, e.g. `background` or `0.1.color`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateInstance {
    pub id: String,
    pub name: String,
    pub properties: IndexMap<String, String>,
}

impl StateInstance {
    /// Collect the style properties of `node`'s subtree.
    pub fn from_node(node: &IrNode, styles: &StylesBundle) -> Self {
        let mut properties = IndexMap::new();
        collect_properties(node, styles, "", &mut properties);
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            properties,
        }
    }

    /// Sorted state-relevant properties joined into one comparable string.
    fn fingerprint(&self) -> String {
        let mut relevant: Vec<(&String, &String)> = self
            .properties
            .iter()
            .filter(|(key, _)| is_state_property(key))
            .collect();
        relevant.sort();
        relevant
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(";")
    }
}

fn is_state_property(key: &str) -> bool {
    let last = key.rsplit('.').next().unwrap_or(key);
    STATE_PROPERTIES.contains(&last)
}

fn collect_properties(
    node: &IrNode,
    styles: &StylesBundle,
    prefix: &str,
    out: &mut IndexMap<String, String>,
) {
    if let Some(style) = styles.get(&node.style_ref) {
        if let Some(background) = &style.background {
            out.insert(format!("{prefix}background"), background_value(background));
        }
        if let Some(color) = style.typography.as_ref().and_then(|t| t.color.as_ref()) {
            out.insert(format!("{prefix}color"), color.clone());
        }
        if let Some(border) = &style.border {
            out.insert(format!("{prefix}borderColor"), border.color.clone());
        }
    }
    for (index, child) in node.children().iter().enumerate() {
        collect_properties(child, styles, &format!("{prefix}{index}."), out);
    }
}

fn background_value(background: &Background) -> String {
    match background {
        Background::Solid { color } => color.clone(),
        Background::Gradient { kind, stops } => {
            let stops: Vec<String> = stops
                .iter()
                .map(|s| format!("{} {}", s.color, s.position))
                .collect();
            let kind = format!("{kind:?}").to_lowercase();
            format!("{kind}-gradient({})", stops.join(", "))
        }
        Background::Image { image_ref, .. } => {
            format!("image({})", image_ref.as_deref().unwrap_or(""))
        }
    }
}

/// Classify a set of sibling instances as a boolean state, a two-way
/// variant, or nothing.
///
/// The returned state has an empty `container_id`; callers that know the
/// parent fill it in.
pub fn detect_state(instances: &[StateInstance]) -> Option<SemanticState> {
    if instances.len() < 2 {
        return None;
    }

    let mut groups: IndexMap<String, Vec<&StateInstance>> = IndexMap::new();
    for instance in instances {
        groups.entry(instance.fingerprint()).or_default().push(instance);
    }
    if groups.len() != 2 {
        return None;
    }
    let first = &groups[0];
    let second = &groups[1];

    let (majority, minority) = if first.len() >= second.len() {
        (first, second)
    } else {
        (second, first)
    };

    if minority.len() == 1 && majority.len() >= 2 {
        let state_type = boolean_state_type(instances, minority[0]);
        let instance_states = instances
            .iter()
            .map(|i| (i.id.clone(), StateValue::Bool(i.id == minority[0].id)))
            .collect();
        return Some(SemanticState {
            container_id: String::new(),
            state_type,
            prop_name: state_type.prop_name().to_string(),
            instance_states,
            state_styles: state_styles(majority[0], minority[0]),
            default_value: StateValue::Bool(false),
            confidence: BOOLEAN_CONFIDENCE,
        });
    }

    if majority.len() - minority.len() <= 1 {
        let instance_states = instances
            .iter()
            .map(|i| {
                let value = if majority.iter().any(|m| m.id == i.id) {
                    "primary"
                } else {
                    "secondary"
                };
                (i.id.clone(), StateValue::Text(value.to_string()))
            })
            .collect();
        return Some(SemanticState {
            container_id: String::new(),
            state_type: StateType::Variant,
            prop_name: StateType::Variant.prop_name().to_string(),
            instance_states,
            state_styles: state_styles(majority[0], minority[0]),
            default_value: StateValue::Text("primary".to_string()),
            confidence: VARIANT_CONFIDENCE,
        });
    }

    None
}

/// The state keyword named by the odd instance, else by any sibling.
fn boolean_state_type(instances: &[StateInstance], odd: &StateInstance) -> StateType {
    let named = |name: &str| {
        let folded = name.to_lowercase();
        [StateType::Selected, StateType::Active, StateType::Disabled]
            .into_iter()
            .find(|t| folded.contains(t.keyword()))
    };
    named(&odd.name)
        .or_else(|| instances.iter().find_map(|i| named(&i.name)))
        .unwrap_or(StateType::Selected)
}

fn state_styles(default: &StateInstance, variant: &StateInstance) -> StateStyles {
    let mut keys: Vec<&String> = default
        .properties
        .keys()
        .chain(variant.properties.keys())
        .filter(|key| is_state_property(key))
        .collect();
    keys.sort();
    keys.dedup();

    let mut styles = StateStyles::default();
    for key in keys {
        let a = default.properties.get(key).map_or("none", String::as_str);
        let b = variant.properties.get(key).map_or("none", String::as_str);
        if a != b {
            styles.default.insert(key.clone(), a.to_string());
            styles.variant.insert(key.clone(), b.to_string());
        }
    }
    styles
}

pub fn detect_states(root: &IrNode, styles: &StylesBundle) -> Vec<SemanticState> {
    detect_states_with(root, styles, &DetectOptions::default())
}

/// Look for states among the children of every node whose children share
/// one structure.
pub fn detect_states_with(
    root: &IrNode,
    styles: &StylesBundle,
    options: &DetectOptions,
) -> Vec<SemanticState> {
    let mut states = Vec::new();
    walk(root, styles, options, &mut states);
    states
}

fn walk(
    node: &IrNode,
    styles: &StylesBundle,
    options: &DetectOptions,
    out: &mut Vec<SemanticState>,
) {
    let children = node.children();
    if children.len() >= options.min_state_instances.max(2)
        && children.iter().all(|c| same_structure(&children[0], c))
    {
        let instances: Vec<StateInstance> = children
            .iter()
            .map(|c| StateInstance::from_node(c, styles))
            .collect();
        if let Some(mut state) = detect_state(&instances) {
            trace!(container = %node.id, state = ?state.state_type, "state detected");
            state.container_id = node.id.clone();
            out.push(state);
        }
    }
    for child in children {
        walk(child, styles, options, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprout_core::{Bounds, ExtractedStyle, IrKind, LayoutMeta, Typography};

    fn instance(id: &str, name: &str, background: &str) -> StateInstance {
        let mut properties = IndexMap::new();
        properties.insert("background".to_string(), background.to_string());
        properties.insert("0.color".to_string(), "#111827".to_string());
        StateInstance {
            id: id.to_string(),
            name: name.to_string(),
            properties,
        }
    }

    #[test]
    fn test_one_of_five_is_boolean() {
        let mut instances: Vec<StateInstance> = (0..5)
            .map(|i| instance(&format!("t{i}"), "Tab", "#FFFFFF"))
            .collect();
        instances[2] = instance("t2", "Tab Selected", "#3B82F6");

        let state = detect_state(&instances).unwrap();
        assert_eq!(state.state_type, StateType::Selected);
        assert_eq!(state.prop_name, "isSelected");
        assert_eq!(state.confidence, 0.9);
        assert_eq!(state.default_value, StateValue::Bool(false));
        assert_eq!(state.instance_states["t2"], StateValue::Bool(true));
        assert_eq!(state.instance_states["t0"], StateValue::Bool(false));
        assert_eq!(state.state_styles.default["background"], "#FFFFFF");
        assert_eq!(state.state_styles.variant["background"], "#3B82F6");
        assert!(!state.state_styles.default.contains_key("0.color"));
    }

    #[test]
    fn test_keyword_from_names() {
        let instances = vec![
            instance("a", "Item", "#FFFFFF"),
            instance("b", "Item", "#FFFFFF"),
            instance("c", "Item/Disabled", "#E5E7EB"),
        ];
        let state = detect_state(&instances).unwrap();
        assert_eq!(state.state_type, StateType::Disabled);
        assert_eq!(state.prop_name, "isDisabled");
    }

    #[test]
    fn test_three_against_two_is_variant() {
        let instances = vec![
            instance("a", "Button", "#3B82F6"),
            instance("b", "Button", "#3B82F6"),
            instance("c", "Button", "#FFFFFF"),
            instance("d", "Button", "#3B82F6"),
            instance("e", "Button", "#FFFFFF"),
        ];
        let state = detect_state(&instances).unwrap();
        assert_eq!(state.state_type, StateType::Variant);
        assert_eq!(state.prop_name, "variant");
        assert_eq!(state.confidence, 0.7);
        assert_eq!(state.default_value, StateValue::Text("primary".to_string()));
        assert_eq!(state.instance_states["a"], StateValue::Text("primary".to_string()));
        assert_eq!(state.instance_states["c"], StateValue::Text("secondary".to_string()));
    }

    #[test]
    fn test_three_fingerprints_is_none() {
        let instances = vec![
            instance("a", "Chip", "#111111"),
            instance("b", "Chip", "#222222"),
            instance("c", "Chip", "#333333"),
            instance("d", "Chip", "#333333"),
            instance("e", "Chip", "#333333"),
        ];
        assert!(detect_state(&instances).is_none());
    }

    #[test]
    fn test_uniform_or_lopsided_is_none() {
        let same: Vec<StateInstance> = (0..3)
            .map(|i| instance(&format!("s{i}"), "Tab", "#FFFFFF"))
            .collect();
        assert!(detect_state(&same).is_none());

        let mut lopsided: Vec<StateInstance> = (0..6)
            .map(|i| instance(&format!("l{i}"), "Tab", "#FFFFFF"))
            .collect();
        lopsided[0] = instance("l0", "Tab", "#000000");
        lopsided[1] = instance("l1", "Tab", "#000000");
        assert!(detect_state(&lopsided).is_none());

        assert!(detect_state(&same[..1]).is_none());
    }

    #[test]
    fn test_text_content_is_ignored() {
        let mut a = instance("a", "Tab", "#FFFFFF");
        a.properties.insert("0.text".to_string(), "Home".to_string());
        let mut b = instance("b", "Tab", "#FFFFFF");
        b.properties.insert("0.text".to_string(), "Search".to_string());
        assert!(detect_state(&[a, b]).is_none());
    }

    fn tab(id: &str, name: &str) -> IrNode {
        IrNode {
            id: id.to_string(),
            name: name.to_string(),
            style_ref: id.to_string(),
            bounds: Bounds::ZERO,
            kind: IrKind::Container {
                layout: LayoutMeta::default(),
                children: vec![IrNode {
                    id: format!("{id}-label"),
                    name: "Label".to_string(),
                    style_ref: format!("{id}-label"),
                    bounds: Bounds::ZERO,
                    kind: IrKind::Text { text: id.to_string() },
                }],
            },
        }
    }

    fn style(background: &str, text_color: Option<&str>) -> ExtractedStyle {
        ExtractedStyle {
            background: Some(Background::Solid {
                color: background.to_string(),
            }),
            typography: text_color.map(|color| Typography {
                family: "Inter".to_string(),
                size: 14.0,
                weight: 500,
                line_height: None,
                letter_spacing: None,
                color: Some(color.to_string()),
                align: None,
                italic: false,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_detect_states_from_styles() {
        let mut bar = IrNode::empty("bar", "Tab Bar");
        let mut bundle = StylesBundle::default();
        if let IrKind::Container { children, .. } = &mut bar.kind {
            for (i, name) in ["Tab", "Tab Active", "Tab"].iter().enumerate() {
                let id = format!("t{i}");
                let active = i == 1;
                bundle
                    .styles
                    .insert(id.clone(), style(if active { "#3B82F6" } else { "#FFFFFF" }, None));
                bundle.styles.insert(
                    format!("{id}-label"),
                    style("#00000000", Some(if active { "#FFFFFF" } else { "#111827" })),
                );
                children.push(tab(&id, name));
            }
        }

        let states = detect_states(&bar, &bundle);
        assert_eq!(states.len(), 1);
        let state = &states[0];
        assert_eq!(state.container_id, "bar");
        assert_eq!(state.state_type, StateType::Active);
        assert_eq!(state.instance_states["t1"], StateValue::Bool(true));
        assert_eq!(
            state.state_styles.variant.keys().collect::<Vec<_>>(),
            vec!["0.color", "background"]
        );
    }
}
