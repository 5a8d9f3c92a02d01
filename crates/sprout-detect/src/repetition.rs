//! Extractable component detection.
//!
//! Sibling subtrees that share a structural signature are instances of one
//! component. The text that differs between instances becomes the
//! component's props.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use sprout_core::IrNode;

use crate::naming::{is_generic_name, to_camel_ident, to_pascal_ident, NameAllocator};
use crate::signature::Signature;
use crate::DetectOptions;

/// A group of sibling subtrees that can be emitted as one component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentHint {
    pub component_name: String,
    pub instance_ids: Vec<String>,
    /// Prop name to one value per instance, in `instance_ids` order.
    pub props_variations: IndexMap<String, Vec<String>>,
}

impl ComponentHint {
    /// Props of one instance, by its position in `instance_ids`.
    pub fn props_for(&self, index: usize) -> IndexMap<String, String> {
        self.props_variations
            .iter()
            .filter_map(|(name, values)| values.get(index).map(|v| (name.clone(), v.clone())))
            .collect()
    }
}

pub fn detect_components(root: &IrNode) -> Vec<ComponentHint> {
    detect_components_with(root, &DetectOptions::default())
}

/// Find repeated sibling subtrees, in first-seen order.
pub fn detect_components_with(root: &IrNode, options: &DetectOptions) -> Vec<ComponentHint> {
    let mut names = NameAllocator::new();
    let mut hints = Vec::new();
    walk(root, options, &mut names, &mut hints);
    hints
}

fn walk(
    node: &IrNode,
    options: &DetectOptions,
    names: &mut NameAllocator,
    hints: &mut Vec<ComponentHint>,
) {
    let mut groups: IndexMap<Signature, Vec<&IrNode>> = IndexMap::new();
    for child in node.children() {
        let signature = Signature::of(child);
        if signature.is_composite() {
            groups.entry(signature).or_default().push(child);
        }
    }

    let mut instances: Vec<&str> = Vec::new();
    for group in groups.values() {
        if group.len() < options.min_component_instances {
            continue;
        }
        instances.extend(group.iter().map(|n| n.id.as_str()));
        hints.push(component_hint(group, names));
    }

    // Instances are analyzed once, as a group; only recurse into the rest.
    for child in node.children() {
        if !instances.contains(&child.id.as_str()) {
            walk(child, options, names, hints);
        }
    }
}

fn component_hint(group: &[&IrNode], names: &mut NameAllocator) -> ComponentHint {
    let first = group[0];
    let base = if is_generic_name(&first.name) {
        None
    } else {
        to_pascal_ident(&first.name)
    };
    let component_name = names.allocate(base.as_deref().unwrap_or("Component"));

    ComponentHint {
        component_name,
        instance_ids: group.iter().map(|n| n.id.clone()).collect(),
        props_variations: props_variations(group),
    }
}

/// Text carried by a subtree, depth first, with the layer name it came from.
fn texts(node: &IrNode) -> Vec<(&str, &str)> {
    let mut out = Vec::new();
    node.visit(&mut |n| {
        if let Some(value) = n.text_value() {
            out.push((n.name.as_str(), value));
        }
    });
    out
}

fn props_variations(group: &[&IrNode]) -> IndexMap<String, Vec<String>> {
    let per_instance: Vec<Vec<(&str, &str)>> = group.iter().map(|n| texts(n)).collect();
    let slots = per_instance.iter().map(Vec::len).min().unwrap_or(0);

    let mut props = IndexMap::new();
    let mut names = NameAllocator::new();
    for slot in 0..slots {
        let values: Vec<String> = per_instance.iter().map(|t| t[slot].1.to_string()).collect();
        if values.iter().all(|v| *v == values[0]) {
            continue;
        }

        let (layer, first_value) = per_instance[0][slot];
        let base = if layer == first_value || is_generic_name(layer) {
            None
        } else {
            to_camel_ident(layer)
        };
        let name = match base {
            Some(base) => names.allocate(&base),
            None => names.allocate(&format!("text{}", props.len() + 1)),
        };
        props.insert(name, values);
    }
    props
}
