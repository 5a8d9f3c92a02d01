//! Structural simplification of the filtered tree.

use sprout_core::{NodeType, OverflowDirection};

use crate::NormalizedNode;

/// Whether `node` is a wrapper that adds nothing but nesting.
pub fn is_useless_group(node: &NormalizedNode) -> bool {
    let props = &node.props;
    props.node_type.is_wrapper()
        && node.children.len() == 1
        && !props.has_visual_properties()
        && !props.has_auto_layout()
        && props.overflow_direction == OverflowDirection::None
}

/// Replace every useless group with its only child.
///
/// Children are processed first, so a chain of nested wrappers collapses in
/// a single pass. The surviving child keeps its own bounding box and only
/// inherits the wrapper's when it has none.
pub fn unwrap_useless_groups(node: NormalizedNode) -> NormalizedNode {
    let NormalizedNode { props, children } = node;
    let children: Vec<NormalizedNode> = children.into_iter().map(unwrap_useless_groups).collect();
    let node = NormalizedNode { props, children };

    if !is_useless_group(&node) {
        return node;
    }

    let NormalizedNode { props, mut children } = node;
    let mut child = children.remove(0);
    if child.props.absolute_bounding_box.is_none() {
        child.props.absolute_bounding_box = props.absolute_bounding_box;
    }
    child
}

/// Promote the children of visual-free GROUP nodes into their parent.
///
/// Only design-tool groups are dissolved; frames carry clipping and layout
/// semantics and stay in place.
pub fn flatten_wrappers(node: NormalizedNode) -> NormalizedNode {
    let NormalizedNode { props, children } = node;
    let mut flattened = Vec::with_capacity(children.len());
    for child in children.into_iter().map(flatten_wrappers) {
        if is_transparent_group(&child) {
            flattened.extend(child.children);
        } else {
            flattened.push(child);
        }
    }
    NormalizedNode {
        props,
        children: flattened,
    }
}

fn is_transparent_group(node: &NormalizedNode) -> bool {
    node.props.node_type == NodeType::Group
        && !node.children.is_empty()
        && !node.props.has_visual_properties()
}
