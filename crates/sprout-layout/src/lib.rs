//! Layout classification.
//!
//! Attaches a flex-like [`LayoutMeta`] to every node of a normalized tree.
//! Declared auto-layout is trusted as-is; everything else is inferred from
//! the children's bounding boxes.

pub mod explicit;
pub mod infer;

pub use explicit::{explicit_layout, overflow, sizing_modes};
pub use infer::{detect_axis, detect_cross_align, detect_gap, detect_padding, infer_layout};

use serde::Serialize;
use tracing::trace;

use sprout_core::{Bounds, LayoutMeta, NodeProps};
use sprout_normalize::NormalizedNode;

/// A normalized node with its layout model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutNode {
    #[serde(flatten)]
    pub props: NodeProps,
    pub layout: LayoutMeta,
    pub children: Vec<LayoutNode>,
}

impl LayoutNode {
    pub fn id(&self) -> &str {
        &self.props.id
    }

    pub fn name(&self) -> &str {
        &self.props.name
    }

    pub fn bounds(&self) -> Bounds {
        self.props.bounds().unwrap_or(Bounds::ZERO)
    }
}

/// Classify the layout of every node in the tree.
pub fn add_layout(node: &NormalizedNode) -> LayoutNode {
    let children: Vec<LayoutNode> = node.children.iter().map(add_layout).collect();
    let layout = layout_for(&node.props, &node.children);
    trace!(node_id = node.id(), axis = ?layout.axis, source = ?layout.source, "layout");

    LayoutNode {
        props: node.props.clone(),
        layout,
        children,
    }
}

fn layout_for(props: &NodeProps, children: &[NormalizedNode]) -> LayoutMeta {
    if let Some(layout) = explicit_layout(props) {
        return layout;
    }
    let positioned: Vec<Bounds> = children.iter().filter_map(|c| c.props.bounds()).collect();
    infer_layout(props, &positioned)
}
