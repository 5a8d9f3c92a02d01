//! Tree normalization.
//!
//! Turns a raw design tree into the tree later stages consume: hidden,
//! ignored and device-chrome nodes are dropped, then wrappers that carry no
//! styling of their own are collapsed.

pub mod filter;
pub mod unwrap;

pub use filter::{ChromeDetector, ChromeKind, FilterReason, IgnoreMatcher, NodeFilter};
pub use unwrap::{flatten_wrappers, is_useless_group, unwrap_useless_groups};

use serde::Serialize;
use tracing::debug;

use sprout_core::{Bounds, Conventions, ConventionsError, NodeProps, RawNode};

/// A node that survived filtering and simplification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedNode {
    #[serde(flatten)]
    pub props: NodeProps,
    pub children: Vec<NormalizedNode>,
}

impl NormalizedNode {
    pub fn id(&self) -> &str {
        &self.props.id
    }

    pub fn name(&self) -> &str {
        &self.props.name
    }

    /// Number of nodes in this subtree.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(NormalizedNode::node_count).sum::<usize>()
    }
}

/// A node removed during filtering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredNode {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub reason: FilterReason,
}

/// Normalized tree plus an account of what was removed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizeReport {
    pub root: Option<NormalizedNode>,
    pub filtered: Vec<FilteredNode>,
}

/// Normalizer configured for one set of conventions.
#[derive(Debug, Clone)]
pub struct Normalizer {
    filter: NodeFilter,
    flatten_groups: bool,
}

impl Normalizer {
    pub fn new(conventions: &Conventions) -> Result<Self, ConventionsError> {
        Ok(Self {
            filter: NodeFilter::new(conventions)?,
            flatten_groups: conventions.flatten_groups,
        })
    }

    /// Normalize a tree; `None` when the root itself is filtered out.
    pub fn normalize(&self, root: &RawNode) -> Option<NormalizedNode> {
        self.normalize_with_report(root).root
    }

    pub fn normalize_with_report(&self, root: &RawNode) -> NormalizeReport {
        let mut filtered = Vec::new();
        let screen = root.props.bounds();
        let kept = self.filter_node(root, screen.as_ref(), true, &mut filtered);

        let root = kept.map(|node| {
            let node = unwrap_useless_groups(node);
            if self.flatten_groups {
                flatten_wrappers(node)
            } else {
                node
            }
        });

        debug!(
            root_id = root.as_ref().map_or("", NormalizedNode::id),
            kept = root.as_ref().map_or(0, NormalizedNode::node_count),
            filtered = filtered.len(),
            "normalized tree"
        );

        NormalizeReport { root, filtered }
    }

    fn filter_node(
        &self,
        node: &RawNode,
        screen: Option<&Bounds>,
        is_root: bool,
        filtered: &mut Vec<FilteredNode>,
    ) -> Option<NormalizedNode> {
        if let Some(reason) = self.filter.reason(node, screen, is_root) {
            filtered.push(FilteredNode {
                id: node.id().to_string(),
                name: node.name().to_string(),
                reason,
            });
            return None;
        }

        let children = node
            .children
            .iter()
            .filter_map(|child| self.filter_node(child, screen, false, filtered))
            .collect();

        Some(NormalizedNode {
            props: node.props.clone(),
            children,
        })
    }
}

/// Normalize with default conventions and the given ignore patterns.
pub fn normalize(
    root: &RawNode,
    ignore_patterns: &[String],
) -> Result<Option<NormalizedNode>, ConventionsError> {
    let conventions = Conventions::default().with_ignore_patterns(ignore_patterns.iter().cloned());
    Ok(Normalizer::new(&conventions)?.normalize(root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprout_core::{NodeType, Paint, RawColor};

    fn screen() -> RawNode {
        RawNode::new("0", "Screen", NodeType::Frame)
            .with_bounds(0.0, 0.0, 390.0, 844.0)
            .with_fill(Paint::solid(RawColor { r: 1.0, g: 1.0, b: 1.0, a: 1.0 }))
    }

    #[test]
    fn test_hidden_and_ignored_nodes_removed() {
        let mut hidden = RawNode::new("2", "Secret", NodeType::Text).with_text("x");
        hidden.props.visible = false;
        let root = screen()
            .with_child(RawNode::new("1", "Title", NodeType::Text).with_text("Hi"))
            .with_child(hidden)
            .with_child(RawNode::new("3", "_note", NodeType::Text).with_text("todo"))
            .with_child(RawNode::new("4", "Body", NodeType::Text).with_text("Body"));

        let patterns = vec!["_*".to_string()];
        let result = normalize(&root, &patterns).unwrap().unwrap();
        let ids: Vec<&str> = result.children.iter().map(NormalizedNode::id).collect();
        assert_eq!(ids, vec!["1", "4"]);
    }

    #[test]
    fn test_filtered_root_is_none() {
        let mut root = screen();
        root.props.visible = false;
        assert_eq!(normalize(&root, &[]).unwrap(), None);
    }

    #[test]
    fn test_regex_syntax_in_pattern_is_literal() {
        let root = screen()
            .with_child(RawNode::new("1", "[draft]", NodeType::Text).with_text("x"))
            .with_child(RawNode::new("2", "d", NodeType::Text).with_text("y"));
        let patterns = vec!["[draft]".to_string(), "a{2".to_string()];
        let result = normalize(&root, &patterns).unwrap().unwrap();
        assert_eq!(result.children.len(), 1);
        assert_eq!(result.children[0].id(), "2");
    }

    #[test]
    fn test_report_records_reasons() {
        let mut hidden = RawNode::new("h", "Hidden", NodeType::Frame);
        hidden.props.visible = false;
        let root = screen()
            .with_child(hidden)
            .with_child(RawNode::new("s", "StatusBar", NodeType::Frame))
            .with_child(RawNode::circular_reference("0"))
            .with_child(RawNode::new("t", "Title", NodeType::Text).with_text("Hi"));

        let normalizer = Normalizer::new(&Conventions::default()).unwrap();
        let report = normalizer.normalize_with_report(&root);

        let reasons: Vec<&FilterReason> = report.filtered.iter().map(|f| &f.reason).collect();
        assert_eq!(
            reasons,
            vec![
                &FilterReason::Hidden,
                &FilterReason::OsChrome { kind: ChromeKind::StatusBar },
                &FilterReason::CircularReference,
            ]
        );
        assert_eq!(report.root.unwrap().children.len(), 1);
    }

    #[test]
    fn test_chrome_kept_when_stripping_disabled() {
        let root = screen()
            .with_child(RawNode::new("s", "Status Bar", NodeType::Frame))
            .with_child(RawNode::new("t", "Title", NodeType::Text).with_text("Hi"));
        let normalizer = Normalizer::new(&Conventions::default().without_os_chrome_stripping()).unwrap();
        assert_eq!(normalizer.normalize(&root).unwrap().children.len(), 2);
    }

    #[test]
    fn test_filter_precedes_unwrap() {
        // Once the hidden sibling is gone the group has a single child and
        // collapses.
        let mut hidden = RawNode::new("h", "Hidden", NodeType::Text).with_text("x");
        hidden.props.visible = false;
        let group = RawNode::new("g", "Wrapper", NodeType::Frame)
            .with_child(RawNode::new("t", "Title", NodeType::Text).with_text("Hi"))
            .with_child(hidden);
        let root = screen()
            .with_child(group)
            .with_child(RawNode::new("b", "Body", NodeType::Text).with_text("Body"));

        let result = normalize(&root, &[]).unwrap().unwrap();
        assert_eq!(result.children[0].id(), "t");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let root = screen().with_child(
            RawNode::new("g", "Group", NodeType::Group)
                .with_child(RawNode::new("a", "A", NodeType::Text).with_text("A"))
                .with_child(RawNode::new("b", "B", NodeType::Text).with_text("B")),
        );
        let normalizer = Normalizer::new(&Conventions::default()).unwrap();
        let once = normalizer.normalize(&root).unwrap();

        let as_raw = to_raw(&once);
        let twice = normalizer.normalize(&as_raw).unwrap();
        assert_eq!(once, twice);
    }

    fn to_raw(node: &NormalizedNode) -> RawNode {
        RawNode {
            props: node.props.clone(),
            children: node.children.iter().map(to_raw).collect(),
        }
    }
}
