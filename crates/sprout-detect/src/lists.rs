//! Repeated-item list detection.

use serde::{Deserialize, Serialize};

use sprout_core::{Axis, IrNode, Orientation, Overflow};

use crate::naming::item_type_name;
use crate::signature::{same_structure, similar_size};
use crate::DetectOptions;

/// A container whose children are items of one list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListHint {
    pub container_id: String,
    /// Item ids in source order.
    pub item_ids: Vec<String>,
    pub orientation: Orientation,
    pub item_type: String,
}

/// Find lists with default options.
pub fn detect_lists(root: &IrNode) -> Vec<ListHint> {
    detect_lists_with(root, &DetectOptions::default())
}

/// Find every list in the tree. A matched list is not searched further, so
/// list items are never reported as lists of their own.
pub fn detect_lists_with(root: &IrNode, options: &DetectOptions) -> Vec<ListHint> {
    let mut hints = Vec::new();
    walk(root, options, &mut hints);
    hints
}

fn walk(node: &IrNode, options: &DetectOptions, hints: &mut Vec<ListHint>) {
    if let Some(hint) = list_hint(node, options) {
        hints.push(hint);
        return;
    }
    for child in node.children() {
        walk(child, options, hints);
    }
}

fn list_hint(node: &IrNode, options: &DetectOptions) -> Option<ListHint> {
    let layout = node.layout()?;
    let children = node.children();
    let (template, rest) = children.split_first()?;

    let candidate = layout.is_scrollable() || children.len() >= options.min_list_items;
    if !candidate {
        return None;
    }
    let uniform = rest.iter().all(|item| {
        same_structure(template, item)
            && similar_size(template, item, options.size_tolerance, options.size_floor)
    });
    if !uniform {
        return None;
    }

    let orientation = match layout.axis {
        Axis::Row => Orientation::Horizontal,
        Axis::Column if children.len() < 2 && layout.overflow == Some(Overflow::Horizontal) => {
            Orientation::Horizontal
        }
        Axis::Column => Orientation::Vertical,
        Axis::Stack => rest
            .first()
            .map_or(Orientation::Vertical, |second| dominant_orientation(template, second)),
    };

    Some(ListHint {
        container_id: node.id.clone(),
        item_ids: children.iter().map(|c| c.id.clone()).collect(),
        orientation,
        item_type: item_type_name(&template.name, &template.id),
    })
}

fn dominant_orientation(first: &IrNode, second: &IrNode) -> Orientation {
    let dx = (second.bounds.x - first.bounds.x).abs();
    let dy = (second.bounds.y - first.bounds.y).abs();
    if dx > dy {
        Orientation::Horizontal
    } else {
        Orientation::Vertical
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprout_core::{Bounds, IrKind, LayoutMeta};

    fn text(id: &str, y: f64) -> IrNode {
        IrNode {
            id: id.to_string(),
            name: "Label".to_string(),
            style_ref: id.to_string(),
            bounds: Bounds::new(0.0, y, 100.0, 20.0),
            kind: IrKind::Text { text: id.to_string() },
        }
    }

    fn row(id: &str, y: f64, height: f64) -> IrNode {
        IrNode {
            id: id.to_string(),
            name: "ProductRow".to_string(),
            style_ref: id.to_string(),
            bounds: Bounds::new(0.0, y, 300.0, height),
            kind: IrKind::Container {
                layout: LayoutMeta::default(),
                children: vec![text(&format!("{id}-a"), y), text(&format!("{id}-b"), y + 24.0)],
            },
        }
    }

    fn list(id: &str, layout: LayoutMeta, children: Vec<IrNode>) -> IrNode {
        IrNode {
            id: id.to_string(),
            name: "List".to_string(),
            style_ref: id.to_string(),
            bounds: Bounds::new(0.0, 0.0, 300.0, 600.0),
            kind: IrKind::Container { layout, children },
        }
    }

    #[test]
    fn test_three_items_make_a_list() {
        let node = list(
            "l",
            LayoutMeta::default(),
            vec![row("r1", 0.0, 60.0), row("r2", 70.0, 60.0), row("r3", 140.0, 60.0)],
        );
        let hints = detect_lists(&node);
        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].container_id, "l");
        assert_eq!(hints[0].item_ids, vec!["r1", "r2", "r3"]);
        assert_eq!(hints[0].orientation, Orientation::Vertical);
        assert_eq!(hints[0].item_type, "ProductRowItem");
    }

    #[test]
    fn test_two_items_are_not_a_list() {
        let node = list("l", LayoutMeta::default(), vec![row("r1", 0.0, 60.0), row("r2", 70.0, 60.0)]);
        assert!(detect_lists(&node).is_empty());
    }

    #[test]
    fn test_scrollable_single_item() {
        let layout = LayoutMeta {
            overflow: Some(Overflow::Horizontal),
            ..Default::default()
        };
        let node = list("l", layout, vec![row("r1", 0.0, 60.0)]);
        let hints = detect_lists(&node);
        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].orientation, Orientation::Horizontal);
    }

    #[test]
    fn test_size_tolerance() {
        let within = list(
            "l",
            LayoutMeta::default(),
            vec![row("r1", 0.0, 100.0), row("r2", 110.0, 110.0), row("r3", 230.0, 95.0)],
        );
        assert_eq!(detect_lists(&within).len(), 1);

        let beyond = list(
            "l",
            LayoutMeta::default(),
            vec![row("r1", 0.0, 100.0), row("r2", 110.0, 111.0), row("r3", 230.0, 100.0)],
        );
        assert!(detect_lists(&beyond).is_empty());
    }

    #[test]
    fn test_size_tolerance_boundary_with_fractional_heights() {
        for (base, wider) in [(358.0, 393.8), (123.0, 135.3), (333.0, 366.3)] {
            let node = list(
                "l",
                LayoutMeta::default(),
                vec![
                    row("r1", 0.0, base),
                    row("r2", base + 10.0, wider),
                    row("r3", base + wider + 20.0, base),
                ],
            );
            assert_eq!(detect_lists(&node).len(), 1, "{base} vs {wider}");
        }
    }

    #[test]
    fn test_items_not_reanalyzed() {
        // Each row holds three identical labels; only the outer list counts.
        let mut rows = Vec::new();
        for i in 0..3 {
            let y = i as f64 * 100.0;
            let labels = (0..3).map(|j| text(&format!("r{i}-{j}"), y + j as f64 * 24.0)).collect();
            rows.push(list(&format!("r{i}"), LayoutMeta::default(), labels));
        }
        let node = list("outer", LayoutMeta::default(), rows);

        let hints = detect_lists(&node);
        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].container_id, "outer");
    }

    #[test]
    fn test_nested_independent_lists() {
        let inner_a = list(
            "a",
            LayoutMeta::default(),
            vec![row("a1", 0.0, 60.0), row("a2", 70.0, 60.0), row("a3", 140.0, 60.0)],
        );
        let inner_b = list(
            "b",
            LayoutMeta { axis: Axis::Row, ..Default::default() },
            (0..4).map(|i| text(&format!("b{i}"), 0.0)).collect(),
        );
        let root = list("root", LayoutMeta::default(), vec![inner_a, inner_b]);

        let hints = detect_lists(&root);
        let ids: Vec<&str> = hints.iter().map(|h| h.container_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(hints[1].orientation, Orientation::Horizontal);
    }
}
