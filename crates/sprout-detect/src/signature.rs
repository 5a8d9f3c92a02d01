//! Structural signatures and size similarity of IR subtrees.

use smallvec::SmallVec;

use sprout_core::{IrNode, Role};

/// Slack absorbing float error at the exact tolerance boundary.
pub const SIZE_EPSILON: f64 = 1e-9;

/// Shape of a node: its role and its children's roles, in order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub role: Role,
    pub children: SmallVec<[Role; 8]>,
}

impl Signature {
    pub fn of(node: &IrNode) -> Self {
        Self {
            role: node.role(),
            children: node.children().iter().map(IrNode::role).collect(),
        }
    }

    /// Whether the node has children of its own.
    pub fn is_composite(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Same role and, for composite nodes, the same number of children with
/// pairwise equal roles.
pub fn same_structure(a: &IrNode, b: &IrNode) -> bool {
    Signature::of(a) == Signature::of(b)
}

/// Width and height each within `tolerance` (relative to `reference`), with
/// an absolute floor so zero-sized nodes still compare. A difference of
/// exactly `tolerance` is still similar.
pub fn similar_size(reference: &IrNode, other: &IrNode, tolerance: f64, floor: f64) -> bool {
    let within =
        |a: f64, b: f64| (a - b).abs() <= (a.abs() * tolerance).max(floor) + SIZE_EPSILON;
    within(reference.bounds.width, other.bounds.width)
        && within(reference.bounds.height, other.bounds.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprout_core::{Bounds, IrKind, LayoutMeta};

    fn container(id: &str, width: f64, children: Vec<IrNode>) -> IrNode {
        IrNode {
            id: id.to_string(),
            name: id.to_string(),
            style_ref: id.to_string(),
            bounds: Bounds::new(0.0, 0.0, width, 100.0),
            kind: IrKind::Container {
                layout: LayoutMeta::default(),
                children,
            },
        }
    }

    fn text(id: &str) -> IrNode {
        IrNode {
            id: id.to_string(),
            name: id.to_string(),
            style_ref: id.to_string(),
            bounds: Bounds::new(0.0, 0.0, 50.0, 20.0),
            kind: IrKind::Text { text: id.to_string() },
        }
    }

    #[test]
    fn test_same_structure() {
        let a = container("a", 100.0, vec![text("a1"), text("a2")]);
        let b = container("b", 100.0, vec![text("b1"), text("b2")]);
        let c = container("c", 100.0, vec![text("c1")]);
        let d = container("d", 100.0, vec![text("d1"), container("d2", 10.0, Vec::new())]);

        assert!(same_structure(&a, &b));
        assert!(!same_structure(&a, &c));
        assert!(!same_structure(&a, &d));
        assert!(!same_structure(&a, &text("t")));
        assert!(Signature::of(&a).is_composite());
    }

    #[test]
    fn test_similar_size_boundary() {
        let reference = container("a", 100.0, Vec::new());
        assert!(similar_size(&reference, &container("b", 110.0, Vec::new()), 0.1, 1.0));
        assert!(!similar_size(&reference, &container("c", 111.0, Vec::new()), 0.1, 1.0));

        for (base, wider) in [(358.0, 393.8), (123.0, 135.3), (77.0, 84.7), (41.0, 45.1)] {
            let reference = container("a", base, Vec::new());
            assert!(similar_size(&reference, &container("b", wider, Vec::new()), 0.1, 1.0));
            assert!(!similar_size(&reference, &container("c", wider + 0.5, Vec::new()), 0.1, 1.0));
        }

        let zero = container("z", 0.0, Vec::new());
        assert!(similar_size(&zero, &container("z2", 0.5, Vec::new()), 0.1, 1.0));
    }
}
