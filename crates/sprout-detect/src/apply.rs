//! Rewriting an IR tree with detected lists and components.

use rustc_hash::FxHashMap;

use sprout_core::{Bounds, IrKind, IrNode};

use crate::lists::ListHint;
use crate::repetition::ComponentHint;

struct Hints<'a> {
    lists: FxHashMap<&'a str, &'a ListHint>,
    instances: FxHashMap<&'a str, (&'a ComponentHint, usize)>,
}

/// Build a new tree in which every list container holds a single
/// [`IrKind::Repeater`] (templated on its first item, whose style it shares)
/// and every component
/// instance is an [`IrKind::Component`] carrying its own props.
///
/// Hints naming ids that are not in the tree are ignored.
pub fn apply_hints(root: &IrNode, lists: &[ListHint], components: &[ComponentHint]) -> IrNode {
    let hints = Hints {
        lists: lists.iter().map(|h| (h.container_id.as_str(), h)).collect(),
        instances: components
            .iter()
            .flat_map(|hint| {
                hint.instance_ids
                    .iter()
                    .enumerate()
                    .map(move |(index, id)| (id.as_str(), (hint, index)))
            })
            .collect(),
    };
    rewrite(root, &hints)
}

fn rewrite(node: &IrNode, hints: &Hints<'_>) -> IrNode {
    let children = match hints.lists.get(node.id.as_str()) {
        Some(list) => repeater(node, list, hints).into_iter().collect(),
        None => node.children().iter().map(|c| rewrite(c, hints)).collect(),
    };

    let kind = match hints.instances.get(node.id.as_str()) {
        Some((component, index)) => IrKind::Component {
            name: component.component_name.clone(),
            props: component.props_for(*index),
            children,
        },
        None => with_children(&node.kind, children),
    };

    IrNode {
        id: node.id.clone(),
        name: node.name.clone(),
        style_ref: node.style_ref.clone(),
        bounds: node.bounds,
        kind,
    }
}

fn repeater(container: &IrNode, list: &ListHint, hints: &Hints<'_>) -> Option<IrNode> {
    let items = container.children();
    let template = items.first()?;
    // The repeater has no source node; it is styled like its template item.
    Some(IrNode {
        id: format!("{}/items", container.id),
        style_ref: template.style_ref.clone(),
        name: list.item_type.clone(),
        bounds: union(items.iter().map(|i| i.bounds)),
        kind: IrKind::Repeater {
            item_type: list.item_type.clone(),
            orientation: list.orientation,
            item_ids: list.item_ids.clone(),
            template: Box::new(rewrite(template, hints)),
        },
    })
}

/// Same role and payload with the children replaced.
fn with_children(kind: &IrKind, children: Vec<IrNode>) -> IrKind {
    match kind {
        IrKind::Container { layout, .. } => IrKind::Container {
            layout: *layout,
            children,
        },
        IrKind::Card { layout, .. } => IrKind::Card {
            layout: *layout,
            children,
        },
        IrKind::Button {
            label,
            label_ref,
            variant,
            ..
        } => IrKind::Button {
            label: label.clone(),
            label_ref: label_ref.clone(),
            variant: *variant,
            children,
        },
        IrKind::Component { name, props, .. } => IrKind::Component {
            name: name.clone(),
            props: props.clone(),
            children,
        },
        IrKind::Repeater {
            item_type,
            orientation,
            item_ids,
            template,
        } => IrKind::Repeater {
            item_type: item_type.clone(),
            orientation: *orientation,
            item_ids: item_ids.clone(),
            template: Box::new(children.into_iter().next().unwrap_or_else(|| (**template).clone())),
        },
        IrKind::Text { .. } | IrKind::Image { .. } | IrKind::Icon { .. } => kind.clone(),
    }
}

fn union(mut bounds: impl Iterator<Item = Bounds>) -> Bounds {
    let Some(first) = bounds.next() else {
        return Bounds::ZERO;
    };
    let (mut left, mut top, mut right, mut bottom) = (first.x, first.y, first.right(), first.bottom());
    for b in bounds {
        left = left.min(b.x);
        top = top.min(b.y);
        right = right.max(b.right());
        bottom = bottom.max(b.bottom());
    }
    Bounds::new(left, top, right - left, bottom - top)
}
