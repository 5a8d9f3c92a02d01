//! Semantic intermediate representation.
//!
//! Every design node is classified into exactly one [`IrKind`]. The set of
//! roles is closed so that style extraction, detection and emission all have
//! to handle every role explicitly.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::layout::LayoutMeta;
use crate::style::StylesBundle;
use crate::types::Bounds;

/// Discriminant of an [`IrKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Container,
    Text,
    Image,
    Button,
    Card,
    Icon,
    Component,
    Repeater,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Container => "container",
            Self::Text => "text",
            Self::Image => "image",
            Self::Button => "button",
            Self::Card => "card",
            Self::Icon => "icon",
            Self::Component => "component",
            Self::Repeater => "repeater",
        }
    }
}

/// Visual variant of a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonVariant {
    #[default]
    Primary,
    Outline,
    Ghost,
}

/// Direction in which repeated items flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    #[default]
    Vertical,
}

/// Role-specific payload of an IR node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum IrKind {
    Container {
        layout: LayoutMeta,
        children: Vec<IrNode>,
    },
    Text {
        text: String,
    },
    Image {
        image_ref: Option<String>,
        scale_mode: Option<String>,
    },
    Button {
        label: Option<String>,
        /// Id of the text node the label was read from.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label_ref: Option<String>,
        variant: ButtonVariant,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<IrNode>,
    },
    Card {
        layout: LayoutMeta,
        children: Vec<IrNode>,
    },
    Icon {
        size: f64,
    },
    Component {
        name: String,
        props: IndexMap<String, String>,
        children: Vec<IrNode>,
    },
    Repeater {
        item_type: String,
        orientation: Orientation,
        item_ids: Vec<String>,
        template: Box<IrNode>,
    },
}

impl IrKind {
    pub fn role(&self) -> Role {
        match self {
            Self::Container { .. } => Role::Container,
            Self::Text { .. } => Role::Text,
            Self::Image { .. } => Role::Image,
            Self::Button { .. } => Role::Button,
            Self::Card { .. } => Role::Card,
            Self::Icon { .. } => Role::Icon,
            Self::Component { .. } => Role::Component,
            Self::Repeater { .. } => Role::Repeater,
        }
    }
}

/// A classified node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrNode {
    pub id: String,
    pub name: String,
    /// Join key into [`StylesBundle::styles`].
    pub style_ref: String,
    pub bounds: Bounds,
    #[serde(flatten)]
    pub kind: IrKind,
}

impl IrNode {
    /// An empty container with zeroed geometry.
    pub fn empty(id: impl Into<String>, name: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            style_ref: id.clone(),
            id,
            name: name.into(),
            bounds: Bounds::ZERO,
            kind: IrKind::Container {
                layout: LayoutMeta::default(),
                children: Vec::new(),
            },
        }
    }

    pub fn role(&self) -> Role {
        self.kind.role()
    }

    /// Child nodes; a repeater exposes its template.
    pub fn children(&self) -> &[IrNode] {
        match &self.kind {
            IrKind::Container { children, .. }
            | IrKind::Card { children, .. }
            | IrKind::Button { children, .. }
            | IrKind::Component { children, .. } => children,
            IrKind::Repeater { template, .. } => std::slice::from_ref(template.as_ref()),
            IrKind::Text { .. } | IrKind::Image { .. } | IrKind::Icon { .. } => &[],
        }
    }

    pub fn layout(&self) -> Option<&LayoutMeta> {
        match &self.kind {
            IrKind::Container { layout, .. } | IrKind::Card { layout, .. } => Some(layout),
            _ => None,
        }
    }

    /// Text carried by the node itself (text content or button label).
    pub fn text_value(&self) -> Option<&str> {
        match &self.kind {
            IrKind::Text { text } => Some(text),
            IrKind::Button { label, .. } => label.as_deref(),
            _ => None,
        }
    }

    /// Visit this node and all descendants in pre-order.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a IrNode)) {
        f(self);
        for child in self.children() {
            child.visit(f);
        }
    }

    /// Number of nodes in this subtree.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.visit(&mut |_| count += 1);
        count
    }
}

/// A compiled screen: the IR tree and its styles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenIr {
    pub id: String,
    pub name: String,
    pub root: IrNode,
    pub styles: StylesBundle,
}

impl ScreenIr {
    /// A well-formed screen with nothing on it.
    pub fn empty(id: impl Into<String>, name: impl Into<String>) -> Self {
        let id = id.into();
        let name = name.into();
        Self {
            root: IrNode::empty(id.clone(), name.clone()),
            id,
            name,
            styles: StylesBundle::default(),
        }
    }
}
