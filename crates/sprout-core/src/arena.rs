//! Guarded assembly of externally sourced node tables.
//!
//! Design-tool APIs can hand back nodes as a flat table whose children are
//! id references. Such data is untrusted: it may contain cycles, shared
//! subtrees or pathological depth. [`RawArena::assemble`] threads a visited-id
//! set through the walk and emits a [`NodeType::CircularReference`] sentinel
//! instead of revisiting a node, so the resulting [`RawNode`] tree is always
//! finite.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::InputError;
use crate::node::{NodeProps, NodeType, RawNode};

/// Deepest branch assembled before the walk is cut off with a sentinel.
pub const MAX_TREE_DEPTH: usize = 512;

/// A node whose children are referenced by id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FlatNode {
    #[serde(flatten)]
    pub props: NodeProps,
    #[serde(default)]
    pub children: Vec<String>,
}

impl FlatNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            props: NodeProps::new(id, name, node_type),
            children: Vec::new(),
        }
    }

    pub fn with_children<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children.extend(ids.into_iter().map(Into::into));
        self
    }
}

/// Id-indexed table of flat nodes.
#[derive(Debug, Clone, Default)]
pub struct RawArena {
    nodes: IndexMap<String, FlatNode>,
}

impl RawArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an arena, rejecting nodes without ids and duplicate ids.
    pub fn from_nodes(nodes: impl IntoIterator<Item = FlatNode>) -> Result<Self, InputError> {
        let mut arena = Self::new();
        for node in nodes {
            arena.insert(node)?;
        }
        Ok(arena)
    }

    pub fn insert(&mut self, node: FlatNode) -> Result<(), InputError> {
        if node.props.id.is_empty() {
            return Err(InputError::MissingId {
                name: node.props.name.clone(),
            });
        }
        if self.nodes.contains_key(&node.props.id) {
            return Err(InputError::DuplicateId {
                id: node.props.id.clone(),
            });
        }
        self.nodes.insert(node.props.id.clone(), node);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&FlatNode> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Assemble the tree rooted at `root_id`.
    ///
    /// Each node is materialized at most once; a second reference to it
    /// (a cycle or a shared subtree) becomes a sentinel, as does any branch
    /// deeper than [`MAX_TREE_DEPTH`]. Dangling child ids are dropped.
    pub fn assemble(&self, root_id: &str) -> Result<RawNode, InputError> {
        if !self.nodes.contains_key(root_id) {
            return Err(InputError::UnknownRoot {
                id: root_id.to_string(),
            });
        }
        let mut visited = HashSet::new();
        Ok(self.build(root_id, &mut visited, 0))
    }

    fn build(&self, id: &str, visited: &mut HashSet<String>, depth: usize) -> RawNode {
        if depth > MAX_TREE_DEPTH || !visited.insert(id.to_string()) {
            warn!(node_id = id, depth, "circular or over-deep node reference");
            return RawNode::circular_reference(id);
        }

        let Some(flat) = self.nodes.get(id) else {
            return RawNode::circular_reference(id);
        };

        let children = flat
            .children
            .iter()
            .filter(|child_id| {
                let known = self.nodes.contains_key(child_id.as_str());
                if !known {
                    warn!(node_id = id, child_id = child_id.as_str(), "dangling child reference");
                }
                known
            })
            .map(|child_id| self.build(child_id, visited, depth + 1))
            .collect();

        RawNode {
            props: flat.props.clone(),
            children,
        }
    }
}
