//! Pattern detection over the semantic IR.
//!
//! Detectors are read-only passes that report hints; [`apply`] turns list
//! and component hints into a rewritten tree.
//!
//! - [`lists`]: containers whose children are items of one list
//! - [`repetition`]: sibling subtrees that can become one component
//! - [`state`]: sibling instances that differ only in interaction state

pub mod apply;
pub mod lists;
pub mod naming;
pub mod repetition;
pub mod signature;
pub mod state;

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

use sprout_core::{IrNode, StylesBundle};

pub use apply::apply_hints;
pub use lists::{detect_lists, detect_lists_with, ListHint};
pub use repetition::{detect_components, detect_components_with, ComponentHint};
pub use signature::{same_structure, similar_size, Signature};
pub use state::{
    detect_state, detect_states, detect_states_with, SemanticState, StateInstance, StateStyles,
    StateType, StateValue,
};

/// Detector thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectOptions {
    /// Children a non-scrolling container needs to count as a list.
    pub min_list_items: usize,
    /// Relative width/height difference allowed between list items.
    pub size_tolerance: f64,
    /// Absolute size difference always allowed, in pixels.
    pub size_floor: f64,
    pub min_component_instances: usize,
    pub min_state_instances: usize,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            min_list_items: 3,
            size_tolerance: 0.1,
            size_floor: 1.0,
            min_component_instances: 2,
            min_state_instances: 2,
        }
    }
}

/// Everything the detectors found on one screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionReport {
    pub lists: Vec<ListHint>,
    pub components: Vec<ComponentHint>,
    pub states: Vec<SemanticState>,
}

impl DetectionReport {
    /// The IR tree with this report's lists and components applied.
    pub fn apply(&self, root: &IrNode) -> IrNode {
        apply_hints(root, &self.lists, &self.components)
    }
}

pub fn detect_all(root: &IrNode, styles: &StylesBundle) -> DetectionReport {
    detect_all_with(root, styles, &DetectOptions::default())
}

/// Run every detector over one screen.
pub fn detect_all_with(
    root: &IrNode,
    styles: &StylesBundle,
    options: &DetectOptions,
) -> DetectionReport {
    let _span = debug_span!("detect", root = %root.id).entered();

    let report = DetectionReport {
        lists: detect_lists_with(root, options),
        components: detect_components_with(root, options),
        states: detect_states_with(root, styles, options),
    };
    debug!(
        lists = report.lists.len(),
        components = report.components.len(),
        states = report.states.len(),
        "detection complete"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: DetectOptions = serde_json::from_str(r#"{"min_list_items": 4}"#).unwrap();
        assert_eq!(options.min_list_items, 4);
        assert_eq!(options.size_tolerance, 0.1);
        assert_eq!(options.min_component_instances, 2);
    }

    #[test]
    fn test_empty_tree_reports_nothing() {
        let root = IrNode::empty("0:1", "Blank");
        let report = detect_all(&root, &StylesBundle::default());
        assert_eq!(report, DetectionReport::default());
        assert_eq!(report.apply(&root), root);
    }
}
