//! Sprout compiles design-tool node trees into a semantic IR.
//!
//! The pipeline runs in fixed stages:
//!
//! 1. [`normalize`]: drop hidden, ignored and OS-chrome layers and collapse
//!    wrapper groups
//! 2. [`layout`]: attach a flex-like layout model to every node
//! 3. [`ir`]: classify roles and extract styles and design tokens
//! 4. [`detect`]: find lists, reusable components and interaction states
//! 5. [`tokens`]: map extracted tokens onto the project's token table
//!
//! [`analyze`] runs all of them for one screen.
//!
//! ```no_run
//! use sprout::{analyze, AnalyzeOptions, RawNode};
//!
//! let json = std::fs::read_to_string("screen.json").unwrap();
//! let root: RawNode = serde_json::from_str(&json).unwrap();
//! let analysis = analyze(&root, &AnalyzeOptions::default(), None).unwrap();
//! println!("{} lists", analysis.lists.len());
//! ```

pub use sprout_core::*;
pub use sprout_detect as detect;
pub use sprout_ir as ir;
pub use sprout_layout as layout;
pub use sprout_normalize as normalize;
pub use sprout_tokens as tokens;

pub use sprout_detect::{ComponentHint, DetectOptions, ListHint, SemanticState};
pub use sprout_ir::ClassifierThresholds;
pub use sprout_tokens::{MatchOptions, ProjectTokens, TokenMappings};

use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};

use sprout_detect::{apply_hints, detect_all_with};
use sprout_ir::ScreenCompiler;
use sprout_tokens::match_tokens_with;

/// Every knob of a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzeOptions {
    pub conventions: Conventions,
    pub thresholds: ClassifierThresholds,
    pub detect: DetectOptions,
    pub matching: MatchOptions,
}

/// Output of one screen analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub screen: ScreenIr,
    pub lists: Vec<ListHint>,
    pub components: Vec<ComponentHint>,
    pub states: Vec<SemanticState>,
    pub mappings: TokenMappings,
}

impl Analysis {
    /// The screen's IR with lists collapsed into repeaters and component
    /// instances marked.
    pub fn tree(&self) -> IrNode {
        apply_hints(&self.screen.root, &self.lists, &self.components)
    }
}

/// A configured pipeline, reusable across screens.
#[derive(Debug, Clone)]
pub struct Analyzer {
    compiler: ScreenCompiler,
    options: AnalyzeOptions,
}

impl Analyzer {
    pub fn new(options: AnalyzeOptions) -> Result<Self> {
        Ok(Self {
            compiler: ScreenCompiler::new(&options.conventions, options.thresholds.clone())?,
            options,
        })
    }

    pub fn options(&self) -> &AnalyzeOptions {
        &self.options
    }

    /// Analyze one screen. Without a project table every token passes
    /// through unmatched.
    pub fn analyze(&self, root: &RawNode, project: Option<&ProjectTokens>) -> Result<Analysis> {
        let _span = info_span!("analyze", screen = root.name()).entered();

        let screen = self.compiler.compile(root)?;
        let report = detect_all_with(&screen.root, &screen.styles, &self.options.detect);
        let empty = ProjectTokens::default();
        let mappings = match_tokens_with(
            &screen.styles.tokens,
            project.unwrap_or(&empty),
            &self.options.matching,
        );

        debug!(
            nodes = screen.root.node_count(),
            lists = report.lists.len(),
            components = report.components.len(),
            states = report.states.len(),
            "analysis complete"
        );
        Ok(Analysis {
            screen,
            lists: report.lists,
            components: report.components,
            states: report.states,
            mappings,
        })
    }

    /// Assemble `root_id` from a flat node table, then analyze it.
    pub fn analyze_arena(
        &self,
        arena: &RawArena,
        root_id: &str,
        project: Option<&ProjectTokens>,
    ) -> Result<Analysis> {
        let root = arena.assemble(root_id)?;
        self.analyze(&root, project)
    }
}

/// Analyze one screen with the given options.
pub fn analyze(
    root: &RawNode,
    options: &AnalyzeOptions,
    project: Option<&ProjectTokens>,
) -> Result<Analysis> {
    Analyzer::new(options.clone())?.analyze(root, project)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_partial_json() {
        let options: AnalyzeOptions = serde_json::from_str(
            r#"{
                "conventions": { "ignore_patterns": ["_*"] },
                "detect": { "min_list_items": 4 },
                "matching": { "color_threshold": 5.0 }
            }"#,
        )
        .unwrap();

        assert_eq!(options.conventions.ignore_patterns, vec!["_*"]);
        assert!(options.conventions.strip_os_chrome);
        assert_eq!(options.detect.min_list_items, 4);
        assert_eq!(options.matching.color_threshold, 5.0);
        assert_eq!(options.thresholds, ClassifierThresholds::default());
    }

    #[test]
    fn test_unknown_arena_root() {
        let analyzer = Analyzer::new(AnalyzeOptions::default()).unwrap();
        let err = analyzer
            .analyze_arena(&RawArena::new(), "0:1", None)
            .unwrap_err();
        assert!(matches!(
            err,
            SproutError::Input(InputError::UnknownRoot { .. })
        ));
    }
}
