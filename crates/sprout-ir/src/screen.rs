//! The screen pipeline: raw tree in, IR and styles out.

use tracing::{debug, debug_span};

use sprout_core::{Conventions, InputError, RawNode, Result, ScreenIr};
use sprout_layout::add_layout;
use sprout_normalize::Normalizer;

use crate::recognize::{ClassifierThresholds, Recognizer};
use crate::styles::{collect_props, extract_styles};

/// Compiles raw screens with fixed conventions and thresholds.
#[derive(Debug, Clone)]
pub struct ScreenCompiler {
    normalizer: Normalizer,
    recognizer: Recognizer,
}

impl ScreenCompiler {
    pub fn new(conventions: &Conventions, thresholds: ClassifierThresholds) -> Result<Self> {
        Ok(Self {
            normalizer: Normalizer::new(conventions)?,
            recognizer: Recognizer::new(thresholds),
        })
    }

    /// Normalize, lay out, classify and extract styles for one screen.
    ///
    /// A root that is filtered out entirely yields an empty screen.
    pub fn compile(&self, root: &RawNode) -> Result<ScreenIr> {
        if root.id().is_empty() {
            return Err(InputError::MissingId {
                name: root.name().to_string(),
            }
            .into());
        }

        let _span = debug_span!("compile_screen", screen_id = root.id()).entered();

        let Some(normalized) = self.normalizer.normalize(root) else {
            debug!("screen root filtered out");
            return Ok(ScreenIr::empty(root.id(), root.name()));
        };

        let layout = add_layout(&normalized);
        let ir = self.recognizer.recognize(&layout);
        let styles = extract_styles(&ir, &collect_props(&layout));

        debug!(nodes = ir.node_count(), "compiled screen");
        Ok(ScreenIr {
            id: root.id().to_string(),
            name: root.name().to_string(),
            root: ir,
            styles,
        })
    }
}

/// Compile a screen with default classifier thresholds.
pub fn compile_screen(root: &RawNode, conventions: &Conventions) -> Result<ScreenIr> {
    ScreenCompiler::new(conventions, ClassifierThresholds::default())?.compile(root)
}
