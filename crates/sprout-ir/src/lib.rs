//! Semantic IR construction.
//!
//! This crate turns a layout tree into the semantic IR:
//! - [`recognize`]: ordered role rules (text, icon, image, button, card,
//!   container)
//! - [`styles`]: per-node style extraction and token collection
//! - [`screen`]: the end-to-end screen pipeline

pub mod recognize;
pub mod screen;
pub mod styles;

pub use recognize::{ClassifierThresholds, Recognizer, Rule, RULES};
pub use screen::{compile_screen, ScreenCompiler};
pub use styles::{collect_props, extract_styles};
