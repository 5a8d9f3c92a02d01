//! Core types for the Sprout design compiler.
//!
//! This crate provides the foundational types shared by every pipeline stage:
//! - The raw design-tool node schema and a guarded arena for untrusted input
//! - Geometry, color and LAB conversion helpers
//! - Layout metadata, the semantic IR and extracted styles/tokens
//! - Caller-supplied conventions
//! - Error types

pub mod arena;
pub mod color;
pub mod conventions;
pub mod errors;
pub mod ir;
pub mod layout;
pub mod node;
pub mod style;
pub mod types;

pub use arena::*;
pub use color::*;
pub use conventions::*;
pub use errors::*;
pub use ir::*;
pub use layout::*;
pub use node::*;
pub use style::*;
pub use types::*;
