//! Identifier generation from layer names.

use std::hash::{Hash, Hasher};

use convert_case::{Case, Casing};
use rustc_hash::FxHasher;

/// Default layer names design tools assign; they say nothing about content.
const GENERIC_NAMES: &[&str] = &[
    "frame",
    "group",
    "rectangle",
    "ellipse",
    "vector",
    "component",
    "instance",
    "container",
    "layer",
    "item",
    "text",
    "autolayout",
];

/// Whether a layer name is a tool default such as `Frame 12` or `Group`.
pub fn is_generic_name(name: &str) -> bool {
    let folded: String = name
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect();
    folded.is_empty() || GENERIC_NAMES.contains(&folded.as_str())
}

/// Split on anything that is not a letter or digit.
fn words(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn valid_identifier(ident: &str) -> bool {
    ident.chars().next().map_or(false, char::is_alphabetic)
}

/// PascalCase identifier for a layer name, if it yields a usable one.
pub fn to_pascal_ident(name: &str) -> Option<String> {
    let ident = words(name).to_case(Case::Pascal);
    valid_identifier(&ident).then_some(ident)
}

/// camelCase identifier for a layer name, if it yields a usable one.
pub fn to_camel_ident(name: &str) -> Option<String> {
    let ident = words(name).to_case(Case::Camel);
    valid_identifier(&ident).then_some(ident)
}

/// Six uppercase hex digits derived from `id` with a fixed-seed hash.
pub fn short_hash(id: &str) -> String {
    let mut hasher = FxHasher::default();
    id.hash(&mut hasher);
    format!("{:06X}", hasher.finish() & 0xFF_FFFF)
}

/// Type name of a list item: the template's name with an `Item` suffix, or
/// `ListItem` plus a hash of its id when the name is generic.
pub fn item_type_name(template_name: &str, template_id: &str) -> String {
    if !is_generic_name(template_name) {
        if let Some(ident) = to_pascal_ident(template_name) {
            return if ident.ends_with("Item") {
                ident
            } else {
                format!("{ident}Item")
            };
        }
    }
    format!("ListItem{}", short_hash(template_id))
}

/// Hands out names that are unique within one run by appending a counter.
#[derive(Debug, Default)]
pub struct NameAllocator {
    taken: rustc_hash::FxHashSet<String>,
}

impl NameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, base: &str) -> String {
        if self.taken.insert(base.to_string()) {
            return base.to_string();
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}{n}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}
