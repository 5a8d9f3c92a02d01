//! Caller-supplied naming and filtering conventions.
//!
//! Conventions are a plain value passed into each run; there is no global
//! default state. [`Conventions::default`] documents the built-in policy.

use serde::{Deserialize, Serialize};

/// Filtering and normalization conventions for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conventions {
    /// Glob-like layer-name patterns to exclude (`*` and `?`, case-insensitive).
    pub ignore_patterns: Vec<String>,
    /// Strip device status bars and home indicators.
    pub strip_os_chrome: bool,
    /// Layer names treated as a status bar (compared case-insensitively,
    /// ignoring spaces, dashes and underscores).
    pub status_bar_names: Vec<String>,
    /// Layer names treated as a home indicator.
    pub home_indicator_names: Vec<String>,
    /// Tallest strip at the top edge that still counts as a status bar.
    pub status_bar_max_height: f64,
    /// Tallest pill at the bottom edge that still counts as a home indicator.
    pub home_indicator_max_height: f64,
    /// Widest pill that still counts as a home indicator.
    pub home_indicator_max_width: f64,
    /// Largest gap between a home indicator and the bottom screen edge.
    pub home_indicator_bottom_inset: f64,
    /// Distance from a screen edge that still counts as touching it.
    pub edge_tolerance: f64,
    /// Promote children of visual-free GROUP nodes into their parent.
    pub flatten_groups: bool,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            ignore_patterns: Vec::new(),
            strip_os_chrome: true,
            status_bar_names: vec!["statusbar".to_string(), "statusbariphone".to_string()],
            home_indicator_names: vec!["homeindicator".to_string(), "homebar".to_string()],
            status_bar_max_height: 54.0,
            home_indicator_max_height: 10.0,
            home_indicator_max_width: 160.0,
            home_indicator_bottom_inset: 12.0,
            edge_tolerance: 4.0,
            flatten_groups: true,
        }
    }
}

impl Conventions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the ignore patterns.
    pub fn with_ignore_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn without_os_chrome_stripping(mut self) -> Self {
        self.strip_os_chrome = false;
        self
    }
}

/// Fold a layer name for convention comparison: lowercase with spaces,
/// dashes and underscores removed.
pub fn fold_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_name() {
        assert_eq!(fold_name("Status Bar"), "statusbar");
        assert_eq!(fold_name("home_indicator"), "homeindicator");
        assert_eq!(fold_name("Status-Bar / iPhone"), "statusbar/iphone");
    }

    #[test]
    fn test_deserialize_partial_conventions() {
        let conventions: Conventions =
            serde_json::from_str(r#"{ "ignore_patterns": ["_*"] }"#).unwrap();
        assert_eq!(conventions.ignore_patterns, vec!["_*".to_string()]);
        assert!(conventions.strip_os_chrome);
        assert_eq!(conventions.status_bar_max_height, 54.0);
    }
}
