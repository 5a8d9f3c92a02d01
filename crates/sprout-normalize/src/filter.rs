//! Node exclusion rules: visibility, ignore patterns and OS chrome.

use regex::Regex;
use serde::Serialize;

use sprout_core::{fold_name, Bounds, ConventionsError, Conventions, NodeType, RawNode};

/// Kind of device chrome recognized on a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChromeKind {
    StatusBar,
    HomeIndicator,
}

/// Why a node was excluded from the normalized tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub enum FilterReason {
    Hidden,
    PatternMatch { pattern: String },
    OsChrome { kind: ChromeKind },
    CircularReference,
}

/// Compiled glob-like layer-name patterns.
#[derive(Debug, Clone, Default)]
pub struct IgnoreMatcher {
    patterns: Vec<(String, Regex)>,
}

impl IgnoreMatcher {
    pub fn new(patterns: &[String]) -> Result<Self, ConventionsError> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                Regex::new(&glob_to_regex(pattern))
                    .map(|re| (pattern.clone(), re))
                    .map_err(|e| ConventionsError::InvalidPattern {
                        pattern: pattern.clone(),
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// First pattern matching the whole name.
    pub fn matching(&self, name: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|(_, re)| re.is_match(name))
            .map(|(pattern, _)| pattern.as_str())
    }
}

/// `*` matches any run, `?` one character; everything else is literal.
fn glob_to_regex(pattern: &str) -> String {
    let mut re = String::from("(?i)^");
    for c in pattern.chars() {
        match c {
            '*' => re.push_str(".*"),
            '?' => re.push('.'),
            _ => re.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    re.push('$');
    re
}

/// Status bar / home indicator heuristics.
#[derive(Debug, Clone)]
pub struct ChromeDetector {
    status_bar_names: Vec<String>,
    home_indicator_names: Vec<String>,
    status_bar_max_height: f64,
    home_indicator_max_height: f64,
    home_indicator_max_width: f64,
    home_indicator_bottom_inset: f64,
    edge_tolerance: f64,
    clock: Regex,
}

impl ChromeDetector {
    pub fn new(conventions: &Conventions) -> Result<Self, ConventionsError> {
        let clock = Regex::new(r"^\d{1,2}:\d{2}$").map_err(|e| ConventionsError::InvalidPattern {
            pattern: "clock".to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            status_bar_names: conventions.status_bar_names.iter().map(|n| fold_name(n)).collect(),
            home_indicator_names: conventions
                .home_indicator_names
                .iter()
                .map(|n| fold_name(n))
                .collect(),
            status_bar_max_height: conventions.status_bar_max_height,
            home_indicator_max_height: conventions.home_indicator_max_height,
            home_indicator_max_width: conventions.home_indicator_max_width,
            home_indicator_bottom_inset: conventions.home_indicator_bottom_inset,
            edge_tolerance: conventions.edge_tolerance,
            clock,
        })
    }

    /// Classify a node as device chrome by name, or by where it sits on the
    /// screen.
    pub fn detect(&self, node: &RawNode, screen: Option<&Bounds>) -> Option<ChromeKind> {
        let folded = fold_name(node.name());
        if self.status_bar_names.iter().any(|n| folded.starts_with(n.as_str())) {
            return Some(ChromeKind::StatusBar);
        }
        if self.home_indicator_names.iter().any(|n| folded.starts_with(n.as_str())) {
            return Some(ChromeKind::HomeIndicator);
        }

        let (Some(screen), Some(bounds)) = (screen, node.props.bounds()) else {
            return None;
        };
        if self.is_status_bar_strip(node, &bounds, screen) {
            return Some(ChromeKind::StatusBar);
        }
        if self.is_home_indicator_pill(&bounds, screen) {
            return Some(ChromeKind::HomeIndicator);
        }
        None
    }

    fn is_status_bar_strip(&self, node: &RawNode, bounds: &Bounds, screen: &Bounds) -> bool {
        (bounds.y - screen.y).abs() <= self.edge_tolerance
            && bounds.width >= screen.width * 0.9
            && bounds.height <= self.status_bar_max_height
            && self.shows_clock(node)
    }

    fn is_home_indicator_pill(&self, bounds: &Bounds, screen: &Bounds) -> bool {
        let inset = screen.bottom() - bounds.bottom();
        inset >= -self.edge_tolerance
            && inset <= self.home_indicator_bottom_inset
            && (bounds.center_x() - screen.center_x()).abs() <= self.edge_tolerance
            && bounds.height <= self.home_indicator_max_height
            && bounds.width <= self.home_indicator_max_width
            && bounds.width >= bounds.height * 3.0
    }

    fn shows_clock(&self, node: &RawNode) -> bool {
        if let Some(text) = node.props.text() {
            if self.clock.is_match(text) {
                return true;
            }
        }
        node.children.iter().any(|child| self.shows_clock(child))
    }
}

/// Combined exclusion policy for one run.
#[derive(Debug, Clone)]
pub struct NodeFilter {
    ignore: IgnoreMatcher,
    chrome: Option<ChromeDetector>,
}

impl NodeFilter {
    pub fn new(conventions: &Conventions) -> Result<Self, ConventionsError> {
        let chrome = if conventions.strip_os_chrome {
            Some(ChromeDetector::new(conventions)?)
        } else {
            None
        };
        Ok(Self {
            ignore: IgnoreMatcher::new(&conventions.ignore_patterns)?,
            chrome,
        })
    }

    /// Reason to exclude `node`, if any. The screen root is never treated as
    /// chrome.
    pub fn reason(&self, node: &RawNode, screen: Option<&Bounds>, is_root: bool) -> Option<FilterReason> {
        if node.props.node_type == NodeType::CircularReference {
            return Some(FilterReason::CircularReference);
        }
        if !node.props.visible {
            return Some(FilterReason::Hidden);
        }
        if let Some(pattern) = self.ignore.matching(node.name()) {
            return Some(FilterReason::PatternMatch {
                pattern: pattern.to_string(),
            });
        }
        if is_root {
            return None;
        }
        self.chrome
            .as_ref()
            .and_then(|chrome| chrome.detect(node, screen))
            .map(|kind| FilterReason::OsChrome { kind })
    }
}
