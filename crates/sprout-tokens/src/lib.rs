//! Mapping of a screen's design tokens onto a project's token table.
//!
//! Every extracted value is resolved to a project token path or passed
//! through unchanged, and each result records how it was matched.

pub mod colors;
pub mod numeric;
pub mod project;
pub mod typography;
pub mod value;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

use sprout_core::DesignTokens;

pub use project::{FlatImport, ProjectToken, ProjectTokens, SkippedEntry};
pub use typography::typography_key;

use colors::ColorMatcher;

/// Scores closer than this count as a tie.
const TIE_EPSILON: f64 = 1e-3;

/// How a value was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Exact,
    Perceptual,
    Fuzzy,
    Semantic,
    Unmatched,
}

/// A project token path, or the original value when nothing matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMatch {
    pub value: String,
    pub kind: MatchKind,
}

impl TokenMatch {
    fn new(value: impl Into<String>, kind: MatchKind) -> Self {
        Self {
            value: value.into(),
            kind,
        }
    }

    pub fn exact(path: impl Into<String>) -> Self {
        Self::new(path, MatchKind::Exact)
    }

    pub fn perceptual(path: impl Into<String>) -> Self {
        Self::new(path, MatchKind::Perceptual)
    }

    pub fn fuzzy(path: impl Into<String>) -> Self {
        Self::new(path, MatchKind::Fuzzy)
    }

    pub fn semantic(path: impl Into<String>) -> Self {
        Self::new(path, MatchKind::Semantic)
    }

    pub fn unmatched(original: impl Into<String>) -> Self {
        Self::new(original, MatchKind::Unmatched)
    }

    pub fn is_matched(&self) -> bool {
        self.kind != MatchKind::Unmatched
    }
}

/// Matching tolerances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    /// Largest CIE76 distance for a perceptual color match.
    pub color_threshold: f64,
    /// Largest alpha difference between translucent colors.
    pub alpha_tolerance: f64,
    /// Relative tolerance for spacing.
    pub spacing_tolerance: f64,
    /// Relative tolerance for corner radii.
    pub radius_tolerance: f64,
    /// Absolute tolerance always allowed for spacing and radii, in pixels.
    pub min_px_tolerance: f64,
    pub font_size_tolerance: f64,
    pub line_height_tolerance: f64,
    /// Guess text/background colors from luminance when nothing else matches.
    pub semantic_fallback: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            color_threshold: 8.0,
            alpha_tolerance: 0.1,
            spacing_tolerance: 0.2,
            radius_tolerance: 0.15,
            min_px_tolerance: 2.0,
            font_size_tolerance: 1.0,
            line_height_tolerance: 2.0,
            semantic_fallback: true,
        }
    }
}

/// Resolution of every token of a screen, keyed like [`DesignTokens`]
/// (colors by their hex value).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenMappings {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub colors: IndexMap<String, TokenMatch>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub spacing: IndexMap<String, TokenMatch>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub radii: IndexMap<String, TokenMatch>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub typography: IndexMap<String, TokenMatch>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub shadows: IndexMap<String, TokenMatch>,
}

/// Matched and unmatched counts of one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub matched: usize,
    pub unmatched: usize,
}

impl CategorySummary {
    fn of(matches: &IndexMap<String, TokenMatch>) -> Self {
        let matched = matches.values().filter(|m| m.is_matched()).count();
        Self {
            matched,
            unmatched: matches.len() - matched,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingSummary {
    pub colors: CategorySummary,
    pub spacing: CategorySummary,
    pub radii: CategorySummary,
    pub typography: CategorySummary,
    pub shadows: CategorySummary,
}

impl MappingSummary {
    pub fn total(&self) -> CategorySummary {
        [self.colors, self.spacing, self.radii, self.typography, self.shadows]
            .into_iter()
            .fold(CategorySummary::default(), |acc, c| CategorySummary {
                matched: acc.matched + c.matched,
                unmatched: acc.unmatched + c.unmatched,
            })
    }
}

impl TokenMappings {
    pub fn summary(&self) -> MappingSummary {
        MappingSummary {
            colors: CategorySummary::of(&self.colors),
            spacing: CategorySummary::of(&self.spacing),
            radii: CategorySummary::of(&self.radii),
            typography: CategorySummary::of(&self.typography),
            shadows: CategorySummary::of(&self.shadows),
        }
    }

    /// Resolved value for a source color.
    pub fn color(&self, hex: &str) -> Option<&TokenMatch> {
        self.colors.get(hex)
    }
}

pub fn match_tokens(tokens: &DesignTokens, project: &ProjectTokens) -> TokenMappings {
    match_tokens_with(tokens, project, &MatchOptions::default())
}

/// Resolve every design token against the project table.
pub fn match_tokens_with(
    tokens: &DesignTokens,
    project: &ProjectTokens,
    options: &MatchOptions,
) -> TokenMappings {
    let _span = debug_span!("match_tokens", project_tokens = project.len()).entered();

    let colors = ColorMatcher::new(&project.colors, options);
    let mappings = TokenMappings {
        colors: tokens
            .colors
            .values()
            .map(|hex| (hex.clone(), colors.match_color(hex)))
            .collect(),
        spacing: tokens
            .spacing
            .iter()
            .map(|(key, value)| {
                (key.clone(), numeric::match_spacing(*value, &project.spacing, options))
            })
            .collect(),
        radii: tokens
            .radii
            .iter()
            .map(|(key, value)| (key.clone(), numeric::match_radius(*value, &project.radii, options)))
            .collect(),
        typography: tokens
            .typography
            .iter()
            .map(|(key, token)| {
                (
                    key.clone(),
                    typography::match_typography(token, &project.typography, options),
                )
            })
            .collect(),
        shadows: tokens
            .shadows
            .iter()
            .map(|(key, token)| (key.clone(), typography::match_shadow(token, &project.shadows)))
            .collect(),
    };

    let total = mappings.summary().total();
    debug!(
        matched = total.matched,
        unmatched = total.unmatched,
        "token matching complete"
    );
    mappings
}

/// Ordering of project paths by simplicity: fewer segments, then shorter,
/// then alphabetical.
pub(crate) fn path_rank(path: &str) -> (usize, usize, &str) {
    (path.split(['.', '/']).count(), path.len(), path)
}

/// Lowest-scoring path; near-equal scores go to the simpler path.
pub(crate) fn closest<'a>(
    scored: impl IntoIterator<Item = (f64, &'a str)>,
) -> Option<(f64, &'a str)> {
    scored.into_iter().fold(None, |best, (score, path)| match best {
        None => Some((score, path)),
        Some((best_score, best_path)) => {
            let better = score < best_score - TIE_EPSILON
                || ((score - best_score).abs() <= TIE_EPSILON
                    && path_rank(path) < path_rank(best_path));
            if better {
                Some((score, path))
            } else {
                best
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn design_tokens() -> DesignTokens {
        let mut tokens = DesignTokens::new();
        tokens.add_color("#3B82F6");
        tokens.add_spacing(16.0);
        tokens.add_spacing(40.0);
        tokens
    }

    fn project() -> ProjectTokens {
        ProjectTokens::new()
            .with_color("theme.colors.primary", "#3B82F6")
            .with_spacing("spacing.md", 16.0)
    }

    #[test]
    fn test_mapping_snapshot() {
        let mappings = match_tokens(&design_tokens(), &project());
        insta::assert_json_snapshot!(mappings, @r###"
        {
          "colors": {
            "#3B82F6": {
              "value": "theme.colors.primary",
              "kind": "exact"
            }
          },
          "spacing": {
            "16": {
              "value": "spacing.md",
              "kind": "exact"
            },
            "40": {
              "value": "40",
              "kind": "unmatched"
            }
          }
        }
        "###);
    }

    #[test]
    fn test_summary() {
        let summary = match_tokens(&design_tokens(), &project()).summary();
        assert_eq!(summary.colors, CategorySummary { matched: 1, unmatched: 0 });
        assert_eq!(summary.spacing, CategorySummary { matched: 1, unmatched: 1 });
        assert_eq!(summary.total(), CategorySummary { matched: 2, unmatched: 1 });
    }

    #[test]
    fn test_empty_project_passes_everything_through() {
        let mappings = match_tokens(&design_tokens(), &ProjectTokens::default());
        assert_eq!(mappings.color("#3B82F6"), Some(&TokenMatch::unmatched("#3B82F6")));
        assert!(mappings.spacing.values().all(|m| !m.is_matched()));
    }

    #[test]
    fn test_closest_tie_break() {
        let best = closest([(1.0, "theme.space.md"), (1.0005, "space.md"), (0.5, "z.a.b.c")]);
        assert_eq!(best, Some((0.5, "z.a.b.c")));

        let tie = closest([(1.0, "theme.space.md"), (1.0005, "space.md"), (1.0, "space.mx")]);
        assert_eq!(tie.map(|(_, p)| p), Some("space.md"));
    }
}
