//! Color matching: exact, then perceptual (CIE76 in LAB), then a semantic
//! guess from luminance.

use tracing::warn;

use sprout_core::Color;

use crate::project::ProjectToken;
use crate::{closest, path_rank, MatchOptions, TokenMatch};

/// Path names tried, in order, for colors of a given luminance band.
const DARK_NAMES: &[&str] = &["text", "gray-900", "black"];
const LIGHT_NAMES: &[&str] = &["background", "white", "gray-50"];
const MEDIUM_DARK_NAMES: &[&str] = &["text.secondary", "text-secondary", "textSecondary"];

pub(crate) struct ColorMatcher<'a> {
    candidates: Vec<(&'a str, Color)>,
    options: &'a MatchOptions,
}

impl<'a> ColorMatcher<'a> {
    pub fn new(tokens: &'a [ProjectToken<String>], options: &'a MatchOptions) -> Self {
        let candidates = tokens
            .iter()
            .filter_map(|token| match Color::from_hex(&token.value) {
                Some(color) => Some((token.path.as_str(), color)),
                None => {
                    warn!(path = %token.path, value = %token.value, "ignoring malformed project color");
                    None
                }
            })
            .collect();
        Self { candidates, options }
    }

    pub fn match_color(&self, source: &str) -> TokenMatch {
        let Some(color) = Color::from_hex(source) else {
            warn!(value = source, "malformed source color left unmatched");
            return TokenMatch::unmatched(source);
        };

        let compatible: Vec<&(&str, Color)> = self
            .candidates
            .iter()
            .filter(|(_, token)| self.alpha_compatible(&color, token))
            .collect();

        let exact = closest(
            compatible
                .iter()
                .filter(|(_, token)| token.same_rgb(&color))
                .map(|(path, _)| (0.0, *path)),
        );
        if let Some((_, path)) = exact {
            return TokenMatch::exact(path);
        }

        let perceptual = closest(
            compatible
                .iter()
                .map(|(path, token)| (color.delta_e(token), *path))
                .filter(|(distance, _)| *distance <= self.options.color_threshold),
        );
        if let Some((_, path)) = perceptual {
            return TokenMatch::perceptual(path);
        }

        if self.options.semantic_fallback && color.is_solid() {
            if let Some(path) = self.semantic(&color) {
                return TokenMatch::semantic(path);
            }
        }

        TokenMatch::unmatched(source)
    }

    /// Solid colors only match solid tokens; translucent ones only match
    /// translucent tokens of similar alpha.
    fn alpha_compatible(&self, source: &Color, token: &Color) -> bool {
        match (source.is_solid(), token.is_solid()) {
            (true, true) => true,
            (false, false) => (source.alpha() - token.alpha()).abs() <= self.options.alpha_tolerance,
            _ => false,
        }
    }

    fn semantic(&self, color: &Color) -> Option<&'a str> {
        let luminance = color.relative_luminance();
        let names = if luminance < 0.05 {
            DARK_NAMES
        } else if luminance > 0.9 {
            LIGHT_NAMES
        } else if luminance <= 0.2 {
            MEDIUM_DARK_NAMES
        } else {
            return None;
        };

        names.iter().find_map(|name| {
            self.candidates
                .iter()
                .map(|(path, _)| *path)
                .filter(|path| names_path(path, name))
                .min_by(|a, b| path_rank(a).cmp(&path_rank(b)))
        })
    }
}

/// `path` is `name` or ends in `.name`. `-`, `_` and `/` count as `.`, so
/// `gray-900` also names `colors.gray.900`.
fn names_path(path: &str, name: &str) -> bool {
    let path = dotted(path);
    let name = dotted(name);
    path == name
        || path
            .strip_suffix(name.as_str())
            .map_or(false, |prefix| prefix.ends_with('.'))
}

fn dotted(segment: &str) -> String {
    segment.replace(['-', '_', '/'], ".")
}
