//! Spacing and corner radius matching.

use sprout_core::format_number;

use crate::project::ProjectToken;
use crate::{closest, MatchOptions, TokenMatch};

/// Radii at or above this are treated as "fully rounded".
const FULL_RADIUS: f64 = 30.0;

/// Slack absorbing float error at the exact tolerance boundary.
const BOUNDARY_EPSILON: f64 = 1e-9;

fn exact(value: f64, tokens: &[ProjectToken<f64>]) -> Option<&str> {
    closest(
        tokens
            .iter()
            .filter(|t| (t.value - value).abs() < 1e-6)
            .map(|t| (0.0, t.path.as_str())),
    )
    .map(|(_, path)| path)
}

fn nearest<'a>(
    value: f64,
    tokens: impl Iterator<Item = &'a ProjectToken<f64>>,
    tolerance: f64,
) -> Option<&'a str> {
    closest(
        tokens
            .map(|t| ((t.value - value).abs(), t.path.as_str()))
            .filter(|(distance, _)| *distance <= tolerance + BOUNDARY_EPSILON),
    )
    .map(|(_, path)| path)
}

pub(crate) fn match_spacing(
    value: f64,
    tokens: &[ProjectToken<f64>],
    options: &MatchOptions,
) -> TokenMatch {
    if let Some(path) = exact(value, tokens) {
        return TokenMatch::exact(path);
    }
    let tolerance = (value.abs() * options.spacing_tolerance).max(options.min_px_tolerance);
    match nearest(value, tokens.iter(), tolerance) {
        Some(path) => TokenMatch::fuzzy(path),
        None => TokenMatch::unmatched(format_number(value)),
    }
}

pub(crate) fn match_radius(
    value: f64,
    tokens: &[ProjectToken<f64>],
    options: &MatchOptions,
) -> TokenMatch {
    if let Some(path) = exact(value, tokens) {
        return TokenMatch::exact(path);
    }

    if value >= FULL_RADIUS {
        let named = closest(
            tokens
                .iter()
                .filter(|t| is_full_radius_name(&t.path))
                .map(|t| (0.0, t.path.as_str())),
        );
        if let Some((_, path)) = named {
            return TokenMatch::semantic(path);
        }
        let large = tokens.iter().filter(|t| t.value >= FULL_RADIUS);
        if let Some(path) = nearest(value, large, f64::INFINITY) {
            return TokenMatch::fuzzy(path);
        }
    }

    let tolerance = (value.abs() * options.radius_tolerance).max(options.min_px_tolerance);
    match nearest(value, tokens.iter(), tolerance) {
        Some(path) => TokenMatch::fuzzy(path),
        None => TokenMatch::unmatched(format_number(value)),
    }
}

/// Last path segment reads like `full`, `round` or `pill`.
fn is_full_radius_name(path: &str) -> bool {
    let last = path
        .rsplit(['.', '/'])
        .next()
        .unwrap_or(path)
        .to_lowercase();
    last.contains("full") || last.contains("round") || last.contains("pill")
}
