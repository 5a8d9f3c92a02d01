//! Typography and shadow matching.

use sprout_core::{format_number, ShadowToken, TypographyToken};

use crate::project::ProjectToken;
use crate::{closest, MatchOptions, TokenMatch};

/// Weight rounded to the nearest hundred.
fn weight_bucket(weight: u16) -> u16 {
    ((f64::from(weight) / 100.0).round() as u16) * 100
}

/// Comparison key: `family|size|weight-hundred|line-height`.
pub fn typography_key(token: &TypographyToken) -> String {
    format!(
        "{}|{}|{}|{}",
        token.family.to_lowercase(),
        format_number(token.size),
        weight_bucket(token.weight),
        token
            .line_height
            .map(|lh| format_number(lh.round()))
            .unwrap_or_else(|| "auto".to_string())
    )
}

/// Distance between two text styles of the same family and weight bucket,
/// or `None` if they are too far apart to be the same token.
fn typography_distance(
    source: &TypographyToken,
    candidate: &TypographyToken,
    options: &MatchOptions,
) -> Option<f64> {
    if !source.family.eq_ignore_ascii_case(&candidate.family)
        || weight_bucket(source.weight) != weight_bucket(candidate.weight)
    {
        return None;
    }
    let size = (source.size - candidate.size).abs();
    if size > options.font_size_tolerance {
        return None;
    }
    let line_height = match (source.line_height, candidate.line_height) {
        (None, None) => 0.0,
        (Some(a), Some(b)) => (a - b).abs(),
        _ => return None,
    };
    (line_height <= options.line_height_tolerance).then_some(size + line_height)
}

pub(crate) fn match_typography(
    source: &TypographyToken,
    tokens: &[ProjectToken<TypographyToken>],
    options: &MatchOptions,
) -> TokenMatch {
    let key = typography_key(source);
    let exact = closest(
        tokens
            .iter()
            .filter(|t| typography_key(&t.value) == key)
            .map(|t| (0.0, t.path.as_str())),
    );
    if let Some((_, path)) = exact {
        return TokenMatch::exact(path);
    }

    let fuzzy = closest(tokens.iter().filter_map(|t| {
        typography_distance(source, &t.value, options).map(|d| (d, t.path.as_str()))
    }));
    match fuzzy {
        Some((_, path)) => TokenMatch::fuzzy(path),
        None => TokenMatch::unmatched(source.key()),
    }
}

/// Shadows only match on identical geometry.
pub(crate) fn match_shadow(source: &ShadowToken, tokens: &[ProjectToken<ShadowToken>]) -> TokenMatch {
    let geometry = source.geometry_key();
    let exact = closest(
        tokens
            .iter()
            .filter(|t| t.value.geometry_key() == geometry)
            .map(|t| (0.0, t.path.as_str())),
    );
    match exact {
        Some((_, path)) => TokenMatch::exact(path),
        None => TokenMatch::unmatched(source.key()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font(family: &str, size: f64, weight: u16, line_height: Option<f64>) -> TypographyToken {
        TypographyToken {
            family: family.to_string(),
            size,
            weight,
            line_height,
        }
    }

    fn project() -> Vec<ProjectToken<TypographyToken>> {
        vec![
            ProjectToken::new("font.body", font("Inter", 16.0, 400, Some(24.0))),
            ProjectToken::new("font.title", font("Inter", 20.0, 600, Some(28.0))),
        ]
    }

    #[test]
    fn test_typography_key() {
        assert_eq!(typography_key(&font("Inter", 16.0, 420, Some(23.6))), "inter|16|400|24");
        assert_eq!(typography_key(&font("Inter", 13.5, 700, None)), "inter|13.5|700|auto");
    }

    #[test]
    fn test_typography_matching() {
        let options = MatchOptions::default();
        let tokens = project();

        assert_eq!(
            match_typography(&font("Inter", 16.0, 400, Some(24.0)), &tokens, &options),
            TokenMatch::exact("font.body")
        );
        assert_eq!(
            match_typography(&font("inter", 17.0, 430, Some(26.0)), &tokens, &options),
            TokenMatch::fuzzy("font.body")
        );

        let too_big = font("Inter", 18.0, 400, Some(24.0));
        assert_eq!(
            match_typography(&too_big, &tokens, &options),
            TokenMatch::unmatched(too_big.key())
        );
        let other_family = font("Roboto", 16.0, 400, Some(24.0));
        assert_eq!(
            match_typography(&other_family, &tokens, &options),
            TokenMatch::unmatched("Roboto/16/400/24")
        );
    }

    #[test]
    fn test_shadow_geometry_only() {
        let shadow = |y: f64, color: &str| ShadowToken {
            offset_x: 0.0,
            offset_y: y,
            blur: 6.0,
            spread: -1.0,
            color: color.to_string(),
        };
        let tokens = vec![ProjectToken::new("shadow.md", shadow(4.0, "#0000001A"))];

        assert_eq!(match_shadow(&shadow(4.0, "#00000033"), &tokens), TokenMatch::exact("shadow.md"));
        assert_eq!(match_shadow(&shadow(5.0, "#0000001A"), &tokens).value, "0,5,6,-1,#0000001A");
    }
}
