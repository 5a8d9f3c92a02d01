//! The project's own token table.

use serde::{Deserialize, Serialize};
use tracing::warn;

use sprout_core::{ShadowToken, TokenValueError, TypographyToken};

use crate::value::{parse_color, parse_font, parse_px, parse_shadow};

/// A named project token, e.g. `theme.colors.primary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectToken<T> {
    pub path: String,
    pub value: T,
}

impl<T> ProjectToken<T> {
    pub fn new(path: impl Into<String>, value: T) -> Self {
        Self {
            path: path.into(),
            value,
        }
    }
}

/// Tokens defined by the target project, per category. Colors are hex
/// strings; malformed ones are skipped at match time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectTokens {
    pub colors: Vec<ProjectToken<String>>,
    pub spacing: Vec<ProjectToken<f64>>,
    pub radii: Vec<ProjectToken<f64>>,
    pub typography: Vec<ProjectToken<TypographyToken>>,
    pub shadows: Vec<ProjectToken<ShadowToken>>,
}

impl ProjectTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color(mut self, path: impl Into<String>, hex: impl Into<String>) -> Self {
        self.colors.push(ProjectToken::new(path, hex.into()));
        self
    }

    pub fn with_spacing(mut self, path: impl Into<String>, value: f64) -> Self {
        self.spacing.push(ProjectToken::new(path, value));
        self
    }

    pub fn with_radius(mut self, path: impl Into<String>, value: f64) -> Self {
        self.radii.push(ProjectToken::new(path, value));
        self
    }

    pub fn with_typography(mut self, path: impl Into<String>, token: TypographyToken) -> Self {
        self.typography.push(ProjectToken::new(path, token));
        self
    }

    pub fn with_shadow(mut self, path: impl Into<String>, token: ShadowToken) -> Self {
        self.shadows.push(ProjectToken::new(path, token));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
            && self.spacing.is_empty()
            && self.radii.is_empty()
            && self.typography.is_empty()
            && self.shadows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
            + self.spacing.len()
            + self.radii.len()
            + self.typography.len()
            + self.shadows.len()
    }

    /// Build a table from flat `path → value` entries, such as a flattened
    /// JSON theme. The category comes from the path (`colors.*`,
    /// `spacing.*`, `radius.*`, `shadow.*`, `font.*`) or, for colors, from
    /// the value itself.
    pub fn from_flat<I, K, V>(entries: I) -> FlatImport
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut import = FlatImport::default();
        for (path, value) in entries {
            let path = path.into();
            let value = value.as_ref();
            if let Err(error) = import.tokens.insert_flat(&path, value) {
                warn!(path = %path, %error, "skipping project token");
                import.skipped.push(SkippedEntry { path, error });
            }
        }
        import
    }

    fn insert_flat(&mut self, path: &str, value: &str) -> Result<(), TokenValueError> {
        let category = TokenCategory::from_path(path)
            .or_else(|| TokenCategory::from_value(value))
            .ok_or_else(|| TokenValueError::UnknownCategory {
                path: path.to_string(),
            })?;

        let path = path.to_string();
        match category {
            TokenCategory::Color => {
                let color = parse_color(value)?;
                self.colors.push(ProjectToken::new(path, color.to_hex()));
            }
            TokenCategory::Spacing => self.spacing.push(ProjectToken::new(path, parse_px(value)?)),
            TokenCategory::Radius => self.radii.push(ProjectToken::new(path, parse_px(value)?)),
            TokenCategory::Typography => {
                self.typography.push(ProjectToken::new(path, parse_font(value)?))
            }
            TokenCategory::Shadow => self.shadows.push(ProjectToken::new(path, parse_shadow(value)?)),
        }
        Ok(())
    }
}

/// Result of [`ProjectTokens::from_flat`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatImport {
    pub tokens: ProjectTokens,
    pub skipped: Vec<SkippedEntry>,
}

/// A flat entry that could not be used.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedEntry {
    pub path: String,
    pub error: TokenValueError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenCategory {
    Color,
    Spacing,
    Radius,
    Typography,
    Shadow,
}

impl TokenCategory {
    const KEYWORDS: &'static [(TokenCategory, &'static [&'static str])] = &[
        (Self::Shadow, &["shadow", "shadows", "elevation", "boxshadow"]),
        (Self::Radius, &["radius", "radii", "rounded", "borderradius", "corner", "corners"]),
        (Self::Typography, &["typography", "font", "fonts", "typescale"]),
        (Self::Spacing, &["spacing", "space", "spaces", "gap", "gaps"]),
        (Self::Color, &["color", "colors", "colour", "colours", "palette"]),
    ];

    fn from_path(path: &str) -> Option<Self> {
        let segments: Vec<String> = path
            .split(['.', '/'])
            .map(|s| s.replace(['-', '_'], "").to_lowercase())
            .collect();
        Self::KEYWORDS.iter().find_map(|(category, keywords)| {
            segments
                .iter()
                .any(|s| keywords.contains(&s.as_str()))
                .then_some(*category)
        })
    }

    fn from_value(value: &str) -> Option<Self> {
        parse_color(value).ok().map(|_| Self::Color)
    }
}
