//! Colour palettes for graph templates
//!
//! Templates ask for colours by role (`connections-active`,
//! `systemtime-warning`, ...). A palette maps roles to concrete colours;
//! roles missing from a user palette fall back to the built-in one, which
//! reproduces the classic template colours.

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use serde::Deserialize;
use thiserror::Error;

use crate::graph::{Color, GraphError};

/// Errors that can occur when loading or parsing palettes
#[derive(Error, Debug)]
pub enum PaletteError {
    #[error("Failed to read palette file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse palette TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid colour for role '{role}': {source}")]
    InvalidColor {
        role: String,
        #[source]
        source: GraphError,
    },
}

/// A palette mapping colour roles to colours
#[derive(Debug, Clone)]
pub struct Palette {
    /// Optional name for the palette
    pub name: Option<String>,
    /// Optional description
    pub description: Option<String>,
    /// Colour mappings: role name -> colour
    pub colors: HashMap<String, Color>,
}

/// TOML structure for deserializing palettes
#[derive(Deserialize)]
struct TomlPalette {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    colors: HashMap<String, String>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

/// Built-in palette
const DEFAULT_PALETTE: &str = r##"
[metadata]
name = "classic"
description = "Colours of the classic connection and time offset graphs"

[colors]
# Connection counts
connections-active = "#30c040"
connections-established = "#40ff80"
connections-half-opened = "#0080c0"
connections-half-closed = "#00a0f0"
connections-total = "#ff3030"
connections-optimized = "#008000"
connections-passthrough = "#ffd0d0"

# System time offset
systemtime-offset-area = "#4080ff"
systemtime-offset-line = "#2060d0"
systemtime-zero = "#c0c0c0"
systemtime-warning = "#ffff00"
systemtime-critical = "#ff0000"
"##;

impl Palette {
    /// Load palette from TOML file
    pub fn from_file(path: &Path) -> Result<Self, PaletteError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load palette from TOML string
    pub fn from_str(content: &str) -> Result<Self, PaletteError> {
        let parsed: TomlPalette = toml::from_str(content)?;

        let mut colors = HashMap::with_capacity(parsed.colors.len());
        for (role, value) in parsed.colors {
            let color = value
                .parse::<Color>()
                .map_err(|source| PaletteError::InvalidColor {
                    role: role.clone(),
                    source,
                })?;
            colors.insert(role, color);
        }

        Ok(Palette {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            colors,
        })
    }

    /// The built-in palette, parsed once
    pub fn builtin() -> &'static Palette {
        static BUILTIN: OnceLock<Palette> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            Self::from_str(DEFAULT_PALETTE).expect("Default palette should be valid TOML")
        })
    }

    /// Look up a role in this palette only
    pub fn resolve(&self, role: &str) -> Option<&Color> {
        self.colors.get(role)
    }

    /// Colour for a role, falling back to the built-in palette
    pub fn color(&self, role: &str) -> Color {
        if let Some(color) = self.resolve(role) {
            return color.clone();
        }
        if let Some(color) = Self::builtin().resolve(role) {
            return color.clone();
        }

        tracing::warn!(role, "no colour defined for role, using fallback");
        Color::neutral()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> Palette {
        Palette {
            name: None,
            description: None,
            colors: HashMap::new(),
        }
    }

    #[test]
    fn test_default_palette() {
        let palette = Palette::default();
        assert_eq!(palette.name.as_deref(), Some("classic"));
        assert!(palette.colors.contains_key("connections-active"));
        assert!(palette.colors.contains_key("systemtime-critical"));
    }

    #[test]
    fn test_default_palette_matches_classic_colours() {
        let palette = Palette::default();
        let expected = [
            ("connections-active", "#30c040"),
            ("connections-established", "#40ff80"),
            ("connections-half-opened", "#0080c0"),
            ("connections-half-closed", "#00a0f0"),
            ("connections-total", "#ff3030"),
            ("connections-optimized", "#008000"),
            ("connections-passthrough", "#ffd0d0"),
            ("systemtime-offset-area", "#4080ff"),
            ("systemtime-offset-line", "#2060d0"),
            ("systemtime-zero", "#c0c0c0"),
            ("systemtime-warning", "#ffff00"),
            ("systemtime-critical", "#ff0000"),
        ];
        for (role, color) in expected {
            assert_eq!(palette.color(role).as_str(), color, "{}", role);
        }
    }

    #[test]
    fn test_resolve_missing_role() {
        assert_eq!(Palette::default().resolve("nonexistent"), None);
    }

    #[test]
    fn test_color_falls_back_to_builtin() {
        assert_eq!(empty().color("systemtime-warning").as_str(), "#ffff00");
    }

    #[test]
    fn test_color_unknown_role_uses_fallback() {
        assert_eq!(empty().color("no-such-role").as_str(), "#808080");
    }

    #[test]
    fn test_parse_toml_with_metadata() {
        let toml_str = r##"
[metadata]
name = "Dark"
description = "Muted colours"

[colors]
connections-active = "#000000"
"##;
        let palette = Palette::from_str(toml_str).expect("Should parse");
        assert_eq!(palette.name, Some("Dark".to_string()));
        assert_eq!(palette.description, Some("Muted colours".to_string()));
        assert_eq!(palette.color("connections-active").as_str(), "#000000");
        assert_eq!(palette.color("connections-total").as_str(), "#ff3030");
    }

    #[test]
    fn test_parse_toml_without_colors_table() {
        let palette = Palette::from_str("[metadata]\nname = \"bare\"\n").expect("Should parse");
        assert!(palette.colors.is_empty());
    }

    #[test]
    fn test_invalid_color_error() {
        let result = Palette::from_str("[colors]\nsystemtime-zero = \"grey\"\n");
        assert!(matches!(
            result,
            Err(PaletteError::InvalidColor { ref role, .. }) if role == "systemtime-zero"
        ));
    }

    #[test]
    fn test_invalid_toml_error() {
        let invalid = "this is not valid toml {{{{";
        assert!(matches!(
            Palette::from_str(invalid),
            Err(PaletteError::ParseError(_))
        ));
    }
}
