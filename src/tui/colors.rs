//! Color schemes loaded from `colorschemes.json`.
//!
//! ```json
//! { "dark": { "colors": { "text": [15, -1], "error": [9, -1] },
//!             "elements": { "cursor": "reverse", "mirror": false } } }
//! ```
//!
//! Colors are 256-color palette indices; `-1` is the terminal default.

use crate::config::UserConfig;
use crate::error::{ImgsortError, Result};
use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Named style slots the renderer asks the theme for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleToken {
    Text,
    TextHighlight,
    Error,
    Success,
    Info,
    Border,
}

impl StyleToken {
    pub const ALL: [StyleToken; 6] = [
        StyleToken::Text,
        StyleToken::TextHighlight,
        StyleToken::Error,
        StyleToken::Success,
        StyleToken::Info,
        StyleToken::Border,
    ];

    /// Key used in the JSON file
    pub fn key(self) -> &'static str {
        match self {
            StyleToken::Text => "text",
            StyleToken::TextHighlight => "text_highlight",
            StyleToken::Error => "error",
            StyleToken::Success => "success",
            StyleToken::Info => "info",
            StyleToken::Border => "border",
        }
    }

    fn default_pair(self) -> [i16; 2] {
        match self {
            StyleToken::Text => [15, -1],
            StyleToken::TextHighlight => [15, -1],
            StyleToken::Error => [9, -1],
            StyleToken::Success => [10, -1],
            StyleToken::Info => [12, -1],
            StyleToken::Border => [8, -1],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SchemeElements {
    cursor: String,
    /// Destinations on the left, files on the right
    mirror: bool,
    /// Status and footer above the columns
    mirror_vertical: bool,
}

impl Default for SchemeElements {
    fn default() -> Self {
        Self {
            cursor: "reverse".to_string(),
            mirror: false,
            mirror_vertical: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Scheme {
    colors: HashMap<String, [i16; 2]>,
    elements: SchemeElements,
}

/// Resolved styles for one color scheme
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    styles: HashMap<StyleToken, Style>,
    cursor: Modifier,
    pub mirror: bool,
    pub mirror_vertical: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_scheme("default", Scheme::default())
    }
}

impl Theme {
    /// `~/.config/imgsort/colorschemes.json` on Linux
    pub fn schemes_path() -> Option<PathBuf> {
        UserConfig::config_dir().map(|dir| dir.join("colorschemes.json"))
    }

    /// Loads `name` from the schemes file, falling back to the built-in palette
    pub fn load(name: &str) -> Self {
        let Some(path) = Self::schemes_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path, name) {
            Ok(theme) => theme,
            Err(e) => {
                tracing::warn!(error = %e, "using default color scheme");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path, name: &str) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            ImgsortError::ConfigError(format!("Failed to read color schemes: {}", e))
        })?;
        Self::from_json(&contents, name)
    }

    pub fn from_json(json: &str, name: &str) -> Result<Self> {
        let mut schemes: HashMap<String, Scheme> = serde_json::from_str(json).map_err(|e| {
            ImgsortError::ConfigError(format!("Failed to parse color schemes: {}", e))
        })?;
        let scheme = schemes
            .remove(name)
            .ok_or_else(|| ImgsortError::ConfigError(format!("Unknown color scheme '{}'", name)))?;
        Ok(Self::from_scheme(name, scheme))
    }

    fn from_scheme(name: &str, scheme: Scheme) -> Self {
        let styles = StyleToken::ALL
            .iter()
            .map(|&token| {
                let [fg, bg] = scheme
                    .colors
                    .get(token.key())
                    .copied()
                    .unwrap_or_else(|| token.default_pair());
                (token, Style::default().fg(palette(fg)).bg(palette(bg)))
            })
            .collect();

        Self {
            name: name.to_string(),
            styles,
            cursor: cursor_modifier(&scheme.elements.cursor),
            mirror: scheme.elements.mirror,
            mirror_vertical: scheme.elements.mirror_vertical,
        }
    }

    pub fn style(&self, token: StyleToken) -> Style {
        self.styles.get(&token).copied().unwrap_or_default()
    }

    /// Style of the row under the cursor
    pub fn cursor_style(&self) -> Style {
        self.style(StyleToken::TextHighlight).add_modifier(self.cursor)
    }
}

fn palette(index: i16) -> Color {
    match u8::try_from(index) {
        Ok(i) => Color::Indexed(i),
        Err(_) => Color::Reset,
    }
}

fn cursor_modifier(element: &str) -> Modifier {
    match element {
        "bold" => Modifier::BOLD,
        "underline" => Modifier::UNDERLINED,
        "none" => Modifier::empty(),
        _ => Modifier::REVERSED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SCHEMES: &str = r#"{
        "ocean": {
            "colors": { "text": [250, 17], "error": [196, -1] },
            "elements": { "cursor": "bold", "mirror": true }
        },
        "plain": {}
    }"#;

    #[test]
    fn test_default_palette() {
        let theme = Theme::default();
        assert_eq!(
            theme.style(StyleToken::Error),
            Style::default().fg(Color::Indexed(9)).bg(Color::Reset)
        );
        assert!(theme.cursor_style().add_modifier.contains(Modifier::REVERSED));
        assert!(!theme.mirror);
    }

    #[test]
    fn test_named_scheme_overrides_tokens() {
        let theme = Theme::from_json(SCHEMES, "ocean").unwrap();
        assert_eq!(theme.name, "ocean");
        assert_eq!(
            theme.style(StyleToken::Text),
            Style::default().fg(Color::Indexed(250)).bg(Color::Indexed(17))
        );
        assert_eq!(
            theme.style(StyleToken::Error),
            Style::default().fg(Color::Indexed(196)).bg(Color::Reset)
        );
        // Missing tokens keep the built-in pair
        assert_eq!(
            theme.style(StyleToken::Success),
            Style::default().fg(Color::Indexed(10)).bg(Color::Reset)
        );
        assert!(theme.cursor_style().add_modifier.contains(Modifier::BOLD));
        assert!(theme.mirror);
        assert!(!theme.mirror_vertical);
    }

    #[test]
    fn test_empty_scheme_is_default_palette() {
        let theme = Theme::from_json(SCHEMES, "plain").unwrap();
        for token in StyleToken::ALL {
            assert_eq!(theme.style(token), Theme::default().style(token));
        }
    }

    #[test]
    fn test_unknown_scheme_is_error() {
        let err = Theme::from_json(SCHEMES, "missing").unwrap_err();
        assert!(err.to_string().contains("Unknown color scheme"));
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(Theme::from_json("{", "ocean").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("colorschemes.json");
        fs::write(&path, SCHEMES).unwrap();

        let theme = Theme::load_from(&path, "ocean").unwrap();
        assert!(theme.mirror);
    }

    #[test]
    fn test_out_of_range_index_is_reset() {
        assert_eq!(palette(-1), Color::Reset);
        assert_eq!(palette(300), Color::Reset);
        assert_eq!(palette(0), Color::Indexed(0));
    }
}
