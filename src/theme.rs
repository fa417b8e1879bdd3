use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_LANGUAGE_COLOR: &str = "#6b7280";
pub const DEFAULT_SHADOW_COLOR: &str = "#9ca3af";

static LANGUAGE_COLORS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("JavaScript", "#f7df1e"),
        ("TypeScript", "#3178c6"),
        ("Python", "#3776ab"),
        ("Java", "#ed8b00"),
        ("C++", "#00599c"),
        ("C#", "#239120"),
        ("PHP", "#777bb4"),
        ("Ruby", "#cc342d"),
        ("Go", "#00add8"),
        ("Rust", "#000000"),
        ("Swift", "#fa7343"),
        ("Kotlin", "#7f52ff"),
        ("Dart", "#0175c2"),
        ("C", "#a8b9cc"),
        ("HTML", "#e34f26"),
        ("CSS", "#1572b6"),
        ("Vue", "#4fc08d"),
        ("React", "#61dafb"),
        ("Angular", "#dd0031"),
        ("Svelte", "#ff3e00"),
        ("Shell", "#89e051"),
        ("PowerShell", "#012456"),
        ("Dockerfile", "#384d54"),
        ("YAML", "#cb171e"),
        ("JSON", "#000000"),
        ("Markdown", "#083fa1"),
        ("SQL", "#e38c00"),
        ("R", "#276dc3"),
        ("Scala", "#dc322f"),
        ("Clojure", "#5881d8"),
        ("Haskell", "#5e5086"),
        ("Lua", "#000080"),
        ("Perl", "#39457e"),
        ("Objective-C", "#438eff"),
        ("Assembly", "#6e4c13"),
        ("MATLAB", "#e16737"),
        ("Jupyter Notebook", "#da5b0b"),
    ])
});

static SHADOW_COLORS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("JavaScript", "#facc15"),
        ("TypeScript", "#60a5fa"),
        ("Python", "#22d3ee"),
        ("Java", "#f87171"),
        ("C++", "#a78bfa"),
        ("C#", "#34d399"),
        ("PHP", "#818cf8"),
        ("Ruby", "#e879f9"),
        ("Go", "#a3e635"),
        ("Rust", "#f472b6"),
        ("Swift", "#fb923c"),
        ("Kotlin", "#c084fc"),
        ("HTML", "#fb923c"),
        ("CSS", "#c084fc"),
    ])
});

/// Fill color for a language label; unknown languages get a neutral gray.
pub fn language_color(language: &str) -> &'static str {
    LANGUAGE_COLORS
        .get(language)
        .copied()
        .unwrap_or(DEFAULT_LANGUAGE_COLOR)
}

/// Offset-shadow color drawn behind a language label.
pub fn language_shadow_color(language: &str) -> &'static str {
    SHADOW_COLORS
        .get(language)
        .copied()
        .unwrap_or(DEFAULT_SHADOW_COLOR)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardTheme {
    pub font_family: String,
    pub background: String,
    pub container_background: String,
    pub content_background: String,
    pub border: String,
    pub title_background: String,
    pub title_text: String,
    pub footer_background: String,
    pub footer_text: String,
    pub container_shadow: String,
    pub title_shadow: String,
    pub content_shadow: String,
    pub footer_shadow: String,
    pub error_text: String,
}

impl CardTheme {
    pub fn dark() -> Self {
        Self {
            font_family: "'Arial Black', Arial, sans-serif".to_string(),
            background: "#030712".to_string(),
            container_background: "#000000".to_string(),
            content_background: "#111827".to_string(),
            border: "#ffffff".to_string(),
            title_background: "#a3e635".to_string(),
            title_text: "#000000".to_string(),
            footer_background: "#ffffff".to_string(),
            footer_text: "#000000".to_string(),
            container_shadow: "#a3e635".to_string(),
            title_shadow: "#f43f5e".to_string(),
            content_shadow: "#22d3ee".to_string(),
            footer_shadow: "#f43f5e".to_string(),
            error_text: "#ef4444".to_string(),
        }
    }

    pub fn light() -> Self {
        Self {
            font_family: "'Arial Black', Arial, sans-serif".to_string(),
            background: "#f9fafb".to_string(),
            container_background: "#ffffff".to_string(),
            content_background: "#f3f4f6".to_string(),
            border: "#000000".to_string(),
            title_background: "#a3e635".to_string(),
            title_text: "#000000".to_string(),
            footer_background: "#000000".to_string(),
            footer_text: "#ffffff".to_string(),
            container_shadow: "#a3e635".to_string(),
            title_shadow: "#f43f5e".to_string(),
            content_shadow: "#22d3ee".to_string(),
            footer_shadow: "#a3e635".to_string(),
            error_text: "#ef4444".to_string(),
        }
    }

    /// Preset by name; anything unrecognized gets the dark preset.
    pub fn named(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }
}

impl Default for CardTheme {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_language_colors() {
        assert_eq!(language_color("Rust"), "#000000");
        assert_eq!(language_shadow_color("Rust"), "#f472b6");
    }

    #[test]
    fn unknown_language_falls_back() {
        assert_eq!(language_color("Zig"), DEFAULT_LANGUAGE_COLOR);
        assert_eq!(language_shadow_color("Dart"), DEFAULT_SHADOW_COLOR);
    }

    #[test]
    fn unknown_theme_is_dark() {
        assert_eq!(CardTheme::named("solarized"), CardTheme::dark());
        assert_eq!(CardTheme::named(" Light "), CardTheme::light());
    }
}
