use crate::layout::{CloudLayoutConfig, SizeRange, TextMetricsMode};
use crate::stats::DEFAULT_LIMIT;
use crate::theme::CardTheme;
use anyhow::bail;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3,4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").unwrap());

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    pub footer: String,
    pub limit: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            title: "MOST USED LANGUAGES".to_string(),
            footer: "CODE SPEAKS VOLUMES".to_string(),
            limit: DEFAULT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: CardTheme,
    pub layout: CloudLayoutConfig,
    pub render: RenderConfig,
}

impl Config {
    /// Layout settings for the card renderer. Labels are drawn in the theme's
    /// font, so glyph measurement uses that family too.
    pub fn layout_for_render(&self) -> CloudLayoutConfig {
        CloudLayoutConfig {
            font_family: self.theme.font_family.clone(),
            ..self.layout.clone()
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    render: Option<RenderConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    background: Option<String>,
    container_background: Option<String>,
    content_background: Option<String>,
    border: Option<String>,
    title_background: Option<String>,
    title_text: Option<String>,
    footer_background: Option<String>,
    footer_text: Option<String>,
    container_shadow: Option<String>,
    title_shadow: Option<String>,
    content_shadow: Option<String>,
    footer_shadow: Option<String>,
    error_text: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    min_font_size: Option<f32>,
    max_font_size: Option<f32>,
    max_attempts: Option<usize>,
    spiral_attempts: Option<usize>,
    spiral_angle_step: Option<f32>,
    spiral_radius_step: Option<f32>,
    collision_padding: Option<f32>,
    fallback_font_size: Option<f32>,
    char_width_ratio: Option<f32>,
    text_metrics: Option<TextMetricsMode>,
    random_seed: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    title: Option<String>,
    footer: Option<String>,
    limit: Option<usize>,
}

/// Load a JSON5 config file on top of the defaults. No path means defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = json5::from_str(contents)?;
    let mut config = Config::default();

    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme = CardTheme::named(theme_name);
    }

    if let Some(vars) = parsed.theme_variables {
        apply_theme_variables(&mut config.theme, vars)?;
    }

    if let Some(layout) = parsed.layout {
        let cfg = &mut config.layout;
        cfg.size_range = SizeRange::new(
            layout.min_font_size.unwrap_or(cfg.size_range.min_font_size),
            layout.max_font_size.unwrap_or(cfg.size_range.max_font_size),
        );
        if let Some(v) = layout.max_attempts {
            cfg.max_attempts = v;
        }
        if let Some(v) = layout.spiral_attempts {
            cfg.spiral_attempts = v;
        }
        if let Some(v) = layout.spiral_angle_step {
            cfg.spiral_angle_step = v;
        }
        if let Some(v) = layout.spiral_radius_step {
            cfg.spiral_radius_step = v;
        }
        if let Some(v) = layout.collision_padding {
            cfg.collision_padding = v;
        }
        if let Some(v) = layout.fallback_font_size {
            cfg.fallback_font_size = v;
        }
        if let Some(v) = layout.char_width_ratio {
            cfg.char_width_ratio = v;
        }
        if let Some(v) = layout.text_metrics {
            cfg.text_metrics = v;
        }
        if let Some(v) = layout.random_seed {
            cfg.random_seed = v;
        }
        cfg.validate()?;
    }

    if let Some(render) = parsed.render {
        let cfg = &mut config.render;
        if let Some(v) = render.width {
            cfg.width = v;
        }
        if let Some(v) = render.height {
            cfg.height = v;
        }
        if let Some(v) = render.title {
            cfg.title = v;
        }
        if let Some(v) = render.footer {
            cfg.footer = v;
        }
        if let Some(v) = render.limit {
            cfg.limit = v;
        }
    }

    Ok(config)
}

fn apply_theme_variables(theme: &mut CardTheme, vars: ThemeVariables) -> anyhow::Result<()> {
    if let Some(v) = vars.font_family {
        theme.font_family = v;
    }
    let colors = [
        ("background", vars.background, &mut theme.background),
        (
            "containerBackground",
            vars.container_background,
            &mut theme.container_background,
        ),
        (
            "contentBackground",
            vars.content_background,
            &mut theme.content_background,
        ),
        ("border", vars.border, &mut theme.border),
        (
            "titleBackground",
            vars.title_background,
            &mut theme.title_background,
        ),
        ("titleText", vars.title_text, &mut theme.title_text),
        (
            "footerBackground",
            vars.footer_background,
            &mut theme.footer_background,
        ),
        ("footerText", vars.footer_text, &mut theme.footer_text),
        (
            "containerShadow",
            vars.container_shadow,
            &mut theme.container_shadow,
        ),
        ("titleShadow", vars.title_shadow, &mut theme.title_shadow),
        (
            "contentShadow",
            vars.content_shadow,
            &mut theme.content_shadow,
        ),
        ("footerShadow", vars.footer_shadow, &mut theme.footer_shadow),
        ("errorText", vars.error_text, &mut theme.error_text),
    ];
    for (name, value, slot) in colors {
        let Some(value) = value else {
            continue;
        };
        if !HEX_COLOR.is_match(&value) {
            bail!("themeVariables.{name} must be a hex color, got {value:?}");
        }
        *slot = value;
    }
    Ok(())
}
