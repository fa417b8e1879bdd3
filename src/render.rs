use crate::config::RenderConfig;
use crate::layout::{Canvas, Placement};
use crate::stats::LanguageStat;
use crate::theme::{CardTheme, language_color, language_shadow_color};
use anyhow::Result;
use std::path::Path;

// Card geometry. Only the container and the content panel width follow the
// configured size; everything else sits at fixed offsets.
const CONTENT_X: f32 = 60.0;
const CONTENT_Y: f32 = 160.0;
const CONTENT_WIDTH_INSET: f32 = 168.0;
const CONTENT_HEIGHT: f32 = 320.0;
const CONTENT_PADDING: f32 = 20.0;
const SHADOW_OFFSET: f32 = 3.0;

/// Word-cloud canvas for the card's content panel, in panel coordinates.
pub fn content_canvas(render: &RenderConfig) -> Canvas {
    Canvas::new(
        render.width - CONTENT_WIDTH_INSET,
        CONTENT_HEIGHT,
        CONTENT_PADDING,
    )
}

/// Render the language card. `placements[i]` positions `stats[i]`; extra
/// entries on either side are ignored.
pub fn render_languages_card(
    stats: &[LanguageStat],
    placements: &[Placement],
    theme: &CardTheme,
    render: &RenderConfig,
    user: &str,
) -> String {
    let width = render.width;
    let height = render.height;
    let canvas = content_canvas(render);
    let mut svg = String::new();

    svg.push_str(&format!(
        "<svg width=\"{width}\" height=\"{height}\" xmlns=\"http://www.w3.org/2000/svg\">",
    ));
    svg.push_str("<defs><style>");
    svg.push_str(&format!(
        ".title {{ font-family: {0}; font-weight: 900; text-transform: uppercase; letter-spacing: 2px; }} \
         .lang-text {{ font-family: {0}; font-weight: 900; text-transform: uppercase; }} \
         .footer-text {{ font-family: {0}; font-weight: 900; text-transform: uppercase; letter-spacing: 3px; }}",
        theme.font_family
    ));
    svg.push_str("</style></defs>");

    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    // Container with offset shadow.
    let container_w = width - 64.0;
    let container_h = height - 40.0;
    svg.push_str(&format!(
        "<rect x=\"32\" y=\"32\" width=\"{container_w}\" height=\"{container_h}\" fill=\"{}\"/>",
        theme.container_shadow
    ));
    svg.push_str(&format!(
        "<rect x=\"20\" y=\"20\" width=\"{container_w}\" height=\"{container_h}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"6\"/>",
        theme.container_background, theme.border
    ));

    svg.push_str(&title_block_svg(&render.title, theme));

    svg.push_str(&format!(
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>",
        CONTENT_X + 12.0,
        CONTENT_Y + 12.0,
        canvas.width,
        canvas.height,
        theme.content_shadow
    ));
    svg.push_str(&format!(
        "<rect x=\"{CONTENT_X}\" y=\"{CONTENT_Y}\" width=\"{}\" height=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"3\"/>",
        canvas.width, canvas.height, theme.content_background, theme.border
    ));

    for (stat, placement) in stats.iter().zip(placements) {
        svg.push_str(&language_text_svg(stat, placement));
    }

    svg.push_str(&footer_svg(&render.footer, theme));

    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"Arial, sans-serif\" font-size=\"12\" fill=\"{}\" text-anchor=\"end\" opacity=\"0.7\">@{}</text>",
        width - 20.0,
        height - 10.0,
        theme.border,
        escape_xml(user)
    ));

    svg.push_str("</svg>");
    svg
}

fn title_block_svg(title: &str, theme: &CardTheme) -> String {
    let mut svg = String::new();
    svg.push_str(&format!(
        "<rect x=\"68\" y=\"68\" width=\"460\" height=\"76\" fill=\"{}\"/>",
        theme.title_shadow
    ));
    svg.push_str(&format!(
        "<rect x=\"60\" y=\"60\" width=\"460\" height=\"76\" fill=\"{}\" stroke=\"{}\" stroke-width=\"3\"/>",
        theme.title_background, theme.border
    ));
    // Code icon: one bar and three ticks.
    for (x, y, w, h) in [
        (80, 80, 8, 36),
        (92, 80, 20, 8),
        (92, 94, 16, 8),
        (92, 108, 20, 8),
    ] {
        svg.push_str(&format!(
            "<rect x=\"{x}\" y=\"{y}\" width=\"{w}\" height=\"{h}\" fill=\"{}\"/>",
            theme.title_text
        ));
    }
    svg.push_str(&format!(
        "<text x=\"130\" y=\"108\" class=\"title\" fill=\"{}\" font-size=\"28\">{}</text>",
        theme.title_text,
        escape_xml(title)
    ));
    svg
}

fn language_text_svg(stat: &LanguageStat, placement: &Placement) -> String {
    let x = CONTENT_X + placement.x;
    let y = CONTENT_Y + placement.y;
    let name = escape_xml(&stat.name);
    format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" class=\"lang-text\" font-size=\"{:.2}\" fill=\"{}\" text-anchor=\"middle\">{name}</text>\
         <text x=\"{x:.2}\" y=\"{y:.2}\" class=\"lang-text\" font-size=\"{:.2}\" fill=\"{}\" text-anchor=\"middle\">{name}</text>",
        x + SHADOW_OFFSET,
        y + SHADOW_OFFSET,
        placement.font_size,
        language_shadow_color(&stat.name),
        placement.font_size,
        language_color(&stat.name),
    )
}

fn footer_svg(footer: &str, theme: &CardTheme) -> String {
    format!(
        "<rect x=\"292\" y=\"524\" width=\"316\" height=\"56\" fill=\"{}\"/>\
         <rect x=\"280\" y=\"512\" width=\"316\" height=\"56\" fill=\"{}\" stroke=\"{}\" stroke-width=\"3\"/>\
         <text x=\"438\" y=\"545\" class=\"footer-text\" fill=\"{}\" font-size=\"18\" text-anchor=\"middle\">{}</text>",
        theme.footer_shadow,
        theme.footer_background,
        theme.title_background,
        theme.footer_text,
        escape_xml(footer)
    )
}

/// Fixed-size badge shown in place of the card when there is nothing to draw.
pub fn render_error_card(message: &str, theme: &CardTheme) -> String {
    format!(
        "<svg width=\"800\" height=\"400\" xmlns=\"http://www.w3.org/2000/svg\">\
         <rect width=\"100%\" height=\"100%\" fill=\"{}\"/>\
         <rect x=\"20\" y=\"20\" width=\"760\" height=\"360\" fill=\"#000\" stroke=\"#fff\" stroke-width=\"4\"/>\
         <text x=\"400\" y=\"200\" font-family=\"Arial, sans-serif\" font-size=\"20\" fill=\"{}\" text-anchor=\"middle\">Error: {}</text>\
         </svg>",
        theme.background,
        theme.error_text,
        escape_xml(message)
    )
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Arial".to_string();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("Invalid render size {}x{}", render_cfg.width, render_cfg.height))?;
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
