#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod layout;
pub mod render;
pub mod stats;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, RenderConfig, load_config, parse_config};
pub use layout::{
    Canvas, CloudLayoutConfig, LayoutError, Placement, SizeRange, WeightedItem,
    compute_cloud_layout, compute_cloud_layout_with_rng,
};
pub use render::{content_canvas, render_error_card, render_languages_card};
pub use stats::{LanguageStat, StatsError, aggregate_languages, parse_repositories};
pub use theme::CardTheme;

use tracing::warn;

/// Aggregate the JSON language data, lay out the cloud, and render the card.
///
/// Missing or unreadable data produces the error card rather than an error;
/// only an unusable card size fails.
pub fn render_languages_svg(input: &str, user: &str, config: &Config) -> Result<String, LayoutError> {
    let stats = match parse_repositories(input)
        .and_then(|repos| aggregate_languages(&repos, config.render.limit))
    {
        Ok(stats) => stats,
        Err(err) => {
            warn!(%err, user, "language data unavailable, rendering error card");
            return Ok(render_error_card(&err.card_message(user), &config.theme));
        }
    };
    let items: Vec<WeightedItem> = stats.iter().map(LanguageStat::to_weighted_item).collect();
    let placements = compute_cloud_layout(
        &items,
        &content_canvas(&config.render),
        &config.layout_for_render(),
    )?;
    Ok(render_languages_card(
        &stats,
        &placements,
        &config.theme,
        &config.render,
        user,
    ))
}
