use langcloud::{CardTheme, Config, render_languages_svg};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardRenderOptions {
    theme: Option<String>,
    title: Option<String>,
    user: Option<String>,
    width: Option<f32>,
    height: Option<f32>,
    limit: Option<usize>,
    seed: Option<u64>,
}

fn build_config(options: &CardRenderOptions) -> Config {
    let mut config = Config::default();
    if let Some(theme) = options.theme.as_deref() {
        config.theme = CardTheme::named(theme);
    }
    if let Some(title) = &options.title {
        config.render.title = title.clone();
    }
    if let Some(width) = options.width {
        config.render.width = width;
    }
    if let Some(height) = options.height {
        config.render.height = height;
    }
    if let Some(limit) = options.limit {
        config.render.limit = limit;
    }
    if let Some(seed) = options.seed {
        config.layout.random_seed = seed;
    }
    config
}

#[wasm_bindgen]
pub fn render_languages_card_svg(
    stats_json: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<CardRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        CardRenderOptions::default()
    };

    let config = build_config(&options);
    let user = options.user.as_deref().unwrap_or("anonymous");
    render_languages_svg(stats_json, user, &config)
        .map_err(|error| JsValue::from_str(&error.to_string()))
}

#[cfg(test)]
mod tests {
    use langcloud::render_languages_svg;

    use crate::{CardRenderOptions, build_config};

    #[test]
    fn renders_card_with_light_theme() {
        let options: CardRenderOptions =
            serde_json::from_str(r#"{"theme":"light","title":"STACK","limit":2}"#)
                .expect("options json");
        let config = build_config(&options);
        let svg = render_languages_svg(r#"{"Rust": 9, "Go": 4, "C": 1}"#, "octo", &config)
            .expect("card should render");

        assert!(svg.contains("<svg"));
        assert!(svg.contains("STACK"));
        assert!(svg.contains(">Rust</text>"));
        assert!(!svg.contains(">C</text>"));
        assert!(svg.contains("#f9fafb"));
    }
}
