use crate::text_metrics;

/// Estimated box of a rendered label.
///
/// Collision results depend on this estimate, so it has to agree with how
/// the renderer draws labels (bold, uppercase, one line).
pub trait TextFootprint {
    fn width(&self, label: &str, font_size: f32) -> f32;

    fn height(&self, font_size: f32) -> f32 {
        font_size
    }
}

/// Constant advance per character: `chars * font_size * ratio`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRatioFootprint {
    ratio: f32,
}

impl FixedRatioFootprint {
    pub fn new(ratio: f32) -> Self {
        Self { ratio }
    }
}

impl Default for FixedRatioFootprint {
    fn default() -> Self {
        Self::new(0.6)
    }
}

impl TextFootprint for FixedRatioFootprint {
    fn width(&self, label: &str, font_size: f32) -> f32 {
        label.chars().count() as f32 * font_size * self.ratio
    }
}

/// Measures the uppercased label with a heavy face from the system font
/// database. Results vary with installed fonts; hosts without a matching
/// face get the fixed-ratio estimate.
#[derive(Debug, Clone)]
pub struct GlyphFootprint {
    font_family: String,
    fallback: FixedRatioFootprint,
}

impl GlyphFootprint {
    pub fn new(font_family: &str, fallback_ratio: f32) -> Self {
        Self {
            font_family: font_family.to_string(),
            fallback: FixedRatioFootprint::new(fallback_ratio),
        }
    }
}

impl TextFootprint for GlyphFootprint {
    fn width(&self, label: &str, font_size: f32) -> f32 {
        let upper = label.to_uppercase();
        text_metrics::measure_heavy_text_width(&upper, font_size, &self.font_family)
            .unwrap_or_else(|| self.fallback.width(label, font_size))
    }
}
