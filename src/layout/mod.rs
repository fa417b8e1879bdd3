//! Weighted word-cloud layout.
//!
//! Places a list of weighted labels inside a padded canvas so that no two
//! labels overlap, sizing each label by its weight. Heavier labels claim space
//! first (spiral from the center, then random probes); anything that cannot
//! find a free spot is parked on a coarse fallback grid and flagged as
//! degraded.

mod error;
mod fallback;
mod footprint;
mod rng;
mod search;
mod sizing;

pub use error::LayoutError;
pub use footprint::{FixedRatioFootprint, GlyphFootprint, TextFootprint};
pub use rng::{FixedSource, RandomSource, XorShift64Star};
pub use sizing::font_size_for_weight;

use serde::{Deserialize, Serialize};
use tracing::debug;

use fallback::FallbackGrid;
use search::CandidateSearch;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedItem {
    pub label: String,
    pub weight: f32,
}

impl WeightedItem {
    pub fn new(label: impl Into<String>, weight: f32) -> Self {
        Self {
            label: label.into(),
            weight,
        }
    }
}

/// Placement area. Labels are kept inside the rectangle inset by `padding`
/// on every side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
    pub padding: f32,
}

impl Canvas {
    pub fn new(width: f32, height: f32, padding: f32) -> Self {
        Self {
            width,
            height,
            padding,
        }
    }

    pub fn usable_width(&self) -> f32 {
        self.width - self.padding * 2.0
    }

    pub fn usable_height(&self) -> f32 {
        self.height - self.padding * 2.0
    }

    fn validate(&self) -> Result<(), LayoutError> {
        let reason = if !self.width.is_finite() || !self.height.is_finite() {
            Some("dimensions must be finite")
        } else if self.width <= 0.0 || self.height <= 0.0 {
            Some("dimensions must be positive")
        } else if !self.padding.is_finite() || self.padding < 0.0 {
            Some("padding must be finite and non-negative")
        } else if self.usable_width() <= 0.0 || self.usable_height() <= 0.0 {
            Some("padding leaves no usable area")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(LayoutError::InvalidCanvas {
                width: self.width,
                height: self.height,
                padding: self.padding,
                reason,
            }),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeRange {
    pub min_font_size: f32,
    pub max_font_size: f32,
}

impl SizeRange {
    /// Range used by the compact badge variants.
    pub const COMPACT: SizeRange = SizeRange {
        min_font_size: 14.0,
        max_font_size: 36.0,
    };
    /// Range used by the full language card.
    pub const LARGE: SizeRange = SizeRange {
        min_font_size: 16.0,
        max_font_size: 48.0,
    };

    pub fn new(min_font_size: f32, max_font_size: f32) -> Self {
        Self {
            min_font_size,
            max_font_size,
        }
    }

    pub fn contains(&self, font_size: f32) -> bool {
        font_size >= self.min_font_size && font_size <= self.max_font_size
    }

    fn validate(&self) -> Result<(), LayoutError> {
        let valid = self.min_font_size.is_finite()
            && self.max_font_size.is_finite()
            && self.min_font_size > 0.0
            && self.min_font_size <= self.max_font_size;
        if valid {
            Ok(())
        } else {
            Err(LayoutError::InvalidSizeRange {
                min: self.min_font_size,
                max: self.max_font_size,
            })
        }
    }
}

impl Default for SizeRange {
    fn default() -> Self {
        Self::LARGE
    }
}

/// Center of a label's text box relative to the canvas origin, plus the
/// font size it should be drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    /// Set when the search gave up and the label was parked on the fallback
    /// grid with a capped font size. Degraded labels may overlap others.
    pub degraded: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMetricsMode {
    /// `chars * font_size * ratio` wide, `font_size` tall. Identical on every host.
    #[default]
    Fixed,
    /// Advance widths from an installed bold face, falling back to `Fixed`.
    Glyph,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CloudLayoutConfig {
    pub size_range: SizeRange,
    pub max_attempts: usize,
    pub spiral_attempts: usize,
    pub spiral_angle_step: f32,
    pub spiral_radius_step: f32,
    pub collision_padding: f32,
    pub fallback_font_size: f32,
    pub char_width_ratio: f32,
    pub text_metrics: TextMetricsMode,
    pub font_family: String,
    pub random_seed: u64,
}

impl Default for CloudLayoutConfig {
    fn default() -> Self {
        Self {
            size_range: SizeRange::LARGE,
            max_attempts: 100,
            spiral_attempts: 50,
            spiral_angle_step: 0.5,
            spiral_radius_step: 3.0,
            collision_padding: 8.0,
            fallback_font_size: 18.0,
            char_width_ratio: 0.6,
            text_metrics: TextMetricsMode::Fixed,
            font_family: "'Arial Black', Arial, sans-serif".to_string(),
            random_seed: 0x5EED_C10D,
        }
    }
}

impl CloudLayoutConfig {
    /// Reject tuning values that would poison the geometry: every float must
    /// be finite, sizes and ratios positive, steps and padding non-negative.
    pub fn validate(&self) -> Result<(), LayoutError> {
        self.size_range.validate()?;
        let checks: [(&'static str, f32, bool); 5] = [
            ("spiralAngleStep", self.spiral_angle_step, true),
            ("spiralRadiusStep", self.spiral_radius_step, true),
            ("collisionPadding", self.collision_padding, true),
            ("fallbackFontSize", self.fallback_font_size, false),
            ("charWidthRatio", self.char_width_ratio, false),
        ];
        for (field, value, zero_ok) in checks {
            let reason = if !value.is_finite() {
                Some("must be finite")
            } else if zero_ok && value < 0.0 {
                Some("must not be negative")
            } else if !zero_ok && value <= 0.0 {
                Some("must be positive")
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(LayoutError::InvalidConfig {
                    field,
                    value,
                    reason,
                });
            }
        }
        Ok(())
    }
}

/// Lay out `items` using the engine's own PRNG seeded from
/// `config.random_seed`. Same input and seed always give the same layout.
pub fn compute_cloud_layout(
    items: &[WeightedItem],
    canvas: &Canvas,
    config: &CloudLayoutConfig,
) -> Result<Vec<Placement>, LayoutError> {
    let mut rng = XorShift64Star::new(config.random_seed);
    compute_cloud_layout_with_rng(items, canvas, config, &mut rng)
}

/// Lay out `items` with an injected random source, using the footprint
/// estimator selected by `config.text_metrics`.
pub fn compute_cloud_layout_with_rng(
    items: &[WeightedItem],
    canvas: &Canvas,
    config: &CloudLayoutConfig,
    rng: &mut dyn RandomSource,
) -> Result<Vec<Placement>, LayoutError> {
    match config.text_metrics {
        TextMetricsMode::Fixed => {
            let footprint = FixedRatioFootprint::new(config.char_width_ratio);
            compute_cloud_layout_with(items, canvas, config, &footprint, rng)
        }
        TextMetricsMode::Glyph => {
            let footprint = GlyphFootprint::new(&config.font_family, config.char_width_ratio);
            compute_cloud_layout_with(items, canvas, config, &footprint, rng)
        }
    }
}

/// Full-control entry point: caller supplies both the text footprint
/// estimator and the random source.
///
/// The returned placements are in input order, one per item.
pub fn compute_cloud_layout_with(
    items: &[WeightedItem],
    canvas: &Canvas,
    config: &CloudLayoutConfig,
    footprint: &dyn TextFootprint,
    rng: &mut dyn RandomSource,
) -> Result<Vec<Placement>, LayoutError> {
    canvas.validate()?;
    config.validate()?;
    validate_items(items)?;
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let sizes = sizing::font_sizes(items, config.size_range);
    let order = sizing::descending_weight_order(items);
    let grid = FallbackGrid::new(canvas, items.len());
    let mut search = CandidateSearch::new(canvas, config);
    let mut ranked: Vec<(usize, Placement)> = Vec::with_capacity(items.len());

    for (rank, &index) in order.iter().enumerate() {
        let item = &items[index];
        let font_size = sizes[index];
        let (width, height) = measure(footprint, index, item, font_size)?;

        let placement = match search.find(width, height, rng) {
            Some((x, y)) => Placement {
                x,
                y,
                font_size,
                degraded: false,
            },
            None => {
                let capped = font_size.min(config.fallback_font_size);
                let (width, height) = measure(footprint, index, item, capped)?;
                let (x, y) = grid.cell_center(rank, width, height);
                search.occupy(x, y, width, height);
                debug!(
                    label = %item.label,
                    rank,
                    font_size = capped,
                    "no free spot after {} attempts, using fallback grid",
                    config.max_attempts
                );
                Placement {
                    x,
                    y,
                    font_size: capped,
                    degraded: true,
                }
            }
        };
        ranked.push((index, placement));
    }

    let degraded = ranked.iter().filter(|(_, p)| p.degraded).count();
    debug!(
        items = items.len(),
        degraded,
        width = canvas.width,
        height = canvas.height,
        "word cloud laid out"
    );

    Ok(restore_input_order(ranked))
}

fn measure(
    footprint: &dyn TextFootprint,
    index: usize,
    item: &WeightedItem,
    font_size: f32,
) -> Result<(f32, f32), LayoutError> {
    let width = footprint.width(&item.label, font_size);
    let height = footprint.height(font_size);
    if width.is_finite() && height.is_finite() {
        Ok((width, height))
    } else {
        Err(LayoutError::InvalidFootprint {
            index,
            label: item.label.clone(),
            width,
            height,
        })
    }
}

fn validate_items(items: &[WeightedItem]) -> Result<(), LayoutError> {
    for (index, item) in items.iter().enumerate() {
        if item.label.is_empty() {
            return Err(LayoutError::EmptyLabel { index });
        }
        if !item.weight.is_finite() || item.weight <= 0.0 {
            return Err(LayoutError::InvalidWeight {
                index,
                label: item.label.clone(),
                weight: item.weight,
            });
        }
    }
    Ok(())
}

// Placements are produced heaviest-first; put them back by original index so
// duplicate labels stay unambiguous.
fn restore_input_order(mut ranked: Vec<(usize, Placement)>) -> Vec<Placement> {
    ranked.sort_by_key(|(index, _)| *index);
    ranked.into_iter().map(|(_, placement)| placement).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(pairs: &[(&str, f32)]) -> Vec<WeightedItem> {
        pairs
            .iter()
            .map(|(label, weight)| WeightedItem::new(*label, *weight))
            .collect()
    }

    fn padded_overlap(a: &Placement, b: &Placement, la: &str, lb: &str, pad: f32) -> bool {
        let fp = FixedRatioFootprint::default();
        let (aw, ah) = (fp.width(la, a.font_size), fp.height(a.font_size));
        let (bw, bh) = (fp.width(lb, b.font_size), fp.height(b.font_size));
        let ax0 = a.x - aw / 2.0;
        let ay0 = a.y - ah / 2.0;
        let bx0 = b.x - bw / 2.0;
        let by0 = b.y - bh / 2.0;
        ax0 < bx0 + bw + pad && bx0 < ax0 + aw + pad && ay0 < by0 + bh + pad && by0 < ay0 + ah + pad
    }

    #[test]
    fn empty_input_yields_empty_layout() {
        let canvas = Canvas::new(800.0, 600.0, 20.0);
        let placements = compute_cloud_layout(&[], &canvas, &CloudLayoutConfig::default())
            .expect("empty input is valid");
        assert!(placements.is_empty());
    }

    #[test]
    fn three_languages_scenario() {
        let input = items(&[("JavaScript", 100.0), ("Python", 80.0), ("Go", 10.0)]);
        let canvas = Canvas::new(800.0, 600.0, 20.0);
        let config = CloudLayoutConfig::default();
        let placements = compute_cloud_layout(&input, &canvas, &config).expect("layout");

        assert_eq!(placements.len(), 3);
        assert_eq!(placements[0].font_size, config.size_range.max_font_size);
        assert_eq!(placements[2].font_size, config.size_range.min_font_size);
        assert!(placements.iter().all(|p| !p.degraded));
        for i in 0..3 {
            for j in (i + 1)..3 {
                assert!(
                    !padded_overlap(
                        &placements[i],
                        &placements[j],
                        &input[i].label,
                        &input[j].label,
                        config.collision_padding
                    ),
                    "{} overlaps {}",
                    input[i].label,
                    input[j].label
                );
            }
        }
    }

    #[test]
    fn tied_weights_all_get_min_font_size() {
        let input = items(&[("A", 5.0), ("B", 5.0), ("C", 5.0)]);
        let canvas = Canvas::new(400.0, 300.0, 20.0);
        let config = CloudLayoutConfig::default();
        let placements = compute_cloud_layout(&input, &canvas, &config).expect("layout");
        assert!(
            placements
                .iter()
                .all(|p| p.font_size == config.size_range.min_font_size)
        );
    }

    #[test]
    fn single_item_lands_on_spiral_origin() {
        let input = items(&[("Rust", 42.0)]);
        let canvas = Canvas::new(800.0, 600.0, 20.0);
        let placements =
            compute_cloud_layout(&input, &canvas, &CloudLayoutConfig::default()).expect("layout");
        assert_eq!(placements.len(), 1);
        // First spiral probe has radius zero.
        assert_eq!(placements[0].x, canvas.usable_width() / 2.0);
        assert_eq!(placements[0].y, canvas.usable_height() / 2.0);
        assert!(!placements[0].degraded);
    }

    #[test]
    fn duplicate_labels_keep_their_own_slots() {
        let input = items(&[("Go", 1.0), ("Go", 50.0), ("Go", 25.0)]);
        let canvas = Canvas::new(800.0, 600.0, 20.0);
        let config = CloudLayoutConfig::default();
        let placements = compute_cloud_layout(&input, &canvas, &config).expect("layout");
        assert_eq!(placements[0].font_size, config.size_range.min_font_size);
        assert_eq!(placements[1].font_size, config.size_range.max_font_size);
        assert!(placements[2].font_size > placements[0].font_size);
        assert!(placements[2].font_size < placements[1].font_size);
    }

    #[test]
    fn rejects_non_positive_weight() {
        let input = items(&[("Rust", 1.0), ("C", 0.0)]);
        let canvas = Canvas::new(800.0, 600.0, 20.0);
        let err = compute_cloud_layout(&input, &canvas, &CloudLayoutConfig::default())
            .expect_err("zero weight must be rejected");
        assert!(matches!(err, LayoutError::InvalidWeight { index: 1, .. }));
    }

    #[test]
    fn rejects_nan_weight_and_empty_label() {
        let canvas = Canvas::new(800.0, 600.0, 20.0);
        let config = CloudLayoutConfig::default();
        let err = compute_cloud_layout(&items(&[("Rust", f32::NAN)]), &canvas, &config)
            .expect_err("NaN weight");
        assert!(matches!(err, LayoutError::InvalidWeight { index: 0, .. }));
        let err = compute_cloud_layout(&items(&[("", 3.0)]), &canvas, &config)
            .expect_err("empty label");
        assert_eq!(err, LayoutError::EmptyLabel { index: 0 });
    }

    #[test]
    fn rejects_degenerate_canvas() {
        let input = items(&[("Rust", 1.0)]);
        let config = CloudLayoutConfig::default();
        for canvas in [
            Canvas::new(0.0, 600.0, 20.0),
            Canvas::new(800.0, -1.0, 20.0),
            Canvas::new(f32::INFINITY, 600.0, 20.0),
            Canvas::new(40.0, 600.0, 20.0),
            Canvas::new(800.0, 600.0, f32::NAN),
        ] {
            let err = compute_cloud_layout(&input, &canvas, &config)
                .expect_err("canvas must be rejected");
            assert!(matches!(err, LayoutError::InvalidCanvas { .. }), "{canvas:?}");
        }
    }

    #[test]
    fn rejects_inverted_size_range() {
        let input = items(&[("Rust", 1.0)]);
        let canvas = Canvas::new(800.0, 600.0, 20.0);
        let config = CloudLayoutConfig {
            size_range: SizeRange::new(40.0, 10.0),
            ..Default::default()
        };
        let err = compute_cloud_layout(&input, &canvas, &config).expect_err("inverted range");
        assert!(matches!(err, LayoutError::InvalidSizeRange { .. }));
    }

    #[test]
    fn rejects_non_finite_tuning_values() {
        let input = items(&[("Rust", 10.0), ("Go", 1.0)]);
        let canvas = Canvas::new(800.0, 600.0, 20.0);
        let cases = [
            CloudLayoutConfig {
                char_width_ratio: f32::NAN,
                ..Default::default()
            },
            CloudLayoutConfig {
                collision_padding: f32::NAN,
                ..Default::default()
            },
            CloudLayoutConfig {
                collision_padding: -1.0,
                ..Default::default()
            },
            CloudLayoutConfig {
                fallback_font_size: 0.0,
                ..Default::default()
            },
            CloudLayoutConfig {
                spiral_angle_step: f32::INFINITY,
                ..Default::default()
            },
            CloudLayoutConfig {
                spiral_radius_step: f32::NEG_INFINITY,
                ..Default::default()
            },
        ];
        for config in cases {
            let err = compute_cloud_layout(&input, &canvas, &config)
                .expect_err("tuning value must be rejected");
            assert!(matches!(err, LayoutError::InvalidConfig { .. }), "{err}");
        }
    }

    #[test]
    fn zero_padding_and_steps_are_accepted() {
        let config = CloudLayoutConfig {
            collision_padding: 0.0,
            spiral_angle_step: 0.0,
            spiral_radius_step: 0.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_non_finite_footprint() {
        struct Broken;
        impl TextFootprint for Broken {
            fn width(&self, _label: &str, _font_size: f32) -> f32 {
                f32::NAN
            }
        }
        let input = items(&[("Rust", 1.0)]);
        let canvas = Canvas::new(800.0, 600.0, 20.0);
        let err = compute_cloud_layout_with(
            &input,
            &canvas,
            &CloudLayoutConfig::default(),
            &Broken,
            &mut FixedSource(0.5),
        )
        .expect_err("NaN footprint");
        assert!(matches!(err, LayoutError::InvalidFootprint { index: 0, .. }));
    }

    #[test]
    fn restore_input_order_sorts_by_index() {
        let p = |x: f32| Placement {
            x,
            y: 0.0,
            font_size: 16.0,
            degraded: false,
        };
        let restored = restore_input_order(vec![(2, p(2.0)), (0, p(0.0)), (1, p(1.0))]);
        let xs: Vec<f32> = restored.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn config_deserializes_partial_camel_case() {
        let config: CloudLayoutConfig = serde_json::from_str(
            r#"{"sizeRange":{"minFontSize":14,"maxFontSize":36},"collisionPadding":4,"textMetrics":"glyph"}"#,
        )
        .expect("config json");
        assert_eq!(config.size_range, SizeRange::COMPACT);
        assert_eq!(config.collision_padding, 4.0);
        assert_eq!(config.text_metrics, TextMetricsMode::Glyph);
        assert_eq!(config.max_attempts, 100);
    }
}
