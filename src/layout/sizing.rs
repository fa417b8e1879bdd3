use std::cmp::Ordering;

use super::{SizeRange, WeightedItem};

/// Linear map from `weight` within `[min_weight, max_weight]` onto the font
/// size range. When every weight ties the minimum font size is used.
pub fn font_size_for_weight(weight: f32, min_weight: f32, max_weight: f32, range: SizeRange) -> f32 {
    if max_weight == min_weight {
        return range.min_font_size;
    }
    let t = (weight - min_weight) / (max_weight - min_weight);
    let size = range.min_font_size + t * (range.max_font_size - range.min_font_size);
    size.clamp(range.min_font_size, range.max_font_size)
}

pub(super) fn font_sizes(items: &[WeightedItem], range: SizeRange) -> Vec<f32> {
    let (min_weight, max_weight) = items.iter().fold(
        (f32::INFINITY, f32::NEG_INFINITY),
        |(lo, hi), item| (lo.min(item.weight), hi.max(item.weight)),
    );
    items
        .iter()
        .map(|item| font_size_for_weight(item.weight, min_weight, max_weight, range))
        .collect()
}

/// Item indices, heaviest first. Equal weights keep their input order.
pub(super) fn descending_weight_order(items: &[WeightedItem]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| {
        items[b]
            .weight
            .partial_cmp(&items[a].weight)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.cmp(&b))
    });
    order
}
