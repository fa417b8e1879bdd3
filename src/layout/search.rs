// Greedy candidate search: spiral out from the center, then probe random
// spots, accepting the first box that clears everything placed so far.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use super::{Canvas, CloudLayoutConfig, RandomSource};

const GRID_CELL: f32 = 48.0;

/// Axis-aligned box of a placed label, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct PlacedRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl PlacedRect {
    pub(super) fn from_center(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self {
            x: cx - w / 2.0,
            y: cy - h / 2.0,
            w,
            h,
        }
    }

    fn inflate(self, pad: f32) -> Self {
        if pad <= 0.0 {
            return self;
        }
        Self {
            x: self.x - pad,
            y: self.y - pad,
            w: self.w + pad * 2.0,
            h: self.h + pad * 2.0,
        }
    }

    /// True when the gap between the boxes is smaller than `pad` on both axes.
    pub(super) fn collides(&self, other: &PlacedRect, pad: f32) -> bool {
        self.x < other.x + other.w + pad
            && other.x < self.x + self.w + pad
            && self.y < other.y + other.h + pad
            && other.y < self.y + self.h + pad
    }
}

/// Keep a `w` x `h` box centered at `center` inside the padded canvas. A box
/// larger than the usable area is centered on that axis.
pub(super) fn clamp_to_canvas(center: (f32, f32), w: f32, h: f32, canvas: &Canvas) -> (f32, f32) {
    let pad = canvas.padding;
    let min_x = pad + w * 0.5;
    let max_x = pad + canvas.usable_width() - w * 0.5;
    let min_y = pad + h * 0.5;
    let max_y = pad + canvas.usable_height() - h * 0.5;

    let x = if max_x < min_x {
        pad + canvas.usable_width() * 0.5
    } else {
        center.0.clamp(min_x, max_x)
    };
    let y = if max_y < min_y {
        pad + canvas.usable_height() * 0.5
    } else {
        center.1.clamp(min_y, max_y)
    };
    (x, y)
}

pub(super) struct CandidateSearch<'a> {
    canvas: &'a Canvas,
    config: &'a CloudLayoutConfig,
    placed: Vec<PlacedRect>,
    grid: ObstacleGrid,
}

impl<'a> CandidateSearch<'a> {
    pub(super) fn new(canvas: &'a Canvas, config: &'a CloudLayoutConfig) -> Self {
        Self {
            canvas,
            config,
            placed: Vec::new(),
            grid: ObstacleGrid::new(GRID_CELL, canvas.width, canvas.height),
        }
    }

    /// First collision-free center for a `w` x `h` box, claiming it on success.
    pub(super) fn find(
        &mut self,
        w: f32,
        h: f32,
        rng: &mut dyn RandomSource,
    ) -> Option<(f32, f32)> {
        for attempt in 0..self.config.max_attempts {
            let raw = if attempt < self.config.spiral_attempts {
                self.spiral_point(attempt)
            } else {
                self.random_point(w, h, rng)
            };
            if !raw.0.is_finite() || !raw.1.is_finite() {
                continue;
            }
            let (x, y) = clamp_to_canvas(raw, w, h, self.canvas);
            let rect = PlacedRect::from_center(x, y, w, h);
            if !self.collides(&rect) {
                trace!(attempt, x, y, "candidate accepted");
                self.insert(rect);
                return Some((x, y));
            }
        }
        None
    }

    /// Register a box placed outside the search (fallback grid) so later
    /// searches steer around it.
    pub(super) fn occupy(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.insert(PlacedRect::from_center(x, y, w, h));
    }

    fn spiral_point(&self, attempt: usize) -> (f32, f32) {
        let angle = attempt as f32 * self.config.spiral_angle_step;
        let radius = attempt as f32 * self.config.spiral_radius_step;
        let center_x = self.canvas.usable_width() / 2.0;
        let center_y = self.canvas.usable_height() / 2.0;
        (
            center_x + angle.cos() * radius,
            center_y + angle.sin() * radius,
        )
    }

    fn random_point(&self, w: f32, h: f32, rng: &mut dyn RandomSource) -> (f32, f32) {
        let pad = self.canvas.padding;
        let span_x = (self.canvas.usable_width() - w).max(0.0);
        let span_y = (self.canvas.usable_height() - h).max(0.0);
        let x = pad + w / 2.0 + rng.next_unit() * span_x;
        let y = pad + h / 2.0 + rng.next_unit() * span_y;
        (x, y)
    }

    fn collides(&self, rect: &PlacedRect) -> bool {
        let pad = self.config.collision_padding;
        self.grid
            .query(rect)
            .any(|idx| self.placed[idx].collides(rect, pad))
    }

    fn insert(&mut self, rect: PlacedRect) {
        let idx = self.placed.len();
        // One extra unit keeps float rounding at cell edges from hiding a hit.
        self.grid
            .insert(idx, &rect.inflate(self.config.collision_padding + 1.0));
        self.placed.push(rect);
    }
}

/// Uniform-cell index over placed boxes. Boxes are stored inflated past the
/// collision padding so a query with the bare candidate box returns every
/// box that could collide with it.
///
/// Spans are clipped to the canvas cells. Every box is centered inside the
/// canvas, so two overlapping boxes always overlap somewhere on it too.
struct ObstacleGrid {
    cell: f32,
    max_ix: i32,
    max_iy: i32,
    cells: HashMap<(i32, i32), Vec<usize>>,
}

impl ObstacleGrid {
    fn new(cell: f32, width: f32, height: f32) -> Self {
        let cell = cell.max(16.0);
        Self {
            cell,
            max_ix: (width / cell).ceil().max(0.0) as i32,
            max_iy: (height / cell).ceil().max(0.0) as i32,
            cells: HashMap::new(),
        }
    }

    fn cell_span(&self, rect: &PlacedRect) -> (i32, i32, i32, i32) {
        let index = |v: f32, max: i32| ((v / self.cell).floor() as i32).clamp(0, max);
        let x0 = index(rect.x, self.max_ix);
        let y0 = index(rect.y, self.max_iy);
        let x1 = index(rect.x + rect.w, self.max_ix);
        let y1 = index(rect.y + rect.h, self.max_iy);
        (x0, y0, x1, y1)
    }

    fn insert(&mut self, idx: usize, rect: &PlacedRect) {
        let (x0, y0, x1, y1) = self.cell_span(rect);
        for ix in x0..=x1 {
            for iy in y0..=y1 {
                self.cells.entry((ix, iy)).or_default().push(idx);
            }
        }
    }

    /// Indices of boxes sharing a cell with `rect`, each reported once.
    fn query(&self, rect: &PlacedRect) -> impl Iterator<Item = usize> + '_ {
        let (x0, y0, x1, y1) = self.cell_span(rect);
        let mut seen = HashSet::new();
        (x0..=x1)
            .flat_map(move |ix| (y0..=y1).map(move |iy| (ix, iy)))
            .flat_map(move |key| {
                self.cells
                    .get(&key)
                    .map(|v| v.as_slice())
                    .unwrap_or(&[])
                    .iter()
                    .copied()
            })
            .filter(move |idx| seen.insert(*idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FixedSource;

    #[test]
    fn collides_within_padding_gap() {
        let a = PlacedRect::from_center(50.0, 50.0, 20.0, 10.0);
        // Right edge of `a` is 60; this box starts at 65.
        let b = PlacedRect::from_center(75.0, 50.0, 20.0, 10.0);
        assert!(b.collides(&a, 8.0));
        assert!(!b.collides(&a, 4.0));
    }

    #[test]
    fn no_collision_when_separated_on_one_axis() {
        let a = PlacedRect::from_center(50.0, 50.0, 20.0, 10.0);
        let b = PlacedRect::from_center(50.0, 80.0, 20.0, 10.0);
        assert!(!a.collides(&b, 8.0));
        assert!(!b.collides(&a, 8.0));
    }

    #[test]
    fn clamp_keeps_box_inside_padding() {
        let canvas = Canvas::new(200.0, 100.0, 10.0);
        let (x, y) = clamp_to_canvas((0.0, 500.0), 40.0, 20.0, &canvas);
        assert_eq!(x, 30.0);
        assert_eq!(y, 80.0);
    }

    #[test]
    fn clamp_no_op_when_inside() {
        let canvas = Canvas::new(200.0, 100.0, 10.0);
        assert_eq!(clamp_to_canvas((100.0, 50.0), 40.0, 20.0, &canvas), (100.0, 50.0));
    }

    #[test]
    fn clamp_centers_oversized_box() {
        let canvas = Canvas::new(200.0, 100.0, 10.0);
        let (x, _) = clamp_to_canvas((0.0, 50.0), 500.0, 20.0, &canvas);
        assert_eq!(x, 100.0);
    }

    #[test]
    fn obstacle_grid_query_finds_nearby_rect() {
        let mut grid = ObstacleGrid::new(20.0, 400.0, 400.0);
        grid.insert(0, &PlacedRect::from_center(20.0, 20.0, 20.0, 20.0));
        let hits: Vec<usize> = grid
            .query(&PlacedRect::from_center(17.0, 17.0, 5.0, 5.0))
            .collect();
        assert_eq!(hits, vec![0]);
    }

    #[test]
    fn obstacle_grid_query_misses_distant_rect() {
        let mut grid = ObstacleGrid::new(20.0, 400.0, 400.0);
        grid.insert(0, &PlacedRect::from_center(20.0, 20.0, 20.0, 20.0));
        let hits: Vec<usize> = grid
            .query(&PlacedRect::from_center(200.0, 200.0, 5.0, 5.0))
            .collect();
        assert!(hits.is_empty());
    }

    #[test]
    fn obstacle_grid_clips_huge_rect_to_canvas_cells() {
        let mut grid = ObstacleGrid::new(20.0, 100.0, 60.0);
        grid.insert(0, &PlacedRect::from_center(50.0, 30.0, 1.0e12, 1.0e12));
        // 0..=5 columns by 0..=3 rows.
        assert_eq!(grid.cells.len(), 6 * 4);
        let hits: Vec<usize> = grid
            .query(&PlacedRect::from_center(90.0, 50.0, 4.0, 4.0))
            .collect();
        assert_eq!(hits, vec![0]);
    }

    #[test]
    fn search_rejects_neighbour_of_oversized_box() {
        let canvas = Canvas::new(400.0, 300.0, 20.0);
        let config = CloudLayoutConfig::default();
        let mut search = CandidateSearch::new(&canvas, &config);
        let mut rng = FixedSource(0.5);
        assert!(search.find(1.0e12, 1.0e12, &mut rng).is_some());
        assert!(search.find(20.0, 10.0, &mut rng).is_none());
    }

    #[test]
    fn search_places_second_box_clear_of_first() {
        let canvas = Canvas::new(400.0, 300.0, 20.0);
        let config = CloudLayoutConfig::default();
        let mut search = CandidateSearch::new(&canvas, &config);
        let mut rng = FixedSource(0.5);
        let first = search.find(100.0, 30.0, &mut rng).expect("first box fits");
        let second = search.find(100.0, 30.0, &mut rng).expect("second box fits");
        let a = PlacedRect::from_center(first.0, first.1, 100.0, 30.0);
        let b = PlacedRect::from_center(second.0, second.1, 100.0, 30.0);
        assert!(!a.collides(&b, config.collision_padding));
    }

    #[test]
    fn search_gives_up_when_canvas_is_full() {
        let canvas = Canvas::new(100.0, 60.0, 10.0);
        let config = CloudLayoutConfig::default();
        let mut search = CandidateSearch::new(&canvas, &config);
        let mut rng = FixedSource(0.25);
        assert!(search.find(80.0, 40.0, &mut rng).is_some());
        assert!(search.find(80.0, 40.0, &mut rng).is_none());
    }
}
