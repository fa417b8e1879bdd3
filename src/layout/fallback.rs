use super::Canvas;
use super::search::clamp_to_canvas;

/// Coarse `cols x rows` grid over the usable area, indexed by a label's rank
/// in the heaviest-first order. Cells are not checked against searched
/// placements.
pub(super) struct FallbackGrid<'a> {
    canvas: &'a Canvas,
    cols: usize,
    cell_w: f32,
    cell_h: f32,
}

impl<'a> FallbackGrid<'a> {
    pub(super) fn new(canvas: &'a Canvas, item_count: usize) -> Self {
        let count = item_count.max(1);
        let cols = (count as f32).sqrt().ceil().max(1.0) as usize;
        let rows = count.div_ceil(cols);
        Self {
            canvas,
            cols,
            cell_w: canvas.usable_width() / cols as f32,
            cell_h: canvas.usable_height() / rows as f32,
        }
    }

    /// Center of the cell for `rank`, clamped so a `w` x `h` box stays
    /// inside the canvas.
    pub(super) fn cell_center(&self, rank: usize, w: f32, h: f32) -> (f32, f32) {
        let row = rank / self.cols;
        let col = rank % self.cols;
        let x = self.canvas.padding + col as f32 * self.cell_w + self.cell_w / 2.0;
        let y = self.canvas.padding + row as f32 * self.cell_h + self.cell_h / 2.0;
        clamp_to_canvas((x, y), w, h, self.canvas)
    }
}
