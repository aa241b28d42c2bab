//! Grid line drawing.
//!
//! A grid is described by its line offsets along each axis. Offsets are in
//! target coordinates and may start at `-1` when there is no leading line.
//! Inner lines are the offsets strictly between the first and last; outer
//! lines are the first and last. Junction glyphs are picked from which
//! directions lines actually continue in, so corners and tees appear only
//! where lines meet.

use super::buffer::FrameBuffer;
use crate::types::{Attr, BorderGlyphs, Rgba};

/// Everything needed to draw a table's grid lines in one call.
#[derive(Debug, Clone, Copy)]
pub struct GridSpec<'a> {
    pub glyphs: BorderGlyphs,
    pub fg: Rgba,
    pub bg: Rgba,
    pub column_offsets: &'a [i32],
    pub row_offsets: &'a [i32],
    pub draw_inner: bool,
    pub draw_outer: bool,
}

impl GridSpec<'_> {
    /// Offsets that carry a drawn line on one axis.
    fn lines(&self, offsets: &[i32]) -> Vec<i32> {
        let last = offsets.len().saturating_sub(1);
        offsets
            .iter()
            .enumerate()
            .filter(|&(i, &o)| {
                let outer = i == 0 || i == last;
                o >= 0 && if outer { self.draw_outer } else { self.draw_inner }
            })
            .map(|(_, &o)| o)
            .collect()
    }

    /// Vertical line x positions.
    pub fn vertical_lines(&self) -> Vec<i32> {
        self.lines(self.column_offsets)
    }

    /// Horizontal line y positions.
    pub fn horizontal_lines(&self) -> Vec<i32> {
        self.lines(self.row_offsets)
    }
}

/// Inclusive extent a line covers along the other axis.
fn span(offsets: &[i32]) -> Option<(i32, i32)> {
    let first = *offsets.first()?;
    let last = *offsets.last()?;
    Some((first.max(0), last))
}

pub(super) fn draw_grid(buffer: &mut FrameBuffer, grid: &GridSpec<'_>) {
    if grid.column_offsets.len() < 2 || grid.row_offsets.len() < 2 {
        return;
    }
    let (Some((x0, x1)), Some((y0, y1))) = (span(grid.column_offsets), span(grid.row_offsets)) else {
        return;
    };

    let xs = grid.vertical_lines();
    let ys = grid.horizontal_lines();

    let vertical = |x: i32, y: i32| xs.contains(&x) && (y0..=y1).contains(&y);
    let horizontal = |x: i32, y: i32| ys.contains(&y) && (x0..=x1).contains(&x);

    let glyph_at = |x: i32, y: i32| {
        let v = vertical(x, y);
        let h = horizontal(x, y);
        grid.glyphs.junction(
            v && vertical(x, y - 1),
            v && vertical(x, y + 1),
            h && horizontal(x - 1, y),
            h && horizontal(x + 1, y),
        )
    };

    let mut put = |x: i32, y: i32| {
        if let (Ok(cx), Ok(cy)) = (u16::try_from(x), u16::try_from(y)) {
            buffer.draw_char(cx, cy, glyph_at(x, y), grid.fg, Some(grid.bg), Attr::NONE, None);
        }
    };

    for &x in &xs {
        for y in y0..=y1 {
            put(x, y);
        }
    }
    for &y in &ys {
        for x in x0..=x1 {
            if !xs.contains(&x) {
                put(x, y);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::PaintTarget;
    use crate::types::BorderStyle;

    fn spec<'a>(cols: &'a [i32], rows: &'a [i32], inner: bool, outer: bool) -> GridSpec<'a> {
        GridSpec {
            glyphs: BorderStyle::Single.glyphs(),
            fg: Rgba::WHITE,
            bg: Rgba::TRANSPARENT,
            column_offsets: cols,
            row_offsets: rows,
            draw_inner: inner,
            draw_outer: outer,
        }
    }

    #[test]
    fn test_full_grid_junctions() {
        let mut buffer = FrameBuffer::new(5, 5);
        buffer.draw_grid(&spec(&[0, 2, 4], &[0, 2, 4], true, true));
        assert_eq!(buffer.to_text(), "┌─┬─┐\n│ │ │\n├─┼─┤\n│ │ │\n└─┴─┘");
    }

    #[test]
    fn test_outer_only() {
        let mut buffer = FrameBuffer::new(5, 3);
        buffer.draw_grid(&spec(&[0, 2, 4], &[0, 2], false, true));
        assert_eq!(buffer.to_text(), "┌───┐\n│   │\n└───┘");
    }

    #[test]
    fn test_inner_only_has_no_corners() {
        let mut buffer = FrameBuffer::new(3, 3);
        buffer.draw_grid(&spec(&[-1, 1, 2], &[-1, 1, 2], true, false));
        assert_eq!(buffer.to_text(), " │ \n─┼─\n │ ");
    }

    #[test]
    fn test_degenerate_offsets_draw_nothing() {
        let mut buffer = FrameBuffer::new(3, 3);
        buffer.draw_grid(&spec(&[0], &[0, 2], true, true));
        assert_eq!(buffer.to_text(), "   \n   \n   ");
    }

    #[test]
    fn test_line_positions() {
        let grid = spec(&[-1, 3, 7, 9], &[0, 2], true, false);
        assert_eq!(grid.vertical_lines(), vec![3, 7]);
        assert!(grid.horizontal_lines().is_empty());
    }
}
