//! Column widths, row heights and border-aware offsets.
//!
//! # Offsets
//!
//! Offsets mark border slots. Walking the parts in order, the first offset is
//! `0` when a leading border exists and `-1` otherwise; each next offset adds
//! the part's size plus one if a border line follows it. Part `i` occupies
//! `offset[i] + 1 .. offset[i] + 1 + size[i]`, and the table extends to
//! `offset[last] + 1`.
//!
//! # Fitting
//!
//! Columns start at their intrinsic (unwrapped) width. With a width
//! constraint they either grow evenly (fill mode) or shrink by
//! largest-remainder apportionment of the overflow, never below a per-column
//! floor. Without wrapping nothing shrinks.

use std::ops::Range;

use super::border::BorderLayout;
use super::grid::CellGrid;
use crate::types::{ClipRect, ColumnWidthMode, WrapMode};

/// Inputs that shape a layout besides the cells themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutParams {
    pub padding: usize,
    pub wrap_mode: WrapMode,
    pub width_mode: ColumnWidthMode,
    pub borders: BorderLayout,
}

impl LayoutParams {
    /// Smallest width or height any cell may have.
    pub fn min_cell_size(&self) -> usize {
        1 + 2 * self.padding
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableLayout {
    pub column_widths: Vec<usize>,
    pub row_heights: Vec<usize>,
    pub column_offsets: Vec<i32>,
    pub row_offsets: Vec<i32>,
    pub table_width: usize,
    pub table_height: usize,
    pub padding: usize,
}

impl TableLayout {
    pub fn is_empty(&self) -> bool {
        self.column_widths.is_empty() || self.row_heights.is_empty()
    }

    /// Columns `x` covers for column `col`, padding included.
    pub fn column_band(&self, col: usize) -> Range<i32> {
        let start = self.column_offsets[col] + 1;
        start..start + self.column_widths[col] as i32
    }

    /// Rows `y` covers for row `row`, padding included.
    pub fn row_band(&self, row: usize) -> Range<i32> {
        let start = self.row_offsets[row] + 1;
        start..start + self.row_heights[row] as i32
    }

    pub fn column_at(&self, x: i32) -> Option<usize> {
        (0..self.column_widths.len()).find(|&c| self.column_band(c).contains(&x))
    }

    pub fn row_at(&self, y: i32) -> Option<usize> {
        (0..self.row_heights.len()).find(|&r| self.row_band(r).contains(&y))
    }

    /// Top-left of a cell's text, inside its padding.
    pub fn content_origin(&self, row: usize, col: usize) -> (i32, i32) {
        let p = self.padding as i32;
        (self.column_offsets[col] + 1 + p, self.row_offsets[row] + 1 + p)
    }

    /// The cell band, padding included.
    pub fn cell_rect(&self, row: usize, col: usize) -> ClipRect {
        let (x, y) = (self.column_band(col).start, self.row_band(row).start);
        ClipRect::new(
            clamp_u16(x),
            clamp_u16(y),
            clamp_u16(self.column_widths[col] as i32),
            clamp_u16(self.row_heights[row] as i32),
        )
    }

    /// The text area of a cell.
    pub fn content_rect(&self, row: usize, col: usize) -> ClipRect {
        let (x, y) = self.content_origin(row, col);
        let (w, h) = self.content_size(row, col);
        ClipRect::new(clamp_u16(x), clamp_u16(y), w, h)
    }

    pub fn content_size(&self, row: usize, col: usize) -> (u16, u16) {
        let inset = 2 * self.padding;
        (
            clamp_u16(self.column_widths[col].saturating_sub(inset).max(1) as i32),
            clamp_u16(self.row_heights[row].saturating_sub(inset).max(1) as i32),
        )
    }
}

fn clamp_u16(v: i32) -> u16 {
    v.clamp(0, u16::MAX as i32) as u16
}

/// Lay out every cell for an optional width constraint (whole cells).
pub fn compute_layout(grid: &CellGrid, params: &LayoutParams, width: Option<usize>) -> TableLayout {
    if grid.is_degenerate() {
        return TableLayout {
            padding: params.padding,
            ..TableLayout::default()
        };
    }

    let columns = grid.column_count();
    let min = params.min_cell_size();
    let inset = 2 * params.padding;

    let intrinsic: Vec<usize> = (0..columns)
        .map(|c| {
            grid.rows()
                .iter()
                .filter_map(|row| row.get(c))
                .map(|cell| cell.natural_width() + inset)
                .max()
                .unwrap_or(0)
                .max(min)
        })
        .collect();

    let vertical = params.borders.vertical_count(columns);
    let column_widths = fit_columns(&intrinsic, width, vertical, params);

    let row_heights: Vec<usize> = grid
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .zip(&column_widths)
                .map(|(cell, w)| cell.line_count(w.saturating_sub(inset).max(1)) + inset)
                .max()
                .unwrap_or(0)
                .max(min)
        })
        .collect();

    let b = &params.borders;
    let column_offsets = build_offsets(&column_widths, b.left, b.inner_vertical, b.right);
    let row_offsets = build_offsets(&row_heights, b.top, b.inner_horizontal, b.bottom);

    let table_width = extent(&column_offsets);
    let table_height = extent(&row_offsets);

    TableLayout {
        column_widths,
        row_heights,
        column_offsets,
        row_offsets,
        table_width,
        table_height,
        padding: params.padding,
    }
}

fn extent(offsets: &[i32]) -> usize {
    offsets.last().map_or(0, |last| (last + 1).max(0) as usize)
}

/// Offsets for a run of parts with optional leading, inner and trailing
/// border slots.
pub fn build_offsets(sizes: &[usize], leading: bool, inner: bool, trailing: bool) -> Vec<i32> {
    let mut offsets = Vec::with_capacity(sizes.len() + 1);
    let mut at: i32 = if leading { 0 } else { -1 };
    offsets.push(at);

    for (i, &size) in sizes.iter().enumerate() {
        let border_follows = if i + 1 < sizes.len() { inner } else { trailing };
        at += size as i32 + border_follows as i32;
        offsets.push(at);
    }

    offsets
}

/// Fit intrinsic column widths to a width constraint.
///
/// `vertical_borders` is the number of border slots the row spends on
/// vertical lines.
pub fn fit_columns(
    intrinsic: &[usize],
    width: Option<usize>,
    vertical_borders: usize,
    params: &LayoutParams,
) -> Vec<usize> {
    let Some(width) = width.filter(|w| *w > 0) else {
        return intrinsic.to_vec();
    };
    if intrinsic.is_empty() {
        return Vec::new();
    }

    let target = width.saturating_sub(vertical_borders).max(1);
    let total: usize = intrinsic.iter().sum();

    if total < target {
        return match params.width_mode {
            ColumnWidthMode::Fill => grow(intrinsic, target - total),
            ColumnWidthMode::Content => intrinsic.to_vec(),
        };
    }
    if total > target && params.wrap_mode.wraps() {
        return shrink(intrinsic, target, params.min_cell_size());
    }

    intrinsic.to_vec()
}

/// Spread `extra` evenly; the leftmost columns take the remainder.
fn grow(intrinsic: &[usize], extra: usize) -> Vec<usize> {
    let n = intrinsic.len();
    let (each, rest) = (extra / n, extra % n);
    intrinsic
        .iter()
        .enumerate()
        .map(|(i, w)| w + each + usize::from(i < rest))
        .collect()
}

/// Shrink toward `target`, proportionally to each column's slack above its
/// floor, settling rounding by largest remainder (ties to the lower index).
fn shrink(intrinsic: &[usize], target: usize, hard_min: usize) -> Vec<usize> {
    let relaxed: Vec<usize> = intrinsic.iter().map(|&w| w.min(hard_min + 1)).collect();
    let floors = if relaxed.iter().sum::<usize>() <= target {
        relaxed
    } else {
        intrinsic.iter().map(|&w| w.min(hard_min)).collect()
    };

    let slack: Vec<usize> = intrinsic.iter().zip(&floors).map(|(w, f)| w - f).collect();
    let total_slack: usize = slack.iter().sum();
    let required = intrinsic.iter().sum::<usize>() - target;

    if required >= total_slack {
        return floors;
    }

    let mut cut: Vec<usize> = slack.iter().map(|s| required * s / total_slack).collect();
    let mut leftover = required - cut.iter().sum::<usize>();

    let mut order: Vec<usize> = (0..intrinsic.len()).collect();
    order.sort_by_key(|&c| (std::cmp::Reverse(required * slack[c] % total_slack), c));

    for c in order {
        if leftover == 0 {
            break;
        }
        if cut[c] < slack[c] {
            cut[c] += 1;
            leftover -= 1;
        }
    }

    intrinsic.iter().zip(&cut).map(|(w, c)| w - c).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::cell::CellSettings;
    use crate::text::{TextStyle, content_from_text};

    fn params(padding: usize, wrap: WrapMode, mode: ColumnWidthMode) -> LayoutParams {
        LayoutParams {
            padding,
            wrap_mode: wrap,
            width_mode: mode,
            borders: BorderLayout::resolve(true, None, 2, 2),
        }
    }

    fn grid(rows: &[&[&str]]) -> CellGrid {
        let mut grid = CellGrid::new();
        let settings = CellSettings {
            wrap_mode: WrapMode::Word,
            style: TextStyle::default(),
            selection_bg: None,
            selection_fg: None,
        };
        grid.reconcile(&content_from_text(rows), &settings);
        grid
    }

    #[test]
    fn test_offsets_with_and_without_outer() {
        assert_eq!(build_offsets(&[3, 3], true, true, true), vec![0, 4, 8]);
        assert_eq!(build_offsets(&[1, 1], false, true, false), vec![-1, 1, 2]);
        assert_eq!(build_offsets(&[2, 2], true, false, true), vec![0, 2, 5]);
    }

    #[test]
    fn test_fill_grows_leftmost_first() {
        let p = params(0, WrapMode::Word, ColumnWidthMode::Fill);
        assert_eq!(fit_columns(&[1, 1], Some(34), 3, &p), vec![16, 15]);
        assert_eq!(fit_columns(&[2, 5, 1], Some(14), 4, &p), vec![3, 6, 1]);
    }

    #[test]
    fn test_content_mode_never_grows() {
        let p = params(0, WrapMode::Word, ColumnWidthMode::Content);
        assert_eq!(fit_columns(&[1, 1], Some(34), 3, &p), vec![1, 1]);
    }

    #[test]
    fn test_no_wrap_never_shrinks() {
        let p = params(0, WrapMode::None, ColumnWidthMode::Fill);
        assert_eq!(fit_columns(&[10, 10], Some(8), 3, &p), vec![10, 10]);
    }

    #[test]
    fn test_shrink_largest_remainder() {
        let p = params(0, WrapMode::Word, ColumnWidthMode::Content);
        // slack above floor 2: [8, 4, 2]; required 5 over 14 slack
        // shares 2.857, 1.428, 0.714 -> cuts 2, 1, 0; leftover 2 to cols 0, 2
        assert_eq!(fit_columns(&[10, 6, 4], Some(15), 0, &p), vec![7, 5, 3]);
    }

    #[test]
    fn test_shrink_ties_go_to_lower_index() {
        let p = params(0, WrapMode::Word, ColumnWidthMode::Content);
        assert_eq!(fit_columns(&[6, 6], Some(11), 0, &p), vec![5, 6]);
    }

    #[test]
    fn test_shrink_stops_at_floor() {
        let p = params(1, WrapMode::Word, ColumnWidthMode::Content);
        assert_eq!(fit_columns(&[10, 10], Some(4), 3, &p), vec![3, 3]);
    }

    #[test]
    fn test_shrink_uses_relaxed_floor_when_it_fits() {
        let p = params(0, WrapMode::Char, ColumnWidthMode::Content);
        assert_eq!(fit_columns(&[5, 5], Some(4), 0, &p), vec![2, 2]);
        assert_eq!(fit_columns(&[5, 5], Some(2), 0, &p), vec![1, 1]);
    }

    #[test]
    fn test_compute_layout_wraps_rows() {
        let grid = grid(&[&["hello world", "x"]]);
        let p = params(0, WrapMode::Word, ColumnWidthMode::Content);
        let layout = compute_layout(&grid, &p, Some(10));

        // intrinsic [11, 1] into 7 content cells
        assert_eq!(layout.column_widths.iter().sum::<usize>(), 7);
        assert_eq!(layout.row_heights, vec![2]);
        assert_eq!(layout.table_width, 10);
        assert_eq!(layout.table_height, 4);
    }

    #[test]
    fn test_compute_layout_padding() {
        let grid = grid(&[&["A", "B"], &["1", "2"]]);
        let layout = compute_layout(&grid, &params(1, WrapMode::Word, ColumnWidthMode::Content), None);

        assert_eq!(layout.column_widths, vec![3, 3]);
        assert_eq!(layout.row_heights, vec![3, 3]);
        assert_eq!(layout.column_offsets, vec![0, 4, 8]);
        assert_eq!(layout.content_origin(1, 1), (6, 6));
        assert_eq!(layout.content_rect(0, 0), ClipRect::new(2, 2, 1, 1));
    }

    #[test]
    fn test_hit_bands() {
        let grid = grid(&[&["ab", "c"]]);
        let layout = compute_layout(&grid, &params(0, WrapMode::Word, ColumnWidthMode::Content), None);
        // │ab│c│
        assert_eq!(layout.column_at(0), None);
        assert_eq!(layout.column_at(1), Some(0));
        assert_eq!(layout.column_at(3), None);
        assert_eq!(layout.column_at(4), Some(1));
        assert_eq!(layout.row_at(1), Some(0));
        assert_eq!(layout.row_at(2), None);
    }

    #[test]
    fn test_degenerate_layout_is_empty() {
        let layout = compute_layout(&CellGrid::new(), &params(0, WrapMode::Word, ColumnWidthMode::Fill), Some(20));
        assert!(layout.is_empty());
        assert_eq!(layout.table_width, 0);
    }
}
