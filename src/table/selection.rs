//! Mapping a drag selection onto cells.
//!
//! The selection arrives in screen coordinates. It is moved into table space
//! by the table's position, then into each affected cell's space by that
//! cell's content origin. Cells take it from there: a point above or left of
//! a cell clamps to its start, below or right clamps to its end, so a
//! rectangle across many cells selects the reading-order span in each.

use tracing::trace;

use super::layout::TableLayout;
use super::{RowRange, TextTable};
use crate::selection::{Point, Selection};
use crate::text::TextSelection;

/// Rows whose bands overlap `[min_y, max_y]`.
fn row_range(layout: &TableLayout, (min_y, max_y): (i32, i32)) -> Option<RowRange> {
    let rows = layout.row_heights.len();
    let first = (0..rows).find(|&r| layout.row_band(r).end > min_y)?;
    let last = (0..rows).rev().find(|&r| layout.row_band(r).start <= max_y)?;
    (first <= last).then_some((first, last))
}

fn union(a: Option<RowRange>, b: Option<RowRange>) -> Option<RowRange> {
    match (a, b) {
        (Some(a), Some(b)) => Some((a.0.min(b.0), a.1.max(b.1))),
        (a, None) => a,
        (None, b) => b,
    }
}

impl TextTable {
    /// Whether a press at screen point `(x, y)` lands inside a cell rather
    /// than on a border slot or outside the table.
    pub fn should_start_selection(&mut self, x: i32, y: i32) -> bool {
        self.ensure_layout();
        let Some(layout) = self.layout.as_ref().filter(|l| !l.is_empty()) else {
            return false;
        };
        let (lx, ly) = (x - self.bounds.x as i32, y - self.bounds.y as i32);
        layout.column_at(lx).is_some() && layout.row_at(ly).is_some()
    }

    /// Apply a selection change. `None` (or an inactive selection) clears.
    ///
    /// Returns whether any cell now has a selection.
    pub fn on_selection_changed(&mut self, selection: Option<&Selection>) -> bool {
        self.ensure_layout();

        let origin = Point::new(self.bounds.x as i32, self.bounds.y as i32);
        let local = selection.filter(|s| s.is_active).map(|s| s.local_bounds(origin));
        let settings = self.cell_settings();

        let Some(layout) = self.layout.as_ref() else {
            return false;
        };
        let rows = local
            .filter(|_| !layout.is_empty())
            .and_then(|b| row_range(layout, b.vertical_span()));

        for (r, c, cell) in self.grid.cells_mut() {
            match (local, rows) {
                (Some(bounds), Some((first, last))) if (first..=last).contains(&r) => {
                    let (ox, oy) = layout.content_origin(r, c);
                    let b = bounds.translated(ox, oy);
                    let (anchor, focus) = ((b.anchor_x, b.anchor_y), (b.focus_x, b.focus_y));
                    if b.is_start {
                        cell.set_local_selection(anchor, focus, &settings);
                    } else {
                        cell.update_local_selection(anchor, focus, &settings);
                    }
                }
                _ => {
                    cell.reset_local_selection();
                }
            }
        }

        let dirty = union(self.selected_rows, rows);
        trace!(?rows, ?dirty, "selection mapped to rows");
        self.selected_rows = rows;
        self.dirty_rows = dirty;

        if let Some(band) = dirty {
            self.repaint_rows(band);
        }

        self.has_selection()
    }

    pub fn has_selection(&self) -> bool {
        self.grid.cells().any(|(_, _, cell)| cell.has_selection())
    }

    /// The range selected in the first selected cell, in reading order.
    ///
    /// This is one cell's range, not a table-wide span; use
    /// [`TextTable::selected_text`] for the whole selection.
    pub fn selection(&self) -> Option<TextSelection> {
        self.grid.cells().find_map(|(_, _, cell)| cell.selection())
    }

    /// Selected text: cells joined by tabs, rows by newlines. Rows without a
    /// selected cell are skipped.
    pub fn selected_text(&self) -> String {
        self.grid
            .rows()
            .iter()
            .filter_map(|row| {
                let parts: Vec<String> = row
                    .iter()
                    .filter(|cell| cell.has_selection())
                    .map(|cell| cell.selected_text())
                    .filter(|text| !text.is_empty())
                    .collect();
                (!parts.is_empty()).then(|| parts.join("\t"))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TableOptions;
    use crate::text::content_from_text;
    use crate::types::{ClipRect, Rgba};

    fn drag(table: &mut TextTable, from: (i32, i32), to: (i32, i32)) -> bool {
        let mut sel = Selection::start(Point::new(from.0, from.1));
        table.on_selection_changed(Some(&sel));
        sel.focus = Point::new(to.0, to.1);
        sel.is_start = false;
        table.on_selection_changed(Some(&sel))
    }

    fn table() -> TextTable {
        // ┌─────┬─────┐
        // │alpha│beta │
        // ├─────┼─────┤
        // │gamma│delta│
        // └─────┴─────┘
        let mut t = TextTable::with_content(
            &content_from_text(&[["alpha", "beta"], ["gamma", "delta"]]),
            TableOptions::default(),
        );
        t.set_bounds(ClipRect::new(10, 5, 13, 5));
        t
    }

    #[test]
    fn test_should_start_only_inside_cells() {
        let mut t = table();
        assert!(!t.should_start_selection(10, 6));
        assert!(t.should_start_selection(11, 6));
        assert!(!t.should_start_selection(16, 6));
        assert!(t.should_start_selection(17, 8));
        assert!(!t.should_start_selection(11, 7));
        assert!(!t.should_start_selection(30, 6));
    }

    #[test]
    fn test_single_cell_selection() {
        let mut t = table();
        assert!(drag(&mut t, (12, 6), (15, 6)));
        assert_eq!(t.selected_text(), "lph");
        assert_eq!(t.selection(), Some(TextSelection { start: 1, end: 4 }));
    }

    #[test]
    fn test_selection_across_cells_and_rows() {
        let mut t = table();
        drag(&mut t, (13, 6), (19, 8));
        assert_eq!(t.selected_text(), "pha\tbeta\ngamma\tde");
        // first selected cell only
        assert_eq!(t.selection(), Some(TextSelection { start: 2, end: 5 }));
    }

    #[test]
    fn test_shrinking_selection_marks_old_rows_dirty() {
        let mut t = table();
        t.render();
        drag(&mut t, (11, 6), (13, 8));
        assert_eq!(t.dirty_rows(), Some((0, 1)));

        let sel = Selection {
            anchor: Point::new(11, 6),
            focus: Point::new(13, 6),
            is_start: false,
            is_active: true,
        };
        t.on_selection_changed(Some(&sel));
        assert_eq!(t.dirty_rows(), Some((0, 1)));
        assert_eq!(t.selected_text(), "al");
    }

    #[test]
    fn test_retract_to_start_clears() {
        let mut t = table();
        drag(&mut t, (11, 6), (14, 6));
        assert!(t.has_selection());

        let sel = Selection {
            anchor: Point::new(11, 6),
            focus: Point::new(11, 6),
            is_start: false,
            is_active: true,
        };
        assert!(!t.on_selection_changed(Some(&sel)));
        assert_eq!(t.selected_text(), "");
    }

    #[test]
    fn test_clear_resets_every_cell() {
        let mut t = table();
        drag(&mut t, (11, 6), (19, 8));
        assert!(!t.on_selection_changed(None));
        assert!(!t.has_selection());
        assert_eq!(t.dirty_rows(), Some((0, 1)));
    }

    #[test]
    fn test_selection_outside_rows_selects_nothing() {
        let mut t = table();
        assert!(!drag(&mut t, (11, 0), (20, 2)));
        assert_eq!(t.dirty_rows(), None);
    }

    #[test]
    fn test_incremental_repaint_with_opaque_background() {
        let mut t = table();
        t.set_background_color(Rgba::BLACK);
        t.set_selection_bg(Some(Rgba::BLUE));
        t.render();

        drag(&mut t, (11, 6), (13, 6));
        let stats = t.stats();
        assert_eq!(stats.full_repaints, 1);
        assert_eq!(stats.incremental_repaints, 2);
        assert!(!t.is_raster_dirty());

        let raster = t.render();
        assert_eq!(raster.get(1, 1).unwrap().bg, Rgba::BLUE);
        assert_eq!(raster.get(3, 1).unwrap().bg, Rgba::BLACK);
        assert_eq!(raster.row_text(1), "│alpha│beta │");
        assert_eq!(t.stats().full_repaints, 1);
    }

    #[test]
    fn test_transparent_background_falls_back_to_full_repaint() {
        let mut t = table();
        t.render();
        drag(&mut t, (11, 6), (13, 6));
        assert_eq!(t.stats().incremental_repaints, 0);
        assert!(t.is_raster_dirty());
        t.render();
        assert_eq!(t.stats().full_repaints, 2);
    }
}
