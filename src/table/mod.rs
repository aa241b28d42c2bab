//! The table engine.
//!
//! A [`TextTable`] owns a grid of independently wrapped text cells and turns
//! it into a bordered raster:
//!
//! ```text
//! set_content -> reconcile grid -> layout dirty
//!     host measure -> compute + cache layout
//!     render -> reuse cached layout (or recompute) -> paint borders + cells
//! selection -> map into cells -> repaint affected rows
//! ```
//!
//! Two flags gate work. `layout_dirty` forces geometry to be recomputed,
//! `raster_dirty` forces a full repaint. Selection changes repaint only the
//! rows they touch when the raster is otherwise current.

mod border;
mod cell;
mod grid;
mod layout;
mod measure;
mod selection;

pub use border::{BorderLayout, BorderPaint, paint_borders};
pub use cell::{CellSettings, TableCell};
pub use grid::{CellGrid, ReconcileStats};
pub use layout::{LayoutParams, TableLayout, build_offsets, compute_layout, fit_columns};
pub use measure::{MeasureMode, MeasureResult, layout_with_taffy};

use std::fmt;

use tracing::{debug, debug_span};

use crate::config::{TableOptions, sanitize_padding};
use crate::renderer::{FrameBuffer, PaintTarget};
use crate::text::{TableContent, TextStyle};
use crate::types::{Attr, BorderStyle, ClipRect, ColumnWidthMode, Rgba, WrapMode};

/// Inclusive row range.
pub type RowRange = (usize, usize);

/// Work counters, for hosts and tests that need to observe caching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableStats {
    pub cells_built: usize,
    pub cells_dropped: usize,
    pub layouts_computed: usize,
    pub full_repaints: usize,
    pub incremental_repaints: usize,
}

pub struct TextTable {
    options: TableOptions,
    grid: CellGrid,
    bounds: ClipRect,

    layout: Option<TableLayout>,
    layout_width: Option<usize>,
    /// Layout computed by the last measure call and the width it used.
    measure_cache: Option<(TableLayout, Option<usize>)>,
    layout_dirty: bool,
    raster_dirty: bool,
    raster: FrameBuffer,

    selected_rows: Option<RowRange>,
    dirty_rows: Option<RowRange>,

    stats: TableStats,
    mark_dirty: Option<Box<dyn FnMut()>>,
}

impl fmt::Debug for TextTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextTable")
            .field("rows", &self.grid.row_count())
            .field("columns", &self.grid.column_count())
            .field("bounds", &self.bounds)
            .field("layout_dirty", &self.layout_dirty)
            .field("raster_dirty", &self.raster_dirty)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl Default for TextTable {
    fn default() -> Self {
        Self::new(TableOptions::default())
    }
}

impl TextTable {
    pub fn new(mut options: TableOptions) -> Self {
        options.cell_padding = sanitize_padding(options.cell_padding) as i32;
        Self {
            options,
            grid: CellGrid::new(),
            bounds: ClipRect::default(),
            layout: None,
            layout_width: None,
            measure_cache: None,
            layout_dirty: true,
            raster_dirty: true,
            raster: FrameBuffer::new(0, 0),
            selected_rows: None,
            dirty_rows: None,
            stats: TableStats::default(),
            mark_dirty: None,
        }
    }

    pub fn with_content(content: &TableContent, options: TableOptions) -> Self {
        let mut table = Self::new(options);
        table.set_content(content);
        table
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    pub fn row_count(&self) -> usize {
        self.grid.row_count()
    }

    pub fn column_count(&self) -> usize {
        self.grid.column_count()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&TableCell> {
        self.grid.get(row, col)
    }

    /// The layout the last paint or hit test used.
    pub fn layout(&self) -> Option<&TableLayout> {
        self.layout.as_ref()
    }

    pub fn border_layout(&self) -> BorderLayout {
        BorderLayout::resolve(
            self.options.border,
            self.options.outer_border,
            self.grid.row_count(),
            self.grid.column_count(),
        )
    }

    /// Rows the last selection change asked to repaint.
    pub fn dirty_rows(&self) -> Option<RowRange> {
        self.dirty_rows
    }

    pub fn stats(&self) -> TableStats {
        self.stats
    }

    pub fn bounds(&self) -> ClipRect {
        self.bounds
    }

    pub fn is_layout_dirty(&self) -> bool {
        self.layout_dirty
    }

    pub fn is_raster_dirty(&self) -> bool {
        self.raster_dirty
    }

    pub(crate) fn padding(&self) -> usize {
        self.options.cell_padding.max(0) as usize
    }

    pub(crate) fn cell_settings(&self) -> CellSettings {
        CellSettings {
            wrap_mode: self.options.wrap_mode,
            style: TextStyle {
                fg: self.options.fg,
                bg: self.options.bg,
                attrs: self.options.attributes,
            },
            selection_bg: self.options.selection_bg,
            selection_fg: self.options.selection_fg,
        }
    }

    pub(crate) fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            padding: self.padding(),
            wrap_mode: self.options.wrap_mode,
            width_mode: self.options.column_width_mode,
            borders: self.border_layout(),
        }
    }

    // =========================================================================
    // Invalidation
    // =========================================================================

    /// Called whenever this table's size may have changed.
    pub fn set_mark_dirty_hook(&mut self, hook: impl FnMut() + 'static) {
        self.mark_dirty = Some(Box::new(hook));
    }

    fn invalidate_layout(&mut self) {
        self.layout_dirty = true;
        self.raster_dirty = true;
        self.measure_cache = None;
        if let Some(hook) = self.mark_dirty.as_mut() {
            hook();
        }
    }

    fn invalidate_raster(&mut self) {
        self.raster_dirty = true;
    }

    fn apply_cell_settings(&mut self) {
        let settings = self.cell_settings();
        self.grid.apply(&settings);
    }

    // =========================================================================
    // Setters: layout
    // =========================================================================

    /// Replace the content. Positions whose `Rc` handle is unchanged keep
    /// their cell untouched.
    pub fn set_content(&mut self, content: &TableContent) {
        let settings = self.cell_settings();
        let stats = self.grid.reconcile(content, &settings);
        self.stats.cells_built += stats.built;
        self.stats.cells_dropped += stats.dropped;
        self.invalidate_layout();
    }

    pub fn set_wrap_mode(&mut self, mode: WrapMode) {
        if self.options.wrap_mode != mode {
            self.options.wrap_mode = mode;
            self.apply_cell_settings();
            self.invalidate_layout();
        }
    }

    pub fn set_column_width_mode(&mut self, mode: ColumnWidthMode) {
        if self.options.column_width_mode != mode {
            self.options.column_width_mode = mode;
            self.invalidate_layout();
        }
    }

    /// Negative padding falls back to 0.
    pub fn set_cell_padding(&mut self, padding: i32) {
        let padding = sanitize_padding(padding) as i32;
        if self.options.cell_padding != padding {
            self.options.cell_padding = padding;
            self.invalidate_layout();
        }
    }

    pub fn set_border(&mut self, border: bool) {
        if self.options.border != border {
            self.options.border = border;
            self.invalidate_layout();
        }
    }

    /// `None` follows `border`.
    pub fn set_outer_border(&mut self, outer: Option<bool>) {
        if self.options.outer_border != outer {
            self.options.outer_border = outer;
            self.invalidate_layout();
        }
    }

    pub fn set_position_absolute(&mut self, absolute: bool) {
        if self.options.position_absolute != absolute {
            self.options.position_absolute = absolute;
            self.invalidate_layout();
        }
    }

    /// Position and size assigned by the host. The width is the render-time
    /// width constraint; the position is the origin for selection.
    pub fn set_bounds(&mut self, bounds: ClipRect) {
        if self.bounds != bounds {
            if self.bounds.width != bounds.width {
                self.raster_dirty = true;
            }
            self.bounds = bounds;
        }
    }

    // =========================================================================
    // Setters: raster only
    // =========================================================================

    /// Show or hide border glyphs. Spacing is unaffected.
    pub fn set_show_borders(&mut self, show: bool) {
        if self.options.show_borders != show {
            self.options.show_borders = show;
            self.invalidate_raster();
        }
    }

    pub fn set_border_style(&mut self, style: BorderStyle) {
        if self.options.border_style != style {
            self.options.border_style = style;
            self.invalidate_raster();
        }
    }

    pub fn set_border_color(&mut self, color: Rgba) {
        if self.options.border_color != color {
            self.options.border_color = color;
            self.invalidate_raster();
        }
    }

    pub fn set_border_background_color(&mut self, color: Rgba) {
        if self.options.border_background_color != color {
            self.options.border_background_color = color;
            self.invalidate_raster();
        }
    }

    pub fn set_background_color(&mut self, color: Rgba) {
        if self.options.background_color != color {
            self.options.background_color = color;
            self.invalidate_raster();
        }
    }

    pub fn set_fg(&mut self, color: Rgba) {
        if self.options.fg != color {
            self.options.fg = color;
            self.apply_cell_settings();
            self.invalidate_raster();
        }
    }

    pub fn set_bg(&mut self, color: Rgba) {
        if self.options.bg != color {
            self.options.bg = color;
            self.apply_cell_settings();
            self.invalidate_raster();
        }
    }

    pub fn set_attributes(&mut self, attrs: Attr) {
        if self.options.attributes != attrs {
            self.options.attributes = attrs;
            self.apply_cell_settings();
            self.invalidate_raster();
        }
    }

    pub fn set_selection_bg(&mut self, color: Option<Rgba>) {
        if self.options.selection_bg != color {
            self.options.selection_bg = color;
            self.apply_cell_settings();
            self.invalidate_raster();
        }
    }

    pub fn set_selection_fg(&mut self, color: Option<Rgba>) {
        if self.options.selection_fg != color {
            self.options.selection_fg = color;
            self.apply_cell_settings();
            self.invalidate_raster();
        }
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Width constraint for painting, from the host-assigned bounds.
    fn render_width(&self) -> Option<usize> {
        let mode = if self.bounds.width > 0 {
            MeasureMode::Exactly
        } else {
            MeasureMode::Undefined
        };
        self.resolve_width(self.bounds.width as f32, mode)
    }

    fn compute(&mut self, width: Option<usize>) -> TableLayout {
        let layout = compute_layout(&self.grid, &self.layout_params(), width);
        self.stats.layouts_computed += 1;
        debug!(
            ?width,
            columns = ?layout.column_widths,
            rows = ?layout.row_heights,
            table_width = layout.table_width,
            table_height = layout.table_height,
            "table layout computed"
        );
        layout
    }

    /// Make `self.layout` match the current content and bounds.
    pub(crate) fn ensure_layout(&mut self) {
        let width = self.render_width();

        if let Some((layout, used)) = self.measure_cache.take() {
            if used == width {
                self.install_layout(layout, width);
                return;
            }
        }

        if self.layout_dirty || self.layout.is_none() || self.layout_width != width {
            let layout = self.compute(width);
            self.install_layout(layout, width);
        }
    }

    fn install_layout(&mut self, layout: TableLayout, width: Option<usize>) {
        if !layout.is_empty() {
            for (r, c, cell) in self.grid.cells_mut() {
                let (w, h) = layout.content_size(r, c);
                cell.set_content_size(w, h);
            }
        }
        if self.layout.as_ref() != Some(&layout) {
            self.raster_dirty = true;
        }
        self.layout = Some(layout);
        self.layout_width = width;
        self.layout_dirty = false;
    }

    // =========================================================================
    // Paint
    // =========================================================================

    /// Bring the retained raster up to date and return it.
    pub fn render(&mut self) -> &FrameBuffer {
        let _span = debug_span!(
            "table_render",
            rows = self.grid.row_count(),
            columns = self.grid.column_count()
        )
        .entered();

        self.ensure_layout();

        if self.raster_dirty {
            let (width, height) = self
                .layout
                .as_ref()
                .map_or((0, 0), |l| (to_u16(l.table_width), to_u16(l.table_height)));

            let mut raster = std::mem::replace(&mut self.raster, FrameBuffer::new(0, 0));
            if raster.width() != width || raster.height() != height {
                raster.resize(width, height);
            }
            self.paint_full(&mut raster);
            self.raster = raster;

            self.raster_dirty = false;
            self.stats.full_repaints += 1;
            debug!(width, height, "table raster repainted");
        }

        &self.raster
    }

    /// Render and composite into a host buffer at the table's bounds.
    pub fn draw_onto(&mut self, host: &mut FrameBuffer) {
        let bounds = self.bounds;
        let background = self.options.background_color;

        if self.grid.is_degenerate() {
            self.ensure_layout();
            host.fill_rect(bounds.x, bounds.y, bounds.width, bounds.height, background, None);
            return;
        }

        self.render().blit(host, bounds.x as i32, bounds.y as i32, None);
    }

    /// Paint the whole table into any target, origin at its top-left.
    pub fn paint_into<T: PaintTarget + ?Sized>(&mut self, target: &mut T) {
        self.ensure_layout();
        self.paint_full(target);
    }

    fn paint_full<T: PaintTarget + ?Sized>(&self, target: &mut T) {
        target.clear(self.options.background_color);

        let Some(layout) = self.layout.as_ref().filter(|l| !l.is_empty()) else {
            return;
        };

        if self.options.show_borders {
            paint_borders(
                target,
                layout,
                &self.border_layout(),
                &BorderPaint {
                    style: self.options.border_style,
                    fg: self.options.border_color,
                    bg: self.options.border_background_color,
                },
            );
        }

        for (r, c, cell) in self.grid.cells() {
            let rect = layout.content_rect(r, c);
            target.draw_run(cell.view(), rect.x, rect.y, Some(&rect));
        }
    }

    /// Repaint a band of rows straight into the retained raster.
    fn repaint_rows(&mut self, (first, last): RowRange) {
        if self.layout_dirty || self.raster_dirty || self.layout.is_none() {
            self.raster_dirty = true;
            return;
        }
        let background = self.options.background_color;
        if background.is_partially_transparent() {
            debug!("translucent background, full repaint instead of row repaint");
            self.raster_dirty = true;
            return;
        }

        let mut raster = std::mem::replace(&mut self.raster, FrameBuffer::new(0, 0));
        self.paint_rows(&mut raster, first, last, background);
        self.raster = raster;
        self.stats.incremental_repaints += 1;
    }

    fn paint_rows<T: PaintTarget + ?Sized>(&self, target: &mut T, first: usize, last: usize, background: Rgba) {
        let Some(layout) = self.layout.as_ref().filter(|l| !l.is_empty()) else {
            return;
        };
        let last = last.min(layout.row_heights.len().saturating_sub(1));

        for (r, row) in self.grid.rows().iter().enumerate().take(last + 1).skip(first) {
            for (c, cell) in row.iter().enumerate() {
                target.fill_rect(layout.cell_rect(r, c), background);
                let rect = layout.content_rect(r, c);
                target.draw_run(cell.view(), rect.x, rect.y, Some(&rect));
            }
        }
    }
}

fn to_u16(v: usize) -> u16 {
    v.min(u16::MAX as usize) as u16
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::text::{TextRun, content_from_text};

    fn table(rows: &[&[&str]], options: TableOptions) -> TextTable {
        TextTable::with_content(&content_from_text(rows), options)
    }

    #[test]
    fn test_render_default_table() {
        let mut t = table(&[&["A", "B"], &["1", "2"]], TableOptions::default());
        let raster = t.render();
        assert_eq!(raster.to_text(), "┌─┬─┐\n│A│B│\n├─┼─┤\n│1│2│\n└─┴─┘");
    }

    #[test]
    fn test_hidden_borders_keep_spacing() {
        let mut t = table(&[&["A", "B"]], TableOptions::default());
        t.set_show_borders(false);
        assert_eq!(t.render().to_text(), "     \n A B \n     ");
    }

    #[test]
    fn test_render_reuses_layout_when_clean() {
        let mut t = table(&[&["A", "B"]], TableOptions::default());
        t.render();
        t.render();
        assert_eq!(t.stats().layouts_computed, 1);
        assert_eq!(t.stats().full_repaints, 1);
    }

    #[test]
    fn test_raster_setters_do_not_relayout() {
        let mut t = table(&[&["A", "B"]], TableOptions::default());
        t.render();
        t.set_border_style(BorderStyle::Double);
        t.set_background_color(Rgba::BLACK);
        assert!(!t.is_layout_dirty());
        assert!(t.is_raster_dirty());
        assert_eq!(t.render().row_text(0), "╔═╦═╗");
        assert_eq!(t.stats().layouts_computed, 1);
    }

    #[test]
    fn test_layout_setters_call_hook() {
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        let mut t = table(&[&["A"]], TableOptions::default());
        t.set_mark_dirty_hook(move || seen.set(seen.get() + 1));

        t.set_cell_padding(1);
        t.set_wrap_mode(WrapMode::Char);
        t.set_border_color(Rgba::RED);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_negative_padding_is_zero() {
        let mut t = table(&[&["A"]], TableOptions::default());
        t.set_cell_padding(-4);
        assert_eq!(t.options().cell_padding, 0);
        t.render();
        assert_eq!(t.layout().unwrap().column_widths, vec![1]);
    }

    #[test]
    fn test_degenerate_table_only_clears() {
        let mut t = TextTable::new(TableOptions {
            background_color: Rgba::BLUE,
            ..TableOptions::default()
        });
        t.set_bounds(ClipRect::new(1, 1, 3, 2));
        let mut host = FrameBuffer::new(5, 4);
        t.draw_onto(&mut host);

        assert_eq!(host.get(1, 1).unwrap().bg, Rgba::BLUE);
        assert_eq!(host.get(3, 2).unwrap().bg, Rgba::BLUE);
        assert_eq!(host.get(0, 0).unwrap().bg, Rgba::TERMINAL_DEFAULT);
        assert_eq!(host.to_text().trim(), "");
    }

    #[test]
    fn test_chunk_style_overrides_defaults() {
        let run = TextRun::new(vec![crate::text::Chunk::plain("x").with_fg(Rgba::RED)]);
        let content = vec![vec![Some(Rc::new(run)), Some(Rc::new(TextRun::plain("y")))]];
        let mut t = TextTable::with_content(
            &content,
            TableOptions {
                fg: Rgba::GREEN,
                ..TableOptions::default()
            },
        );
        let raster = t.render();
        assert_eq!(raster.get(1, 1).unwrap().fg, Rgba::RED);
        assert_eq!(raster.get(3, 1).unwrap().fg, Rgba::GREEN);
    }

    #[test]
    fn test_draw_onto_blits_at_bounds() {
        let mut t = table(&[&["A"]], TableOptions::default());
        t.set_bounds(ClipRect::new(2, 1, 3, 3));
        let mut host = FrameBuffer::new(6, 4);
        t.draw_onto(&mut host);
        assert_eq!(host.row_text(2), "  │A│ ");
    }
}
