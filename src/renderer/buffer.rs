//! FrameBuffer and drawing primitives.
//!
//! The FrameBuffer is a 2D grid of Cells. The table keeps one as its retained
//! raster and hosts blit it into their own screen buffer.
//!
//! # Design Decisions
//!
//! - **Flat storage**: Uses `Vec<Cell>` with row-major indexing for cache efficiency.
//! - **Clipping**: Drawing functions accept an optional `ClipRect`.
//! - **Alpha blending**: Non-opaque backgrounds blend with existing cells.
//! - **Wide characters**: CJK and emoji use a continuation marker (`char == 0`).

use unicode_segmentation::UnicodeSegmentation;

use super::PaintTarget;
use super::grid::GridSpec;
use crate::text::{TextBufferView, grapheme_width};
use crate::types::{Attr, Cell, ClipRect, Rgba};

// =============================================================================
// FrameBuffer
// =============================================================================

/// A 2D buffer of terminal cells.
///
/// Uses flat storage with row-major indexing: `index = y * width + x`
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// Create a new buffer filled with default cells.
    pub fn new(width: u16, height: u16) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::default(); size],
        }
    }

    /// Create a new buffer with a specific background color.
    pub fn with_background(width: u16, height: u16, bg: Rgba) -> Self {
        let mut buffer = Self::new(width, height);
        buffer.clear_with_bg(bg);
        buffer
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Get the full buffer bounds as a ClipRect.
    #[inline]
    pub fn bounds(&self) -> ClipRect {
        ClipRect::new(0, 0, self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    /// Get a cell reference (returns None if out of bounds).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// Get a mutable cell reference (returns None if out of bounds).
    #[inline]
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire buffer to default cells.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Clear with a specific background color.
    pub fn clear_with_bg(&mut self, bg: Rgba) {
        self.cells.fill(Cell {
            char: b' ' as u32,
            fg: Rgba::TERMINAL_DEFAULT,
            bg,
            attrs: Attr::NONE,
        });
    }

    /// Resize the buffer (clears content).
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.resize(width as usize * height as usize, Cell::default());
        self.clear();
    }

    // =========================================================================
    // Drawing Primitives
    // =========================================================================

    /// Set a single cell with optional clipping.
    ///
    /// Returns true if the cell was set.
    #[allow(clippy::too_many_arguments)]
    pub fn set_cell(
        &mut self,
        x: u16,
        y: u16,
        char: u32,
        fg: Rgba,
        bg: Rgba,
        attrs: Attr,
        clip: Option<&ClipRect>,
    ) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        if clip.is_some_and(|c| !c.contains(x, y)) {
            return false;
        }

        let idx = self.index(x, y);
        let cell = &mut self.cells[idx];

        cell.char = char;
        cell.fg = fg;
        cell.bg = Rgba::blend(bg, cell.bg);
        cell.attrs = attrs;

        true
    }

    /// Fill a rectangle with a background color, blanking its glyphs.
    pub fn fill_rect(&mut self, x: u16, y: u16, width: u16, height: u16, bg: Rgba, clip: Option<&ClipRect>) {
        let x2 = x.saturating_add(width).min(self.width);
        let y2 = y.saturating_add(height).min(self.height);

        let (x1, y1, x2, y2) = match clip {
            Some(clip) => {
                let cx2 = clip.x.saturating_add(clip.width);
                let cy2 = clip.y.saturating_add(clip.height);
                (x.max(clip.x), y.max(clip.y), x2.min(cx2), y2.min(cy2))
            }
            None => (x, y, x2, y2),
        };

        if x2 <= x1 || y2 <= y1 {
            return;
        }

        for row in y1..y2 {
            let row_start = self.index(x1, row);
            let row_end = self.index(x2, row);
            for cell in &mut self.cells[row_start..row_end] {
                cell.bg = Rgba::blend(bg, cell.bg);
                cell.char = b' ' as u32;
                cell.fg = Rgba::TERMINAL_DEFAULT;
                cell.attrs = Attr::NONE;
            }
        }
    }

    /// Draw a single character.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_char(
        &mut self,
        x: u16,
        y: u16,
        char: char,
        fg: Rgba,
        bg: Option<Rgba>,
        attrs: Attr,
        clip: Option<&ClipRect>,
    ) -> bool {
        let bg = bg.unwrap_or(Rgba::TRANSPARENT);
        self.set_cell(x, y, char as u32, fg, bg, attrs, clip)
    }

    /// Draw one grapheme, marking the second cell of wide graphemes as a
    /// continuation. Returns the grapheme's width.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_grapheme(
        &mut self,
        x: u16,
        y: u16,
        grapheme: &str,
        fg: Rgba,
        bg: Rgba,
        attrs: Attr,
        clip: Option<&ClipRect>,
    ) -> u16 {
        let width = grapheme_width(grapheme) as u16;
        let Some(ch) = grapheme.chars().next() else {
            return 0;
        };
        if width == 0 {
            return 0;
        }

        if self.set_cell(x, y, ch as u32, fg, bg, attrs, clip) && width == 2 {
            let next = x.saturating_add(1);
            if clip.is_none_or(|c| c.contains(next, y)) {
                if let Some(cell) = self.get_mut(next, y) {
                    cell.char = 0;
                    cell.fg = fg;
                    cell.bg = Rgba::blend(bg, cell.bg);
                    cell.attrs = attrs;
                }
            }
        }

        width
    }

    /// Draw text at a position.
    ///
    /// Returns the number of cells used (handles wide characters).
    #[allow(clippy::too_many_arguments)]
    pub fn draw_text(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        fg: Rgba,
        bg: Option<Rgba>,
        attrs: Attr,
        clip: Option<&ClipRect>,
    ) -> u16 {
        let bg = bg.unwrap_or(Rgba::TRANSPARENT);
        let mut col = x;

        for grapheme in text.graphemes(true) {
            if col >= self.width {
                break;
            }
            col = col.saturating_add(self.draw_grapheme(col, y, grapheme, fg, bg, attrs, clip));
        }

        col.saturating_sub(x)
    }

    // =========================================================================
    // Compositing
    // =========================================================================

    /// Copy this buffer into `dst` with its top-left corner at `(x, y)`.
    ///
    /// Backgrounds blend over what `dst` already holds, so a transparent
    /// raster leaves the host's background visible.
    pub fn blit(&self, dst: &mut FrameBuffer, x: i32, y: i32, clip: Option<&ClipRect>) {
        for sy in 0..self.height {
            let dy = y + sy as i32;
            if dy < 0 || dy > u16::MAX as i32 {
                continue;
            }
            for sx in 0..self.width {
                let dx = x + sx as i32;
                if dx < 0 || dx > u16::MAX as i32 {
                    continue;
                }
                let (dx, dy) = (dx as u16, dy as u16);
                if clip.is_some_and(|c| !c.contains(dx, dy)) {
                    continue;
                }

                let src = self.cells[self.index(sx, sy)];
                if let Some(cell) = dst.get_mut(dx, dy) {
                    cell.char = src.char;
                    cell.fg = src.fg;
                    cell.bg = Rgba::blend(src.bg, cell.bg);
                    cell.attrs = src.attrs;
                }
            }
        }
    }

    /// The characters of one row, continuation cells skipped.
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let start = self.index(0, y);
        self.cells[start..start + self.width as usize]
            .iter()
            .filter(|cell| cell.char != 0)
            .map(|cell| char::from_u32(cell.char).unwrap_or(' '))
            .collect()
    }

    /// Every row, joined with newlines.
    pub fn to_text(&self) -> String {
        (0..self.height).map(|y| self.row_text(y)).collect::<Vec<_>>().join("\n")
    }
}

// =============================================================================
// PaintTarget
// =============================================================================

impl PaintTarget for FrameBuffer {
    fn clear(&mut self, bg: Rgba) {
        self.clear_with_bg(bg);
    }

    fn fill_rect(&mut self, rect: ClipRect, bg: Rgba) {
        FrameBuffer::fill_rect(self, rect.x, rect.y, rect.width, rect.height, bg, None);
    }

    fn draw_grid(&mut self, grid: &GridSpec<'_>) {
        super::grid::draw_grid(self, grid);
    }

    fn draw_run(&mut self, view: &TextBufferView, x: u16, y: u16, clip: Option<&ClipRect>) {
        for placed in view.visible_glyphs() {
            let (Ok(gx), Ok(gy)) = (u16::try_from(placed.x), u16::try_from(placed.y)) else {
                continue;
            };
            self.draw_grapheme(
                x.saturating_add(gx),
                y.saturating_add(gy),
                &placed.glyph.text,
                placed.fg,
                placed.bg,
                placed.attrs,
                clip,
            );
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{TextBuffer, TextRun};

    #[test]
    fn test_framebuffer_creation() {
        let buffer = FrameBuffer::new(80, 24);
        assert_eq!(buffer.width(), 80);
        assert_eq!(buffer.height(), 24);
        assert_eq!(buffer.cells().len(), 80 * 24);
    }

    #[test]
    fn test_framebuffer_set_cell() {
        let mut buffer = FrameBuffer::new(10, 10);
        buffer.set_cell(5, 5, 'X' as u32, Rgba::RED, Rgba::BLACK, Attr::BOLD, None);

        let cell = buffer.get(5, 5).unwrap();
        assert_eq!(cell.char, 'X' as u32);
        assert_eq!(cell.fg, Rgba::RED);
        assert_eq!(cell.bg, Rgba::BLACK);
        assert_eq!(cell.attrs, Attr::BOLD);
    }

    #[test]
    fn test_set_cell_respects_clip() {
        let mut buffer = FrameBuffer::new(10, 10);
        let clip = ClipRect::new(0, 0, 2, 2);
        assert!(!buffer.set_cell(5, 5, 'X' as u32, Rgba::RED, Rgba::BLACK, Attr::NONE, Some(&clip)));
        assert_eq!(buffer.get(5, 5).unwrap().char, ' ' as u32);
    }

    #[test]
    fn test_framebuffer_fill_rect() {
        let mut buffer = FrameBuffer::new(20, 20);
        buffer.fill_rect(5, 5, 10, 10, Rgba::BLUE, None);

        assert_eq!(buffer.get(5, 5).unwrap().bg, Rgba::BLUE);
        assert_eq!(buffer.get(14, 14).unwrap().bg, Rgba::BLUE);
        assert_eq!(buffer.get(4, 5).unwrap().bg, Rgba::TERMINAL_DEFAULT);
        assert_eq!(buffer.get(15, 5).unwrap().bg, Rgba::TERMINAL_DEFAULT);
    }

    #[test]
    fn test_fill_rect_blanks_glyphs() {
        let mut buffer = FrameBuffer::new(5, 1);
        buffer.draw_text(0, 0, "abcde", Rgba::WHITE, None, Attr::BOLD, None);
        buffer.fill_rect(1, 0, 2, 1, Rgba::BLACK, None);
        assert_eq!(buffer.row_text(0), "a  de");
        assert_eq!(buffer.get(1, 0).unwrap().attrs, Attr::NONE);
    }

    #[test]
    fn test_draw_text() {
        let mut buffer = FrameBuffer::new(20, 5);
        let used = buffer.draw_text(0, 0, "Hello", Rgba::WHITE, None, Attr::NONE, None);

        assert_eq!(used, 5);
        assert_eq!(buffer.get(0, 0).unwrap().char, 'H' as u32);
        assert_eq!(buffer.get(4, 0).unwrap().char, 'o' as u32);
    }

    #[test]
    fn test_draw_text_wide_chars() {
        let mut buffer = FrameBuffer::new(10, 1);
        let used = buffer.draw_text(0, 0, "中a", Rgba::WHITE, None, Attr::NONE, None);

        assert_eq!(used, 3);
        assert_eq!(buffer.get(1, 0).unwrap().char, 0);
        assert_eq!(buffer.row_text(0), "中a       ");
    }

    #[test]
    fn test_translucent_bg_blends() {
        let mut buffer = FrameBuffer::with_background(1, 1, Rgba::BLACK);
        buffer.set_cell(0, 0, 'x' as u32, Rgba::WHITE, Rgba::new(255, 255, 255, 128), Attr::NONE, None);
        let bg = buffer.get(0, 0).unwrap().bg;
        assert!(bg.r > 100 && bg.r < 160);
        assert_eq!(bg.a, 255);
    }

    #[test]
    fn test_blit_offsets_and_clips() {
        let mut src = FrameBuffer::with_background(3, 1, Rgba::TRANSPARENT);
        src.draw_text(0, 0, "abc", Rgba::WHITE, None, Attr::NONE, None);

        let mut dst = FrameBuffer::with_background(5, 2, Rgba::BLUE);
        src.blit(&mut dst, 3, 1, None);
        assert_eq!(dst.row_text(1), "   ab");
        assert_eq!(dst.get(3, 1).unwrap().bg, Rgba::BLUE);

        src.blit(&mut dst, -1, 0, None);
        assert_eq!(dst.row_text(0), "bc   ");
    }

    #[test]
    fn test_draw_run_places_view_glyphs() {
        let mut view = TextBufferView::new(TextBuffer::from_run(&TextRun::plain("hi\nyo")));
        view.set_viewport(0, 0, 4, 2);

        let mut buffer = FrameBuffer::new(6, 3);
        PaintTarget::draw_run(&mut buffer, &view, 1, 1, None);
        assert_eq!(buffer.row_text(1), " hi   ");
        assert_eq!(buffer.row_text(2), " yo   ");
    }
}
