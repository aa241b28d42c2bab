//! Border layout and border paint.
//!
//! Layout decides which border slots exist and so where content goes.
//! Paint decides whether glyphs are drawn into those slots. Hiding borders
//! never moves content.

use super::layout::TableLayout;
use crate::renderer::{GridSpec, PaintTarget};
use crate::types::{BorderStyle, Rgba};

/// Which border lines reserve space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BorderLayout {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
    pub inner_vertical: bool,
    pub inner_horizontal: bool,
}

impl BorderLayout {
    /// `border` enables inner lines and, unless overridden by
    /// `outer_border`, the outer frame. Inner lines need at least two
    /// rows or columns to exist.
    pub fn resolve(border: bool, outer_border: Option<bool>, rows: usize, columns: usize) -> Self {
        let outer = outer_border.unwrap_or(border);
        Self {
            left: outer,
            right: outer,
            top: outer,
            bottom: outer,
            inner_vertical: border && columns > 1,
            inner_horizontal: border && rows > 1,
        }
    }

    /// Vertical border slots across `columns` columns.
    pub fn vertical_count(&self, columns: usize) -> usize {
        let inner = if self.inner_vertical { columns.saturating_sub(1) } else { 0 };
        self.left as usize + self.right as usize + inner
    }

    /// Horizontal border slots across `rows` rows.
    pub fn horizontal_count(&self, rows: usize) -> usize {
        let inner = if self.inner_horizontal { rows.saturating_sub(1) } else { 0 };
        self.top as usize + self.bottom as usize + inner
    }

    pub fn has_outer(&self) -> bool {
        self.left || self.right || self.top || self.bottom
    }

    pub fn has_inner(&self) -> bool {
        self.inner_vertical || self.inner_horizontal
    }
}

/// Border paint settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderPaint {
    pub style: BorderStyle,
    pub fg: Rgba,
    pub bg: Rgba,
}

/// Issue the single grid call for a laid-out table.
pub fn paint_borders<T: PaintTarget + ?Sized>(
    target: &mut T,
    layout: &TableLayout,
    borders: &BorderLayout,
    paint: &BorderPaint,
) {
    if layout.is_empty() {
        return;
    }
    target.draw_grid(&GridSpec {
        glyphs: paint.style.glyphs(),
        fg: paint.fg,
        bg: paint.bg,
        column_offsets: &layout.column_offsets,
        row_offsets: &layout.row_offsets,
        draw_inner: borders.has_inner(),
        draw_outer: borders.has_outer(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults_outer_to_border() {
        let b = BorderLayout::resolve(true, None, 2, 2);
        assert!(b.left && b.right && b.top && b.bottom);
        assert!(b.inner_vertical && b.inner_horizontal);
        assert_eq!(b.vertical_count(2), 3);
    }

    #[test]
    fn test_outer_override() {
        let b = BorderLayout::resolve(true, Some(false), 2, 3);
        assert!(!b.has_outer());
        assert_eq!(b.vertical_count(3), 2);
        assert_eq!(b.horizontal_count(2), 1);

        let b = BorderLayout::resolve(false, Some(true), 2, 3);
        assert!(b.has_outer() && !b.has_inner());
        assert_eq!(b.vertical_count(3), 2);
    }

    #[test]
    fn test_inner_needs_two_parts() {
        let b = BorderLayout::resolve(true, None, 1, 1);
        assert!(!b.inner_vertical && !b.inner_horizontal);
        assert_eq!(b.vertical_count(1), 2);
    }
}
