//! Paint targets.
//!
//! The table never writes to a terminal. It paints into anything that
//! implements [`PaintTarget`]; [`FrameBuffer`] is the in-memory cell grid the
//! table keeps as its retained raster.

pub mod buffer;
pub mod grid;

pub use buffer::FrameBuffer;
pub use grid::GridSpec;

use crate::text::TextBufferView;
use crate::types::{ClipRect, Rgba};

/// Drawing surface the table paints into.
pub trait PaintTarget {
    /// Reset every cell to a blank with background `bg`.
    fn clear(&mut self, bg: Rgba);

    /// Blank a rectangle with background `bg`.
    fn fill_rect(&mut self, rect: ClipRect, bg: Rgba);

    /// Draw all grid lines in one pass.
    fn draw_grid(&mut self, grid: &GridSpec<'_>);

    /// Draw a text view with its top-left at `(x, y)`, clipped to `clip`.
    fn draw_run(&mut self, view: &TextBufferView, x: u16, y: u16, clip: Option<&ClipRect>);
}
